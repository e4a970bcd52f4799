//! Concrete pipeline steps, the baseline trainer, and report writers.

use loan_approval::dataset::{self, ProcessedDataset};
use loan_approval::model::{Classifier, LogisticModel, ModelArtifact, FEATURE_NAMES};
use loan_approval::pipeline::{PipelineContext, PipelineStep, StepFailure};
use loan_approval::prediction::FeatureVector;
use std::path::Path;
use tracing::info;

const TRAIN_EPOCHS: usize = 1500;
const LEARNING_RATE: f64 = 0.3;

/// The pipeline's standard step sequence: train, then explain.
pub fn standard_steps() -> Vec<Box<dyn PipelineStep>> {
    vec![Box::new(TrainModelStep), Box::new(ExplainModelStep)]
}

fn step_failure(context: &str, err: impl std::fmt::Display) -> StepFailure {
    StepFailure::new(context.to_string()).with_diagnostics(err.to_string())
}

/// Ingests the raw dataset, fits the baseline logistic model, and writes the
/// processed dataset plus the model artifact.
pub struct TrainModelStep;

impl PipelineStep for TrainModelStep {
    fn name(&self) -> &str {
        "Loan Model Training"
    }

    fn run(&mut self, ctx: &PipelineContext) -> Result<String, StepFailure> {
        let records = dataset::load_dataset(&ctx.paths.dataset)
            .map_err(|err| step_failure("could not read the loan dataset", err))?;
        let processed = dataset::preprocess(&records)
            .map_err(|err| step_failure("could not preprocess the loan dataset", err))?;

        let (features, labels) = processed.training_rows();
        let model = fit_logistic(&features, &labels, TRAIN_EPOCHS, LEARNING_RATE);
        let accuracy = training_accuracy(&model, &features, &labels);

        let processed_path = ctx.paths.processed_dataset();
        dataset::write_processed_csv(&processed_path, &processed)
            .map_err(|err| step_failure("could not write the processed dataset", err))?;

        ModelArtifact::new(model, Some(processed.scaler))
            .save(&ctx.paths.model)
            .map_err(|err| step_failure("could not save the model artifact", err))?;

        info!(
            rows = processed.rows.len(),
            dropped = processed.dropped,
            accuracy,
            "baseline model trained"
        );

        Ok(format!(
            "trained on {} rows ({} dropped as incomplete)\n\
             training accuracy: {:.1}%\n\
             processed data written to {}\n\
             model artifact written to {}",
            processed.rows.len(),
            processed.dropped,
            accuracy * 100.0,
            processed_path.display(),
            ctx.paths.model.display()
        ))
    }
}

/// Scores the processed dataset with the saved artifact and writes the
/// feature-importance and confusion-matrix reports.
pub struct ExplainModelStep;

impl PipelineStep for ExplainModelStep {
    fn name(&self) -> &str {
        "Model Explanation"
    }

    fn run(&mut self, ctx: &PipelineContext) -> Result<String, StepFailure> {
        let artifact = ModelArtifact::load(&ctx.paths.model)
            .map_err(|err| step_failure("could not load the model artifact", err))?;

        let records = dataset::load_dataset(&ctx.paths.dataset)
            .map_err(|err| step_failure("could not read the loan dataset", err))?;
        let processed = dataset::preprocess(&records)
            .map_err(|err| step_failure("could not preprocess the loan dataset", err))?;

        let importance_path = ctx.paths.feature_importance();
        write_feature_importance(&importance_path, &artifact.model)
            .map_err(|err| step_failure("could not write feature importance", err))?;

        let matrix = confusion_matrix(&artifact.model, &processed);
        let matrix_path = ctx.paths.confusion_matrix();
        write_confusion_matrix(&matrix_path, &matrix)
            .map_err(|err| step_failure("could not write the confusion matrix", err))?;

        Ok(format!(
            "feature importance written to {}\n\
             confusion matrix written to {} \
             (tn={} fp={} fn={} tp={})",
            importance_path.display(),
            matrix_path.display(),
            matrix.true_negatives,
            matrix.false_positives,
            matrix.false_negatives,
            matrix.true_positives
        ))
    }
}

/// Fit a logistic classifier over the three scaled features by full-batch
/// gradient descent.
pub fn fit_logistic(
    features: &[[f64; 3]],
    labels: &[f64],
    epochs: usize,
    learning_rate: f64,
) -> LogisticModel {
    let mut weights = [0.0f64; 3];
    let mut bias = 0.0f64;
    let n = features.len() as f64;

    for _ in 0..epochs {
        let mut grad_w = [0.0f64; 3];
        let mut grad_b = 0.0f64;

        for (x, y) in features.iter().zip(labels.iter()) {
            let logit: f64 =
                weights.iter().zip(x.iter()).map(|(w, v)| w * v).sum::<f64>() + bias;
            let p = 1.0 / (1.0 + (-logit).exp());
            let residual = p - y;
            for (g, v) in grad_w.iter_mut().zip(x.iter()) {
                *g += residual * v;
            }
            grad_b += residual;
        }

        for (w, g) in weights.iter_mut().zip(grad_w.iter()) {
            *w -= learning_rate * g / n;
        }
        bias -= learning_rate * grad_b / n;
    }

    LogisticModel::new(weights, bias)
}

/// Share of training rows the model classifies correctly.
pub fn training_accuracy(model: &LogisticModel, features: &[[f64; 3]], labels: &[f64]) -> f64 {
    if features.is_empty() {
        return 0.0;
    }
    let correct = features
        .iter()
        .zip(labels.iter())
        .filter(|(x, y)| {
            let decision = model.predict(&feature_vector(**x));
            f64::from(decision.as_label()) == **y
        })
        .count();
    correct as f64 / features.len() as f64
}

fn feature_vector(x: [f64; 3]) -> FeatureVector {
    FeatureVector {
        applicant_income: x[0],
        loan_amount: x[1],
        credit_history: x[2],
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_positives: usize,
}

pub fn confusion_matrix(model: &LogisticModel, processed: &ProcessedDataset) -> ConfusionMatrix {
    let (features, labels) = processed.training_rows();
    let mut matrix = ConfusionMatrix::default();

    for (x, y) in features.iter().zip(labels.iter()) {
        let predicted = model.predict(&feature_vector(*x)).as_label();
        match (*y as u8, predicted) {
            (0, 0) => matrix.true_negatives += 1,
            (0, 1) => matrix.false_positives += 1,
            (1, 0) => matrix.false_negatives += 1,
            (1, 1) => matrix.true_positives += 1,
            _ => {}
        }
    }
    matrix
}

fn write_feature_importance(path: &Path, model: &LogisticModel) -> Result<(), csv::Error> {
    let mut rows: Vec<(&str, f64)> = FEATURE_NAMES
        .iter()
        .zip(model.weights().iter())
        .map(|(name, weight)| (*name, *weight))
        .collect();
    rows.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Feature", "Weight"])?;
    for (name, weight) in rows {
        writer.write_record([name, &format!("{weight:.6}")])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_confusion_matrix(path: &Path, matrix: &ConfusionMatrix) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["", "Predicted_Rejected", "Predicted_Approved"])?;
    writer.write_record([
        "Actual_Rejected",
        &matrix.true_negatives.to_string(),
        &matrix.false_positives.to_string(),
    ])?;
    writer.write_record([
        "Actual_Approved",
        &matrix.false_negatives.to_string(),
        &matrix.true_positives.to_string(),
    ])?;
    writer.flush()?;
    Ok(())
}

//! The prediction transform: feature selection, optional scaling, and the
//! approval decision.

use crate::domain::{LoanApplication, LoanDecision};
use crate::model::{Classifier, LogisticModel, ModelArtifact};
use crate::preprocessing::ScalerStats;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictError {
    #[error("missing required feature '{0}'")]
    MissingFeature(&'static str),
}

/// Fixed-order numeric triple fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub applicant_income: f64,
    pub loan_amount: f64,
    pub credit_history: f64,
}

impl FeatureVector {
    /// Select the three required fields from the record, in model order.
    /// Any absent field is a hard error, never a silent default.
    pub fn from_application(application: &LoanApplication) -> Result<Self, PredictError> {
        let applicant_income = application
            .applicant_income
            .ok_or(PredictError::MissingFeature("ApplicantIncome"))?;
        let loan_amount = application
            .loan_amount
            .ok_or(PredictError::MissingFeature("LoanAmount"))?;
        let credit_history = application
            .credit_history
            .ok_or(PredictError::MissingFeature("Credit_History"))?
            .as_feature();

        Ok(Self {
            applicant_income,
            loan_amount,
            credit_history,
        })
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.applicant_income, self.loan_amount, self.credit_history]
    }

    fn scaled(mut self, stats: &ScalerStats) -> Self {
        self.applicant_income = stats.applicant_income.apply(self.applicant_income);
        self.loan_amount = stats.loan_amount.apply(self.loan_amount);
        self
    }
}

/// One screening outcome: the binary decision and the class probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub decision: LoanDecision,
    /// `[P(reject), P(approve)]`, summing to 1.0.
    pub probabilities: [f64; 2],
}

impl Prediction {
    pub fn rejection_probability(&self) -> f64 {
        self.probabilities[0]
    }

    pub fn approval_probability(&self) -> f64 {
        self.probabilities[1]
    }
}

/// Screens applications against a loaded classifier, applying the artifact's
/// training-time scaler statistics when present.
pub struct Screener<C: Classifier = LogisticModel> {
    classifier: C,
    scaler: Option<ScalerStats>,
}

impl Screener<LogisticModel> {
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        if artifact.scaler.is_none() {
            warn!("artifact carries no scaler statistics; screening on raw feature values");
        }
        Self {
            classifier: artifact.model,
            scaler: artifact.scaler,
        }
    }
}

impl<C: Classifier> Screener<C> {
    pub fn new(classifier: C, scaler: Option<ScalerStats>) -> Self {
        Self { classifier, scaler }
    }

    /// Screen one application record end to end.
    pub fn screen(&self, application: &LoanApplication) -> Result<Prediction, PredictError> {
        let mut features = FeatureVector::from_application(application)?;
        if let Some(stats) = &self.scaler {
            features = features.scaled(stats);
        }

        Ok(Prediction {
            decision: self.classifier.predict(&features),
            probabilities: self.classifier.predict_proba(&features),
        })
    }
}

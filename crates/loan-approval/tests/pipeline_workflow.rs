//! Runner semantics: dataset precondition, ordered execution, and
//! abort-on-first-failure with captured diagnostics.

use loan_approval::config::PathsConfig;
use loan_approval::pipeline::{
    FnStep, Pipeline, PipelineContext, PipelineError, PipelineStep, StepFailure,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn scratch_paths(tag: &str) -> PathsConfig {
    let root = std::env::temp_dir().join(format!("loan-pipeline-it-{}-{tag}", std::process::id()));
    fs::create_dir_all(&root).unwrap();
    PathsConfig {
        dataset: root.join("data/loan_data.csv"),
        model: root.join("data/model.bin"),
        reports: root.join("reports"),
    }
}

fn seed_dataset(paths: &PathsConfig) {
    fs::create_dir_all(paths.dataset.parent().unwrap()).unwrap();
    fs::write(
        &paths.dataset,
        "ApplicantIncome,LoanAmount,Credit_History,Loan_Status\n5000,100,1,Y\n",
    )
    .unwrap();
}

fn cleanup(paths: &PathsConfig) {
    if let Some(root) = paths.dataset.parent().and_then(Path::parent) {
        fs::remove_dir_all(root).ok();
    }
}

/// Step double that counts invocations and can be told to fail.
struct CountingStep {
    name: &'static str,
    invocations: Arc<AtomicUsize>,
    fail: bool,
}

impl PipelineStep for CountingStep {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&mut self, _ctx: &PipelineContext) -> Result<String, StepFailure> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(StepFailure::new("synthetic failure").with_diagnostics("captured stderr text"))
        } else {
            Ok(format!("{} ran", self.name))
        }
    }
}

#[test]
fn absent_dataset_reports_before_invoking_any_step() {
    let paths = scratch_paths("precondition");
    let invocations = Arc::new(AtomicUsize::new(0));
    let mut pipeline = Pipeline::with_steps(vec![Box::new(CountingStep {
        name: "training",
        invocations: invocations.clone(),
        fail: false,
    })]);

    let err = pipeline
        .run(&PipelineContext::new(paths.clone()))
        .unwrap_err();

    assert!(matches!(err, PipelineError::MissingDataset { .. }));
    assert!(err.to_string().contains("loan_data.csv not found"));
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
    cleanup(&paths);
}

#[test]
fn failing_step_aborts_and_carries_its_diagnostics() {
    let paths = scratch_paths("abort");
    seed_dataset(&paths);

    let first_runs = Arc::new(AtomicUsize::new(0));
    let third_runs = Arc::new(AtomicUsize::new(0));
    let mut pipeline = Pipeline::with_steps(vec![
        Box::new(CountingStep {
            name: "training",
            invocations: first_runs.clone(),
            fail: false,
        }),
        Box::new(CountingStep {
            name: "explanation",
            invocations: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }),
        Box::new(CountingStep {
            name: "publish",
            invocations: third_runs.clone(),
            fail: false,
        }),
    ]);

    match pipeline.run(&PipelineContext::new(paths.clone())).unwrap_err() {
        PipelineError::StepFailed {
            name,
            failure,
            completed,
        } => {
            assert_eq!(name, "explanation");
            assert_eq!(failure.diagnostics, "captured stderr text");
            assert_eq!(completed.len(), 1);
            assert_eq!(completed[0].name, "training");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(first_runs.load(Ordering::SeqCst), 1);
    assert_eq!(third_runs.load(Ordering::SeqCst), 0);
    cleanup(&paths);
}

#[test]
fn successful_run_prepares_directories_and_reports_all_steps() {
    let paths = scratch_paths("success");
    seed_dataset(&paths);

    let mut pipeline = Pipeline::with_steps(vec![
        Box::new(FnStep::new("training", |ctx: &PipelineContext| {
            Ok(format!("would write {}", ctx.paths.model.display()))
        })),
        Box::new(FnStep::new("explanation", |ctx: &PipelineContext| {
            Ok(format!("would write {}", ctx.paths.feature_importance().display()))
        })),
    ]);

    let report = pipeline.run(&PipelineContext::new(paths.clone())).unwrap();
    assert_eq!(report.completed.len(), 2);
    assert!(report.completed[0].output.contains("model.bin"));
    assert!(paths.reports.is_dir());
    assert!(PathBuf::from(paths.dataset.parent().unwrap()).is_dir());
    cleanup(&paths);
}

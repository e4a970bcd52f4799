//! In-process training pipeline runner.
//!
//! Steps are ordered, named, and run to completion one at a time. The first
//! failure aborts the remaining sequence; the failing step's captured
//! diagnostics travel with the error alongside the reports of the steps that
//! did complete. The dataset precondition is checked before any step runs.

use crate::config::PathsConfig;
use std::fmt;
use std::io;
use std::path::PathBuf;
use tracing::{error, info};

/// Shared context handed to every step.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub paths: PathsConfig,
}

impl PipelineContext {
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }
}

/// A step failure with the diagnostic text captured up to the point of
/// failure.
#[derive(Debug)]
pub struct StepFailure {
    pub message: String,
    pub diagnostics: String,
}

impl StepFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            diagnostics: String::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: impl Into<String>) -> Self {
        self.diagnostics = diagnostics.into();
        self
    }
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StepFailure {}

/// One named, run-to-completion unit of the training pipeline. `run` returns
/// the step's diagnostic output on success.
pub trait PipelineStep {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &PipelineContext) -> Result<String, StepFailure>;
}

/// Closure adapter so tests and small tools can define steps inline.
pub struct FnStep<F> {
    name: String,
    body: F,
}

impl<F> FnStep<F>
where
    F: FnMut(&PipelineContext) -> Result<String, StepFailure>,
{
    pub fn new(name: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

impl<F> PipelineStep for FnStep<F>
where
    F: FnMut(&PipelineContext) -> Result<String, StepFailure>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, ctx: &PipelineContext) -> Result<String, StepFailure> {
        (self.body)(ctx)
    }
}

/// Diagnostic record for a completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub name: String,
    pub output: String,
}

/// Reports for a fully completed run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct PipelineRunReport {
    pub completed: Vec<StepReport>,
}

#[derive(Debug)]
pub enum PipelineError {
    /// The raw dataset precondition failed; no step was invoked.
    MissingDataset { path: PathBuf },
    /// Preparing the data/reports directories failed.
    Setup { path: PathBuf, source: io::Error },
    /// A step failed; the remaining sequence was aborted.
    StepFailed {
        name: String,
        failure: StepFailure,
        completed: Vec<StepReport>,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingDataset { path } => {
                let file = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "dataset".to_string());
                write!(
                    f,
                    "{file} not found: place the loan dataset at {}",
                    path.display()
                )
            }
            PipelineError::Setup { path, source } => {
                write!(f, "could not prepare directory {}: {source}", path.display())
            }
            PipelineError::StepFailed { name, failure, .. } => {
                write!(f, "step '{name}' failed: {failure}")
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Setup { source, .. } => Some(source),
            PipelineError::StepFailed { failure, .. } => Some(failure),
            PipelineError::MissingDataset { .. } => None,
        }
    }
}

/// Ordered list of steps with abort-on-first-failure semantics.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_steps(steps: Vec<Box<dyn PipelineStep>>) -> Self {
        Self { steps }
    }

    pub fn push(&mut self, step: Box<dyn PipelineStep>) {
        self.steps.push(step);
    }

    /// Prepare directories, check the dataset precondition, then execute the
    /// steps in order.
    pub fn run(&mut self, ctx: &PipelineContext) -> Result<PipelineRunReport, PipelineError> {
        for dir in ctx.paths.directories() {
            std::fs::create_dir_all(&dir).map_err(|source| PipelineError::Setup {
                path: dir.clone(),
                source,
            })?;
        }

        if !ctx.paths.dataset.exists() {
            return Err(PipelineError::MissingDataset {
                path: ctx.paths.dataset.clone(),
            });
        }

        let mut completed = Vec::with_capacity(self.steps.len());
        for step in &mut self.steps {
            let name = step.name().to_string();
            info!(step = %name, "running pipeline step");

            match step.run(ctx) {
                Ok(output) => {
                    info!(step = %name, "pipeline step completed");
                    completed.push(StepReport { name, output });
                }
                Err(failure) => {
                    error!(step = %name, error = %failure, "pipeline step failed; aborting");
                    return Err(PipelineError::StepFailed {
                        name,
                        failure,
                        completed,
                    });
                }
            }
        }

        Ok(PipelineRunReport { completed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;
    use std::fs;
    use std::path::Path;

    fn temp_paths(tag: &str, with_dataset: bool) -> PathsConfig {
        let root = std::env::temp_dir().join(format!(
            "loan-approval-pipeline-{}-{tag}",
            std::process::id()
        ));
        fs::create_dir_all(root.join("data")).unwrap();
        let paths = PathsConfig {
            dataset: root.join("data/loan_data.csv"),
            model: root.join("data/model.bin"),
            reports: root.join("reports"),
        };
        if with_dataset {
            fs::write(&paths.dataset, "header\n").unwrap();
        }
        paths
    }

    fn cleanup(paths: &PathsConfig) {
        if let Some(root) = paths.dataset.parent().and_then(Path::parent) {
            fs::remove_dir_all(root).ok();
        }
    }

    #[test]
    fn missing_dataset_aborts_before_any_step() {
        let paths = temp_paths("missing", false);
        let ctx = PipelineContext::new(paths.clone());

        let ran = std::rc::Rc::new(std::cell::Cell::new(false));
        let ran_in_step = ran.clone();
        let mut pipeline = Pipeline::new();
        pipeline.push(Box::new(FnStep::new("never runs", move |_ctx| {
            ran_in_step.set(true);
            Ok(String::new())
        })));

        let err = pipeline.run(&ctx).unwrap_err();
        assert!(err.to_string().contains("loan_data.csv not found"));
        assert!(!ran.get(), "no step may run when the dataset is absent");
        cleanup(&paths);
    }

    #[test]
    fn first_failure_aborts_the_remaining_sequence() {
        let paths = temp_paths("abort", true);
        let ctx = PipelineContext::new(paths.clone());

        let mut pipeline = Pipeline::with_steps(vec![
            Box::new(FnStep::new("first", |_ctx| Ok("first output".to_string()))),
            Box::new(FnStep::new("second", |_ctx| {
                Err(StepFailure::new("boom").with_diagnostics("stack trace"))
            })),
            Box::new(FnStep::new("third", |_ctx| {
                panic!("third step must never run")
            })),
        ]);

        match pipeline.run(&ctx).unwrap_err() {
            PipelineError::StepFailed {
                name,
                failure,
                completed,
            } => {
                assert_eq!(name, "second");
                assert_eq!(failure.diagnostics, "stack trace");
                assert_eq!(completed.len(), 1);
                assert_eq!(completed[0].output, "first output");
            }
            other => panic!("unexpected error: {other}"),
        }
        cleanup(&paths);
    }

    #[test]
    fn successful_run_reports_every_step_in_order() {
        let paths = temp_paths("success", true);
        let ctx = PipelineContext::new(paths.clone());

        let mut pipeline = Pipeline::with_steps(vec![
            Box::new(FnStep::new("train", |_ctx| Ok("trained".to_string()))),
            Box::new(FnStep::new("explain", |_ctx| Ok("explained".to_string()))),
        ]);

        let report = pipeline.run(&ctx).unwrap();
        let names: Vec<_> = report
            .completed
            .iter()
            .map(|step| step.name.as_str())
            .collect();
        assert_eq!(names, vec!["train", "explain"]);
        cleanup(&paths);
    }

    #[test]
    fn run_creates_the_report_directories() {
        let paths = temp_paths("dirs", true);
        let ctx = PipelineContext::new(paths.clone());

        Pipeline::new().run(&ctx).unwrap();
        assert!(paths.reports.is_dir());
        cleanup(&paths);
    }
}

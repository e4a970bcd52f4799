use std::env;
use std::fmt;
use std::path::PathBuf;

/// Top-level configuration for the screening pipeline.
///
/// Paths are enumerated once here and threaded to each component as
/// parameters; nothing else references file locations as ambient constants.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let dataset = path_var("LOAN_DATA_PATH", "data/loan_data.csv")?;
        let model = path_var("LOAN_MODEL_PATH", "data/model.bin")?;
        let reports = path_var("LOAN_REPORTS_DIR", "reports")?;
        let log_level = env::var("LOAN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            paths: PathsConfig {
                dataset,
                model,
                reports,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn path_var(name: &'static str, default: &str) -> Result<PathBuf, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { var: name }),
        Ok(value) => Ok(PathBuf::from(value)),
        Err(_) => Ok(PathBuf::from(default)),
    }
}

/// File locations consumed and produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    /// Raw loan dataset (CSV).
    pub dataset: PathBuf,
    /// Serialized model artifact.
    pub model: PathBuf,
    /// Directory receiving explanation reports.
    pub reports: PathBuf,
}

impl PathsConfig {
    /// Processed dataset written next to the raw one.
    pub fn processed_dataset(&self) -> PathBuf {
        self.dataset.with_file_name("processed_data.csv")
    }

    pub fn feature_importance(&self) -> PathBuf {
        self.reports.join("feature_importance.csv")
    }

    pub fn confusion_matrix(&self) -> PathBuf {
        self.reports.join("confusion_matrix.csv")
    }

    /// Directories the pipeline runner prepares before any step executes.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(parent) = self.dataset.parent() {
            if !parent.as_os_str().is_empty() {
                dirs.push(parent.to_path_buf());
            }
        }
        if let Some(parent) = self.model.parent() {
            if !parent.as_os_str().is_empty() && !dirs.contains(&parent.to_path_buf()) {
                dirs.push(parent.to_path_buf());
            }
        }
        dirs.push(self.reports.clone());
        dirs
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyPath { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPath { var } => {
                write!(f, "{var} is set but empty; unset it or provide a path")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

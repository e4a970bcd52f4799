use crate::config::ConfigError;
use crate::dataset::DatasetError;
use crate::domain::InputError;
use crate::model::ModelError;
use crate::pipeline::PipelineError;
use crate::prediction::PredictError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Top-level error surfaced at the process boundary. Every variant is fatal:
/// the binary reports it once on stderr and exits non-zero.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Model(ModelError),
    Dataset(DatasetError),
    Pipeline(PipelineError),
    Prediction(PredictError),
    Input(InputError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Model(err) => write!(f, "{err}"),
            AppError::Dataset(err) => write!(f, "dataset error: {err}"),
            AppError::Pipeline(err) => write!(f, "{err}"),
            AppError::Prediction(err) => write!(f, "prediction error: {err}"),
            AppError::Input(err) => write!(f, "invalid input: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Model(err) => Some(err),
            AppError::Dataset(err) => Some(err),
            AppError::Pipeline(err) => Some(err),
            AppError::Prediction(err) => Some(err),
            AppError::Input(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ModelError> for AppError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl From<DatasetError> for AppError {
    fn from(value: DatasetError) -> Self {
        Self::Dataset(value)
    }
}

impl From<PipelineError> for AppError {
    fn from(value: PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<PredictError> for AppError {
    fn from(value: PredictError) -> Self {
        Self::Prediction(value)
    }
}

impl From<InputError> for AppError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

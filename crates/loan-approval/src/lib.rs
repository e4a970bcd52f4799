//! Loan-approval screening pipeline.
//!
//! The library carries the full screening core: dataset ingestion and
//! preprocessing, the serialized model artifact, the prediction transform,
//! and the in-process pipeline runner. Binaries live in `services/`.

pub mod config;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prediction;
pub mod preprocessing;
pub mod telemetry;

pub use config::{AppConfig, PathsConfig};
pub use domain::{CreditHistory, LoanApplication, LoanDecision};
pub use error::AppError;
pub use model::{Classifier, LogisticModel, ModelArtifact};
pub use prediction::{Prediction, Screener};

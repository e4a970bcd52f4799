//! Persistence for the fitted classifier.
//!
//! The artifact is the only state shared between the training pipeline and
//! the prediction command: a bincode-encoded bundle of the fitted model, the
//! scaler statistics it was trained with, and provenance metadata. It is
//! loaded once per invocation and never mutated.

use super::LogisticModel;
use crate::preprocessing::ScalerStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Feature order the model was fitted on; the prediction transform selects
/// columns in exactly this order.
pub const FEATURE_NAMES: [&str; 3] = ["ApplicantIncome", "LoanAmount", "Credit_History"];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model not found at {}: run the training pipeline first", path.display())]
    NotFound { path: PathBuf },
    #[error("model artifact at {} could not be decoded: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
    #[error("failed to read model artifact at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write model artifact at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode model artifact: {0}")]
    Encode(#[source] bincode::Error),
}

/// Serialized bundle produced by the training step and consumed read-only by
/// the prediction command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: LogisticModel,
    /// Training-time scaler statistics. `None` means the artifact was built
    /// without fitted statistics and inference falls back to raw values.
    pub scaler: Option<ScalerStats>,
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub fn new(model: LogisticModel, scaler: Option<ScalerStats>) -> Self {
        Self {
            model,
            scaler,
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            trained_at: Utc::now(),
        }
    }

    /// Deserialize the artifact from disk. A missing file maps to the
    /// user-facing [`ModelError::NotFound`]; undecodable bytes map to
    /// [`ModelError::Corrupt`]. Neither surfaces a raw panic.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ModelError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ModelError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let artifact: Self = bincode::deserialize(&bytes).map_err(|source| ModelError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            trained_at = %artifact.trained_at,
            scaled = artifact.scaler.is_some(),
            "model artifact loaded"
        );
        Ok(artifact)
    }

    /// Serialize the artifact, creating the parent directory if needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ModelError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let bytes = bincode::serialize(self).map_err(ModelError::Encode)?;
        fs::write(path, bytes).map_err(|source| ModelError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "model artifact saved");
        Ok(())
    }
}

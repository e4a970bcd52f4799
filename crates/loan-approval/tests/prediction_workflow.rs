//! End-to-end specifications for the screening path: artifact on disk, loader,
//! and prediction transform, exercised through the public API only.

use loan_approval::domain::{CreditHistory, LoanApplication, LoanDecision};
use loan_approval::model::{Classifier, LogisticModel, ModelArtifact, ModelError};
use loan_approval::prediction::{FeatureVector, PredictError, Screener};
use loan_approval::preprocessing::{ColumnStats, ScalerStats};
use std::path::PathBuf;

/// Deterministic classifier double: approves exactly the golden vector.
struct StubModel;

impl Classifier for StubModel {
    fn predict(&self, features: &FeatureVector) -> LoanDecision {
        if features.as_array() == [5000.0, 100.0, 1.0] {
            LoanDecision::Approved
        } else {
            LoanDecision::Rejected
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2] {
        if features.as_array() == [5000.0, 100.0, 1.0] {
            [0.2, 0.8]
        } else {
            [0.9, 0.1]
        }
    }
}

fn temp_artifact_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("loan-approval-it-{}-{name}", std::process::id()))
}

#[test]
fn golden_vector_surfaces_exactly() {
    let screener = Screener::new(StubModel, None);
    let application = LoanApplication::new(5000.0, 100.0, CreditHistory::Good);

    let prediction = screener.screen(&application).expect("screening succeeds");
    assert_eq!(prediction.decision, LoanDecision::Approved);
    assert_eq!(prediction.probabilities, [0.2, 0.8]);
    assert_eq!(prediction.approval_probability(), 0.8);
    assert_eq!(prediction.rejection_probability(), 0.2);
}

#[test]
fn missing_credit_history_never_defaults() {
    let screener = Screener::new(StubModel, None);
    let application = LoanApplication {
        applicant_income: Some(5000.0),
        loan_amount: Some(100.0),
        ..LoanApplication::default()
    };

    assert_eq!(
        screener.screen(&application),
        Err(PredictError::MissingFeature("Credit_History"))
    );
}

#[test]
fn artifact_round_trip_preserves_screening_behavior() {
    let path = temp_artifact_path("roundtrip.bin");
    let scaler = ScalerStats {
        applicant_income: ColumnStats {
            mean: 5400.0,
            std: 2000.0,
        },
        loan_amount: ColumnStats {
            mean: 140.0,
            std: 80.0,
        },
    };
    let model = LogisticModel::new([0.6, -0.5, 2.2], -0.8);
    ModelArtifact::new(model.clone(), Some(scaler))
        .save(&path)
        .expect("artifact saves");

    let loaded = ModelArtifact::load(&path).expect("artifact loads");
    let screener = Screener::from_artifact(loaded);
    let direct = Screener::new(model, Some(scaler));

    let application = LoanApplication::new(6100.0, 95.0, CreditHistory::Good);
    let from_disk = screener.screen(&application).unwrap();
    let in_memory = direct.screen(&application).unwrap();
    assert_eq!(from_disk, in_memory);
    assert!((from_disk.probabilities[0] + from_disk.probabilities[1] - 1.0).abs() < 1e-12);

    std::fs::remove_file(&path).ok();
}

#[test]
fn loader_reports_missing_artifact_as_a_user_facing_condition() {
    let err = ModelArtifact::load(temp_artifact_path("absent.bin")).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { .. }));
    let message = err.to_string();
    assert!(message.contains("model not found"));
    assert!(message.contains("run the training pipeline first"));
}

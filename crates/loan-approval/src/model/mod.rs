//! Classifier abstraction and the serialized model artifact.

pub mod artifact;

pub use artifact::{ModelArtifact, ModelError, FEATURE_NAMES};

use crate::domain::LoanDecision;
use crate::prediction::FeatureVector;
use serde::{Deserialize, Serialize};

/// Binary classifier over the fixed 3-feature vector. The trait keeps the
/// prediction transform independent of the concrete model so tests can
/// substitute deterministic stubs.
pub trait Classifier {
    /// Deterministic class prediction.
    fn predict(&self, features: &FeatureVector) -> LoanDecision;

    /// Class probabilities as `[P(reject), P(approve)]`, summing to 1.0.
    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2];
}

/// Logistic classifier with one weight per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    weights: [f64; 3],
    bias: f64,
}

impl LogisticModel {
    pub fn new(weights: [f64; 3], bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn weights(&self) -> [f64; 3] {
        self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Probability of approval for one feature vector.
    pub fn approval_probability(&self, features: &FeatureVector) -> f64 {
        let x = features.as_array();
        let logit: f64 = self
            .weights
            .iter()
            .zip(x.iter())
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.bias;
        sigmoid(logit)
    }
}

fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> LoanDecision {
        if self.approval_probability(features) >= 0.5 {
            LoanDecision::Approved
        } else {
            LoanDecision::Rejected
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2] {
        let approve = self.approval_probability(features);
        [1.0 - approve, approve]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(income: f64, loan: f64, credit: f64) -> FeatureVector {
        FeatureVector {
            applicant_income: income,
            loan_amount: loan,
            credit_history: credit,
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let model = LogisticModel::new([0.3, -0.2, 1.5], -0.4);
        let proba = model.predict_proba(&features(0.5, -0.1, 1.0));
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn decision_matches_probability_threshold() {
        let model = LogisticModel::new([0.0, 0.0, 4.0], -2.0);
        // Good credit pushes the logit to +2, bad credit to -2.
        assert_eq!(
            model.predict(&features(0.0, 0.0, 1.0)),
            LoanDecision::Approved
        );
        assert_eq!(
            model.predict(&features(0.0, 0.0, 0.0)),
            LoanDecision::Rejected
        );
    }

    #[test]
    fn good_credit_never_lowers_approval_odds() {
        let model = LogisticModel::new([0.1, -0.3, 2.0], 0.0);
        let bad = model.approval_probability(&features(1.0, 1.0, 0.0));
        let good = model.approval_probability(&features(1.0, 1.0, 1.0));
        assert!(good > bad);
    }
}

//! Categorical encoding over the fixed screening vocabulary.
//!
//! The mapping is a fixed bijection inherited from the training data:
//! `Male→1, Female→0, Yes→1, No→0, Graduate→1, Not Graduate→0`. Anything
//! outside the vocabulary comes back tagged as [`EncodedCategorical::Unknown`]
//! so callers choose between failing fast and treating the feature as
//! missing, instead of inheriting silent corruption.

use crate::domain::LoanApplication;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Categorical fields the encoder recognizes, in dataset column order.
pub const CATEGORICAL_FIELDS: [&str; 4] = ["Gender", "Married", "Education", "Self_Employed"];

static VOCABULARY: OnceLock<HashMap<&'static str, u8>> = OnceLock::new();

fn vocabulary() -> &'static HashMap<&'static str, u8> {
    VOCABULARY.get_or_init(|| {
        const ENTRIES: &[(&str, u8)] = &[
            ("Male", 1),
            ("Female", 0),
            ("Yes", 1),
            ("No", 0),
            ("Graduate", 1),
            ("Not Graduate", 0),
        ];
        ENTRIES.iter().copied().collect()
    })
}

/// Result of encoding one categorical attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedCategorical {
    /// In-vocabulary value mapped to its binary code.
    Known(u8),
    /// Out-of-vocabulary value, carried verbatim for diagnostics.
    Unknown(String),
}

impl EncodedCategorical {
    /// The usable feature value, if any.
    pub fn as_feature(&self) -> Option<f64> {
        match self {
            Self::Known(code) => Some(f64::from(*code)),
            Self::Unknown(_) => None,
        }
    }
}

/// Encode a single raw categorical value. Surrounding whitespace is ignored;
/// the lookup itself is exact-match.
pub fn encode_value(raw: &str) -> EncodedCategorical {
    match vocabulary().get(raw.trim()) {
        Some(code) => EncodedCategorical::Known(*code),
        None => EncodedCategorical::Unknown(raw.trim().to_string()),
    }
}

/// Encoded view of an application's categorical attributes. Fields that were
/// absent from the record stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedCategoricals {
    pub gender: Option<EncodedCategorical>,
    pub married: Option<EncodedCategorical>,
    pub education: Option<EncodedCategorical>,
    pub self_employed: Option<EncodedCategorical>,
}

/// Encode every categorical field present on the record.
pub fn encode_application(application: &LoanApplication) -> EncodedCategoricals {
    let encode = |raw: &Option<String>| raw.as_deref().map(encode_value);

    EncodedCategoricals {
        gender: encode(&application.gender),
        married: encode(&application.married),
        education: encode(&application.education),
        self_employed: encode(&application.self_employed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreditHistory, LoanApplication};

    #[test]
    fn vocabulary_maps_to_binary_codes_only() {
        for raw in ["Male", "Female", "Yes", "No", "Graduate", "Not Graduate"] {
            match encode_value(raw) {
                EncodedCategorical::Known(code) => assert!(code <= 1, "{raw} -> {code}"),
                EncodedCategorical::Unknown(value) => panic!("{value} should be in vocabulary"),
            }
        }
        assert_eq!(encode_value("Male"), EncodedCategorical::Known(1));
        assert_eq!(encode_value("Not Graduate"), EncodedCategorical::Known(0));
    }

    #[test]
    fn whitespace_is_trimmed_before_lookup() {
        assert_eq!(encode_value("  Yes "), EncodedCategorical::Known(1));
    }

    #[test]
    fn out_of_vocabulary_values_are_tagged_not_dropped() {
        assert_eq!(
            encode_value("Divorced"),
            EncodedCategorical::Unknown("Divorced".to_string())
        );
        assert_eq!(encode_value("Divorced").as_feature(), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        // "male" is not in the training vocabulary and must not match.
        assert!(matches!(
            encode_value("male"),
            EncodedCategorical::Unknown(_)
        ));
    }

    #[test]
    fn absent_fields_stay_untouched() {
        let app = LoanApplication::new(1000.0, 50.0, CreditHistory::Good).with_gender("Female");
        let encoded = encode_application(&app);
        assert_eq!(encoded.gender, Some(EncodedCategorical::Known(0)));
        assert_eq!(encoded.married, None);
        assert_eq!(encoded.education, None);
        assert_eq!(encoded.self_employed, None);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary credit-history flag carried by every scored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditHistory {
    Good,
    Bad,
}

impl CreditHistory {
    /// Parse the 0/1 flag used by the dataset and the console prompt.
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            1 => Some(Self::Good),
            0 => Some(Self::Bad),
            _ => None,
        }
    }

    pub fn as_feature(self) -> f64 {
        match self {
            Self::Good => 1.0,
            Self::Bad => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }
}

/// Outcome of screening one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanDecision {
    Approved,
    Rejected,
}

impl LoanDecision {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Self::Approved
        } else {
            Self::Rejected
        }
    }

    pub fn as_label(self) -> u8 {
        match self {
            Self::Approved => 1,
            Self::Rejected => 0,
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Self::Approved => "Yes",
            Self::Rejected => "No",
        }
    }
}

/// One applicant's raw attributes as entered or ingested.
///
/// Required numeric fields are `Option`-typed so an absent field is
/// representable; the prediction transform fails on missing values instead
/// of defaulting. Categorical strings stay raw until the encoder runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub applicant_income: Option<f64>,
    pub loan_amount: Option<f64>,
    pub credit_history: Option<CreditHistory>,
    pub gender: Option<String>,
    pub married: Option<String>,
    pub education: Option<String>,
    pub self_employed: Option<String>,
}

impl LoanApplication {
    pub fn new(income: f64, loan_amount: f64, credit_history: CreditHistory) -> Self {
        Self {
            applicant_income: Some(income),
            loan_amount: Some(loan_amount),
            credit_history: Some(credit_history),
            ..Self::default()
        }
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_married(mut self, married: impl Into<String>) -> Self {
        self.married = Some(married.into());
        self
    }

    pub fn with_education(mut self, education: impl Into<String>) -> Self {
        self.education = Some(education.into());
        self
    }

    pub fn with_self_employed(mut self, self_employed: impl Into<String>) -> Self {
        self.self_employed = Some(self_employed.into());
        self
    }
}

/// Console or flag input that failed type coercion.
#[derive(Debug)]
pub struct InputError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not read {} from '{}': expected {}",
            self.field, self.value, self.expected
        )
    }
}

impl std::error::Error for InputError {}

/// Parse a non-negative monetary amount from raw console input.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| InputError {
            field,
            value: raw.trim().to_string(),
            expected: "a non-negative number",
        })
}

/// Parse the 0/1 credit-history flag from raw console input.
pub fn parse_credit_flag(raw: &str) -> Result<CreditHistory, InputError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(CreditHistory::from_flag)
        .ok_or_else(|| InputError {
            field: "Credit_History",
            value: raw.trim().to_string(),
            expected: "1 for good or 0 for bad",
        })
}

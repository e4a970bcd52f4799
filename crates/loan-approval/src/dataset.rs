//! Loan dataset ingestion and batch preprocessing.
//!
//! The raw CSV carries the applicant attributes plus a `Loan_Status` label.
//! Preprocessing encodes the categorical columns, fits scaler statistics over
//! the batch, scales the numeric columns, and drops rows that are missing a
//! required feature or the label. Dropped rows and out-of-vocabulary
//! categorical values are logged, never silently defaulted.

use crate::domain::{CreditHistory, LoanApplication};
use crate::preprocessing::{
    encode_application, ColumnStats, EncodedCategorical, ScalerError, ScalerStats,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset contains no usable rows (required: income, loan amount, credit history, label)")]
    NoUsableRows,
    #[error("failed to fit scaler statistics: {0}")]
    Scaler(#[from] ScalerError),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One dataset row with its approval label, before preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledApplication {
    pub application: LoanApplication,
    /// `Loan_Status` mapped from Y/N; `None` when the label is absent.
    pub approved: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct LoanRow {
    #[serde(rename = "Gender", default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(rename = "Married", default, deserialize_with = "empty_string_as_none")]
    married: Option<String>,
    #[serde(rename = "Education", default, deserialize_with = "empty_string_as_none")]
    education: Option<String>,
    #[serde(
        rename = "Self_Employed",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    self_employed: Option<String>,
    #[serde(rename = "ApplicantIncome", default)]
    applicant_income: Option<f64>,
    #[serde(rename = "LoanAmount", default)]
    loan_amount: Option<f64>,
    #[serde(rename = "Credit_History", default)]
    credit_history: Option<f64>,
    #[serde(
        rename = "Loan_Status",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    loan_status: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

impl LoanRow {
    fn into_labeled(self) -> LabeledApplication {
        let credit_history = self.credit_history.and_then(|raw| {
            let flag = raw as i64;
            if (flag == 0 || flag == 1) && (raw - flag as f64).abs() < f64::EPSILON {
                CreditHistory::from_flag(flag as u8)
            } else {
                warn!(value = raw, "Credit_History outside {{0, 1}}; treating as missing");
                None
            }
        });

        let approved = self.loan_status.as_deref().and_then(|status| {
            match status.trim() {
                "Y" => Some(true),
                "N" => Some(false),
                other => {
                    warn!(value = other, "unrecognized Loan_Status; treating as missing");
                    None
                }
            }
        });

        LabeledApplication {
            application: LoanApplication {
                applicant_income: self.applicant_income,
                loan_amount: self.loan_amount,
                credit_history,
                gender: self.gender,
                married: self.married,
                education: self.education,
                self_employed: self.self_employed,
            },
            approved,
        }
    }
}

/// Parse labeled applications from any reader.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<LabeledApplication>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<LoanRow>() {
        records.push(row?.into_labeled());
    }
    Ok(records)
}

/// Load the raw dataset from disk.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledApplication>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(file)
}

/// One fully preprocessed row: scaled numerics, encoded categoricals, label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedRow {
    #[serde(rename = "ApplicantIncome")]
    pub applicant_income: f64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
    #[serde(rename = "Credit_History")]
    pub credit_history: u8,
    #[serde(rename = "Gender")]
    pub gender: Option<u8>,
    #[serde(rename = "Married")]
    pub married: Option<u8>,
    #[serde(rename = "Education")]
    pub education: Option<u8>,
    #[serde(rename = "Self_Employed")]
    pub self_employed: Option<u8>,
    #[serde(rename = "Loan_Status")]
    pub approved: u8,
}

/// Result of batch preprocessing: training-ready rows plus the statistics
/// they were scaled with.
#[derive(Debug, Clone)]
pub struct ProcessedDataset {
    pub rows: Vec<ProcessedRow>,
    pub scaler: ScalerStats,
    /// Rows discarded for missing a required feature or the label.
    pub dropped: usize,
}

impl ProcessedDataset {
    /// Feature matrix and labels in model order.
    pub fn training_rows(&self) -> (Vec<[f64; 3]>, Vec<f64>) {
        let features = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.applicant_income,
                    row.loan_amount,
                    f64::from(row.credit_history),
                ]
            })
            .collect();
        let labels = self.rows.iter().map(|row| f64::from(row.approved)).collect();
        (features, labels)
    }
}

fn encoded_code(field: &'static str, encoded: Option<EncodedCategorical>) -> Option<u8> {
    match encoded {
        Some(EncodedCategorical::Known(code)) => Some(code),
        Some(EncodedCategorical::Unknown(value)) => {
            warn!(field, value = %value, "out-of-vocabulary categorical; feature treated as missing");
            None
        }
        None => None,
    }
}

/// Encode, fit, and scale a batch of labeled applications.
pub fn preprocess(records: &[LabeledApplication]) -> Result<ProcessedDataset, DatasetError> {
    struct Kept {
        income: f64,
        loan: f64,
        credit: CreditHistory,
        gender: Option<u8>,
        married: Option<u8>,
        education: Option<u8>,
        self_employed: Option<u8>,
        approved: bool,
    }

    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        let app = &record.application;
        let (Some(income), Some(loan), Some(credit), Some(approved)) = (
            app.applicant_income,
            app.loan_amount,
            app.credit_history,
            record.approved,
        ) else {
            dropped += 1;
            continue;
        };

        let encoded = encode_application(app);
        kept.push(Kept {
            income,
            loan,
            credit,
            gender: encoded_code("Gender", encoded.gender),
            married: encoded_code("Married", encoded.married),
            education: encoded_code("Education", encoded.education),
            self_employed: encoded_code("Self_Employed", encoded.self_employed),
            approved,
        });
    }

    if kept.is_empty() {
        return Err(DatasetError::NoUsableRows);
    }
    if dropped > 0 {
        warn!(dropped, kept = kept.len(), "dropped incomplete dataset rows");
    }

    let incomes: Vec<f64> = kept.iter().map(|row| row.income).collect();
    let loans: Vec<f64> = kept.iter().map(|row| row.loan).collect();
    let scaler = ScalerStats {
        applicant_income: ColumnStats::fit(&incomes)?,
        loan_amount: ColumnStats::fit(&loans)?,
    };

    let rows = kept
        .into_iter()
        .map(|row| ProcessedRow {
            applicant_income: scaler.applicant_income.apply(row.income),
            loan_amount: scaler.loan_amount.apply(row.loan),
            credit_history: row.credit.as_feature() as u8,
            gender: row.gender,
            married: row.married,
            education: row.education,
            self_employed: row.self_employed,
            approved: u8::from(row.approved),
        })
        .collect();

    Ok(ProcessedDataset {
        rows,
        scaler,
        dropped,
    })
}

/// Write the processed rows next to the raw dataset.
pub fn write_processed_csv<P: AsRef<Path>>(
    path: P,
    dataset: &ProcessedDataset,
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).map_err(|source| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    for row in &dataset.rows {
        writer.serialize(row).map_err(|source| DatasetError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    writer.flush().map_err(|source| DatasetError::Write {
        path: path.to_path_buf(),
        source: csv::Error::from(source),
    })?;
    Ok(())
}

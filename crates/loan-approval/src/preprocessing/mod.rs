//! Input preprocessing: categorical encoding and z-score scaling.

pub mod encoder;
pub mod scaler;

pub use encoder::{encode_application, encode_value, EncodedCategorical, EncodedCategoricals};
pub use scaler::{zscore_batch, ColumnStats, ScalerError, ScalerStats};

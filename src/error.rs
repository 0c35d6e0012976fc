//! Error taxonomy for the profiling pipeline.
//!
//! Configuration errors are raised before any input is touched. Per-field data
//! errors carry the offending field name. [`ProfileError::DegenerateRange`] never
//! escapes [`crate::report::profile_column`]; it is recovered there by falling
//! back to a frequency table.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    /// The input path does not exist or cannot be opened.
    #[error("Input file {path:?} not found or unreadable")]
    InputNotFound { path: PathBuf },

    /// A column has no rows to profile.
    #[error("Column '{field}' has no data rows")]
    EmptyColumn { field: String },

    /// A numeric column has no spread to bin: every present value is `value`,
    /// or there are no present values at all (`value` is NaN).
    #[error("Column '{field}' cannot be binned: min = max = {value}")]
    DegenerateRange { field: String, value: f64 },

    /// Columns handed to [`crate::data::Table::new`] differ in length.
    #[error("Column '{field}' has {actual} row(s), expected {expected}")]
    ShapeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported sort mode '{0}' (expected 'index' or 'value')")]
    UnsupportedSortMode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The configuration file exists but could not be parsed.
    #[error("Failed to load configuration from {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    /// Malformed or undecodable input content.
    #[error("Failed to read {path:?} at line {line}: {message}")]
    Read {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Failed to write report to {path:?}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProfileError {
    /// Name of the field the error is attached to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ProfileError::EmptyColumn { field } | ProfileError::DegenerateRange { field, .. } => {
                Some(field.as_str())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;

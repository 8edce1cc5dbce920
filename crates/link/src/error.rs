use std::fmt;

use crate::model::Dataset;

#[derive(Debug)]
pub enum LinkError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold out of range, empty column name, etc.).
    ConfigValidation(String),
    /// Missing required column in an input table.
    MissingColumn { dataset: Dataset, column: String },
    /// Input is not readable as a CSV table.
    Csv { dataset: Dataset, message: String },
    /// A cell could not be parsed into its column type.
    InvalidValue {
        dataset: Dataset,
        record_id: String,
        column: String,
        value: String,
    },
    /// A key column that must be unique holds the same value twice.
    DuplicateId { dataset: Dataset, id: String },
    /// A key column that must be present is empty.
    EmptyId { dataset: Dataset, line: u64 },
    /// IO error (file read, output write).
    Io(String),
}

impl LinkError {
    /// True for every failure that means "an input table could not be parsed".
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::Csv { .. }
                | Self::InvalidValue { .. }
                | Self::DuplicateId { .. }
                | Self::EmptyId { .. }
        )
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { dataset, column } => {
                write!(f, "{dataset}: missing column '{column}'")
            }
            Self::Csv { dataset, message } => write!(f, "{dataset}: cannot parse CSV: {message}"),
            Self::InvalidValue { dataset, record_id, column, value } => {
                write!(f, "{dataset}, record '{record_id}': cannot parse {column} '{value}'")
            }
            Self::DuplicateId { dataset, id } => write!(f, "{dataset}: duplicate id '{id}'"),
            Self::EmptyId { dataset, line } => write!(f, "{dataset}: empty id on line {line}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for LinkError {}

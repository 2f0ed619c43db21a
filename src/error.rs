//! Error types for tree induction, scoring and ingestion.

use core::fmt;

/// # Overview
///
/// Errors that can occur when loading data, building a tree or querying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    FieldNotFound { field: String },
    NotCategorical { field: String },
    NotNumeric { field: String },
    EmptyDataset,
    MissingClassColumn,
    InvalidSignificance,
    MissingHeader,
    InvalidNumber { line: usize, field: String, value: String },
    RecordLength { line: usize, expected: usize, got: usize },
    Csv(String)
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldNotFound {
                field
            } => write!(f, "field \"{field}\" does not exist in dataset"),
            Self::NotCategorical {
                field
            } => write!(f, "field \"{field}\" is not categorical"),
            Self::NotNumeric {
                field
            } => write!(f, "field \"{field}\" is not numeric"),
            Self::EmptyDataset => write!(f, "dataset cannot be empty"),
            Self::MissingClassColumn => write!(f, "class_column is required"),
            Self::InvalidSignificance => {
                write!(f, "significance must be finite and >= 0")
            }
            Self::MissingHeader => write!(f, "csv input has no header row"),
            Self::InvalidNumber {
                line,
                field,
                value
            } => write!(
                f,
                "format error at line {line}: invalid value \"{value}\" for numerical field \"{field}\""
            ),
            Self::RecordLength {
                line,
                expected,
                got
            } => {
                write!(f, "record length mismatch at line {line}: expected {expected}, got {got}")
            }
            Self::Csv(msg) => write!(f, "csv error: {msg}")
        }
    }
}

impl std::error::Error for Error {}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// # Overview
///
/// Result type for crate operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_field_not_found() {
        let err = Error::FieldNotFound {
            field: "colour".into()
        };
        assert_eq!(err.to_string(), "field \"colour\" does not exist in dataset");
    }

    #[test]
    fn display_invalid_number() {
        let err = Error::InvalidNumber {
            line:  3,
            field: "x".into(),
            value: "abc".into()
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("\"abc\""));
    }
}

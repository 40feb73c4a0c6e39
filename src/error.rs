use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a failed run, as reported on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    EmptyInput,
    UnclassifiedFailure,
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("input file is empty")]
    EmptyInput,

    #[error("missing expected column '{0}'")]
    MissingColumn(String),

    #[error("expected {expected} fields in line {line}, saw {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl NormalizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NormalizeError::FileNotFound(_) => ErrorKind::FileNotFound,
            NormalizeError::EmptyInput => ErrorKind::EmptyInput,
            NormalizeError::MissingColumn(_)
            | NormalizeError::MalformedRow { .. }
            | NormalizeError::Csv(_)
            | NormalizeError::Io(_) => ErrorKind::UnclassifiedFailure,
        }
    }

    /// The single line printed to the console when a run fails.
    pub fn console_message(&self) -> String {
        match self.kind() {
            ErrorKind::FileNotFound => "Error: Input file not found.".to_string(),
            ErrorKind::EmptyInput => "Error: Input file is empty.".to_string(),
            ErrorKind::UnclassifiedFailure => {
                format!("An error occurred during data cleaning: {}", self)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;

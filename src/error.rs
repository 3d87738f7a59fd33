// ⚠️ Error Types - every failure the ledger can report
//
// Library code returns JobError; the binary wraps it in anyhow.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a failure, used by callers that only care
/// about *which* rule was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An argument had the wrong structural type.
    Type,
    /// A Job field failed a content rule.
    InvalidField,
    /// A (name, date) pair would go over the daily limit.
    CapacityExceeded,
    /// The referenced Job is not in the ledger.
    NotFound,
    /// A ledger file had a bad header or an unparsable row.
    Format,
    /// A ledger file does not exist.
    FileNotFound,
    /// Any other I/O failure.
    Io,
}

#[derive(Debug, Error)]
pub enum JobError {
    /// A whole argument was not what the operation expects
    /// (e.g. a JSON value that is not an object where a Job is required).
    #[error("{what} must be {expected}")]
    NotA {
        what: &'static str,
        expected: &'static str,
    },

    /// A Job field carried a value of the wrong type.
    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// A text field was empty after trimming.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A numeric field was zero, negative or not finite.
    #[error("{0} must be positive")]
    NonPositive(&'static str),

    /// A single Job asked for more hours than one job may have.
    #[error("hours cannot exceed {max} for a single job (got {hours})")]
    HoursExceeded { hours: i64, max: u32 },

    #[error(
        "worker {name} is not available on {date}: {booked} hours booked, \
         {requested} more would exceed {limit}"
    )]
    CapacityExceeded {
        name: String,
        date: String,
        booked: u32,
        requested: u32,
        limit: u32,
    },

    #[error("job not found: {0}")]
    NotFound(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid header in {}: expected `{expected}`, found `{found}`", .path.display())]
    BadHeader {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("invalid row at {}:{line}: {message}", .path.display())]
    BadRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl JobError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::NotA { .. } => ErrorKind::Type,
            JobError::WrongType { .. }
            | JobError::EmptyField(_)
            | JobError::NonPositive(_)
            | JobError::HoursExceeded { .. } => ErrorKind::InvalidField,
            JobError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            JobError::NotFound(_) => ErrorKind::NotFound,
            JobError::FileNotFound(_) => ErrorKind::FileNotFound,
            JobError::BadHeader { .. } | JobError::BadRow { .. } => ErrorKind::Format,
            JobError::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, JobError>;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_share_kind() {
        assert_eq!(
            JobError::EmptyField("name").kind(),
            ErrorKind::InvalidField
        );
        assert_eq!(
            JobError::WrongType { field: "rate", expected: "a number" }.kind(),
            ErrorKind::InvalidField
        );
        assert_eq!(
            JobError::HoursExceeded { hours: 7, max: 6 }.kind(),
            ErrorKind::InvalidField
        );
    }

    #[test]
    fn test_messages_name_the_field() {
        assert_eq!(JobError::EmptyField("date").to_string(), "date cannot be empty");
        assert_eq!(JobError::NonPositive("rate").to_string(), "rate must be positive");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: JobError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}

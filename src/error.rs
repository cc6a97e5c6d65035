//! implementation for [`ConversionError`]
use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// The kind of failure, callers can match on it to decide whether a run should be skipped or
/// aborted. Version inconsistencies for example are usually skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed path template or unreadable option value.
    Format,
    /// Schema the target language can't express, like an untyped `any`.
    UnsupportedSchema,
    /// Two distinct schemas resolve to the same message name.
    NameCollision,
    /// The methods of one service disagree on their api version.
    InconsistentApiVersions,
    /// The inline schema configuration no longer matches the document.
    ConfigurationDrift,
    /// Input that is not a valid document or configuration.
    InvalidArgument,
    /// Proto text that could not be read back.
    Parse,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::Format => "format",
            ErrorKind::UnsupportedSchema => "unsupported schema",
            ErrorKind::NameCollision => "name collision",
            ErrorKind::InconsistentApiVersions => "inconsistent api versions",
            ErrorKind::ConfigurationDrift => "configuration drift",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::Parse => "parse",
        };
        write!(f, "{}", s)
    }
}

/// Error struct which makes it easy to know what kind of problem stopped the conversion. When
/// several problems were found in one pass, like with the inline schema configuration, all of them
/// are in details.
#[derive(Debug, PartialEq)]
pub struct ConversionError {
    pub kind: ErrorKind,
    pub error: String,
    pub cause: Option<String>,
    pub details: Vec<String>,
}

/// Implements standard error so error handling can be simplified
impl Error for ConversionError {}

/// Implements clone so the same failure can be reported to several callers
impl Clone for ConversionError {
    fn clone(&self) -> ConversionError {
        ConversionError {
            kind: self.kind,
            error: self.error.clone(),
            cause: self.cause.as_ref().cloned(),
            details: self.details.clone(),
        }
    }
}

/// Gives the information from the error in a readable format.
impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(
                f,
                "Error ({}): {}, was caused by {}",
                self.kind, self.error, &cause
            )?,
            None => write!(f, "Error ({}): {}", self.kind, self.error)?,
        }
        for detail in &self.details {
            write!(f, "\n  - {}", detail)?;
        }
        Ok(())
    }
}

impl ConversionError {
    pub fn new(kind: ErrorKind, error: &str, cause: Option<String>) -> ConversionError {
        ConversionError {
            kind,
            error: error.to_owned(),
            cause,
            details: Vec::new(),
        }
    }
    pub fn with_cause<T: Display>(kind: ErrorKind, cause: T, error: &str) -> ConversionError {
        ConversionError::new(kind, error, Some(format!("{}", cause)))
    }
    pub fn format(error: &str) -> ConversionError {
        ConversionError::new(ErrorKind::Format, error, None)
    }
    pub fn unsupported(error: &str) -> ConversionError {
        ConversionError::new(ErrorKind::UnsupportedSchema, error, None)
    }
    pub fn invalid_argument(error: &str) -> ConversionError {
        ConversionError::new(ErrorKind::InvalidArgument, error, None)
    }
    pub fn parse(error: &str) -> ConversionError {
        ConversionError::new(ErrorKind::Parse, error, None)
    }
    /// Creates one error for a batch of problems found in the same pass.
    pub fn aggregate(kind: ErrorKind, error: &str, details: Vec<String>) -> ConversionError {
        ConversionError {
            kind,
            error: error.to_owned(),
            cause: None,
            details,
        }
    }
    pub fn is_inconsistent_api_versions(&self) -> bool {
        self.kind == ErrorKind::InconsistentApiVersions
    }
}

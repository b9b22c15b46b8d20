//! Crate-level error types.

use std::fmt;

use crate::quality::reader::SchemaError;

/// Errors produced by the viso-qa crate.
///
/// Missing or malformed quality metadata is not an error: it degrades to
/// "no data". These variants cover the configuration surface and callers
/// that explicitly ask for schema validation.
#[derive(Debug)]
pub enum QaError {
    /// Metric tables are missing or lack required columns.
    Schema(SchemaError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for QaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "metric schema error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for QaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<SchemaError> for QaError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<std::io::Error> for QaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

use std::fmt;

/// Errors surfaced by the text model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// A movement or expansion was requested with a unit the model does not
    /// support.
    UnsupportedUnit(String),
    /// Programmer error, e.g. rewinding a character iterator twice without an
    /// intervening step.
    InvalidOperation(&'static str),
    /// A search pattern failed to compile.
    InvalidPattern(String),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextError::UnsupportedUnit(unit) => write!(f, "unsupported unit: {unit:?}"),
            TextError::InvalidOperation(msg) => write!(f, "invalid operation: {msg}"),
            TextError::InvalidPattern(msg) => write!(f, "invalid pattern: {msg}"),
        }
    }
}

impl std::error::Error for TextError {}

//! Error types for datastore model validation and encoding.

use thiserror::Error;

/// Primary error type for datastore operations.
///
/// Every validation failure is raised synchronously at the point of
/// construction or mutation; a rejected setter leaves prior state unchanged.
#[derive(Error, Debug)]
pub enum DsError {
    // Identity errors
    #[error("Invalid object index {index}: must be 1-255")]
    IndexOutOfRange { index: u16 },

    #[error("Position {position} out of range: collection has {len} entries")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("Unknown wire id {id:#06x}: high byte matches no object kind")]
    UnknownWireId { id: u16 },

    // Bound errors
    #[error("Unsupported size {size} for {kind}: valid sizes are {valid:?}")]
    UnsupportedSize {
        kind: &'static str,
        size: u8,
        valid: &'static [u8],
    },

    #[error("Invalid limits [{min}, {max}]: {reason}")]
    InvalidLimits {
        min: String,
        max: String,
        reason: String,
    },

    #[error("Invalid default {value}: must be within [{min}, {max}]")]
    InvalidDefault {
        value: String,
        min: String,
        max: String,
    },

    #[error("Invalid time {ms}ms: must be 1000-65535")]
    InvalidTime { ms: u32 },

    #[error("Invalid element '{element}': {reason}")]
    InvalidElement { element: String, reason: String },

    // Collection errors
    #[error("Not found: {what}")]
    NotFound { what: String },

    // Document / encoding errors
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    #[error("Wire encoding error: {0}")]
    WireEncode(String),

    #[error("Wire decoding error: {0}")]
    WireDecode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DsError {
    /// Returns true if the error is recoverable by the user editing input.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::PositionOutOfRange { .. }
                | Self::UnsupportedSize { .. }
                | Self::InvalidLimits { .. }
                | Self::InvalidDefault { .. }
                | Self::InvalidTime { .. }
                | Self::InvalidElement { .. }
                | Self::NotFound { .. }
                | Self::DocumentParse(_)
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::IndexOutOfRange { .. } => Some("Use an object index between 1 and 255"),
            Self::UnsupportedSize { .. } => {
                Some("Integers support sizes 1, 2, 4, 8; floats support 4, 8")
            }
            Self::InvalidTime { .. } => Some("Use a time between 1000 and 65535 milliseconds"),
            Self::DocumentParse(_) => Some("Check the document against the schema"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using DsError.
pub type Result<T> = std::result::Result<T, DsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_recoverable() {
        assert!(DsError::IndexOutOfRange { index: 0 }.is_user_recoverable());
        assert!(DsError::InvalidTime { ms: 500 }.is_user_recoverable());
        assert!(
            DsError::NotFound {
                what: "button".to_string()
            }
            .is_user_recoverable()
        );
    }

    #[test]
    fn test_encoding_errors_are_not_recoverable() {
        assert!(!DsError::WireEncode("broken".to_string()).is_user_recoverable());
        assert!(!DsError::UnknownWireId { id: 0xAA01 }.is_user_recoverable());
    }

    #[test]
    fn test_suggestions() {
        assert!(
            DsError::IndexOutOfRange { index: 300 }
                .suggestion()
                .is_some()
        );
        assert!(
            DsError::NotFound {
                what: "x".to_string()
            }
            .suggestion()
            .is_none()
        );
    }
}

//! Error types for generation and encoding.
//!
//! Every variant here is a contract violation: a malformed descriptor, a value
//! that does not match its descriptor, or bytes that are not a valid
//! encoding. None of them is recoverable mid-run; callers abort instead of
//! emitting a partially-valid case.

use std::fmt;

use ssz_static_types::DescriptorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A descriptor declares inconsistent bounds.
    InvalidDescriptor(DescriptorError),
    /// A value does not have the shape its descriptor requires.
    ShapeMismatch {
        expected: String,
        found: String,
    },
    /// Bytes could not be decoded as the requested type.
    Decode {
        type_name: String,
        reason: String,
    },
    UnknownFork(String),
    UnknownMode(String),
    /// Two catalog entries share a name, or an entry is registered under a
    /// name different from its record name.
    CatalogConflict(String),
}

impl GenerationError {
    pub(crate) fn mismatch(expected: impl fmt::Display, found: impl Into<String>) -> Self {
        GenerationError::ShapeMismatch {
            expected: expected.to_string(),
            found: found.into(),
        }
    }

    pub(crate) fn decode(type_name: impl fmt::Display, reason: impl Into<String>) -> Self {
        GenerationError::Decode {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::InvalidDescriptor(err) => write!(f, "InvalidDescriptor: {}", err),
            GenerationError::ShapeMismatch { expected, found } => {
                write!(f, "ShapeMismatch: expected {}, found {}", expected, found)
            }
            GenerationError::Decode { type_name, reason } => {
                write!(f, "Decode: cannot decode {}: {}", type_name, reason)
            }
            GenerationError::UnknownFork(name) => write!(f, "UnknownFork: '{}'", name),
            GenerationError::UnknownMode(name) => {
                write!(f, "UnknownMode: '{}'", name)
            }
            GenerationError::CatalogConflict(msg) => write!(f, "CatalogConflict: {}", msg),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<DescriptorError> for GenerationError {
    fn from(err: DescriptorError) -> Self {
        GenerationError::InvalidDescriptor(err)
    }
}

//! Error types for tidy invocations.

use std::fmt;
use thiserror::Error;

/// Result type for tidy operations.
pub type TidyResult<T> = Result<T, TidyError>;

/// Errors that can occur while configuring or running a tidy call.
///
/// Every variant is scoped to the call that produced it. By the time a
/// caller observes one of these, every native resource that call acquired
/// has already been released.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TidyError {
    /// The options argument had the wrong shape (not a mapping, bad keys).
    ///
    /// Raised before any native resource is allocated.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// The engine does not recognize the option name.
    #[error("unknown tidy option '{name}'")]
    UnknownOption {
        /// The option name as supplied by the caller.
        name: String,
    },

    /// The option value's type disagrees with the option's declared kind.
    #[error("option '{name}' must be {expected}")]
    TypeMismatch {
        /// The option name.
        name: String,
        /// The kind of value the option accepts.
        expected: ExpectedKind,
    },

    /// The engine's setter refused the value.
    #[error("engine rejected option '{name}': {diagnostic}")]
    EngineRejectedOption {
        /// The option name.
        name: String,
        /// Error buffer contents at the time of the failure.
        diagnostic: String,
    },

    /// The engine declared an option kind with no handling branch.
    ///
    /// Points at a version mismatch between the binding and the engine.
    #[error("option '{name}' has unsupported kind {kind}")]
    InternalInvariant {
        /// The option name.
        name: String,
        /// The raw kind code reported by the engine.
        kind: i32,
    },

    /// A native document or buffer could not be created.
    #[error("failed to allocate native {resource}")]
    Allocation {
        /// Which resource failed.
        resource: Resource,
    },
}

impl TidyError {
    /// Creates a [`TidyError::InvalidArgument`] error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns the option name this error refers to, if any.
    pub fn option_name(&self) -> Option<&str> {
        match self {
            Self::UnknownOption { name }
            | Self::TypeMismatch { name, .. }
            | Self::EngineRejectedOption { name, .. }
            | Self::InternalInvariant { name, .. } => Some(name),
            Self::InvalidArgument { .. } | Self::Allocation { .. } => None,
        }
    }
}

/// The value kind an option expected, as reported in type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectedKind {
    /// A text value.
    Text,
    /// An integer value.
    Integer,
    /// A boolean, or an integer read as a truth value.
    BooleanOrInteger,
}

impl fmt::Display for ExpectedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::BooleanOrInteger => "boolean-or-integer",
        })
    }
}

/// A native resource owned by one tidy call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The parse/clean/serialize session handle.
    Document,
    /// The diagnostic sink attached to the document.
    ErrorBuffer,
    /// The sink receiving serialized output.
    OutputBuffer,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Document => "document",
            Self::ErrorBuffer => "error buffer",
            Self::OutputBuffer => "output buffer",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_option() {
        let err = TidyError::UnknownOption {
            name: "indnet".into(),
        };
        assert_eq!(err.to_string(), "unknown tidy option 'indnet'");

        let err = TidyError::TypeMismatch {
            name: "doctype".into(),
            expected: ExpectedKind::Text,
        };
        assert_eq!(err.to_string(), "option 'doctype' must be text");

        let err = TidyError::TypeMismatch {
            name: "indent".into(),
            expected: ExpectedKind::BooleanOrInteger,
        };
        assert_eq!(err.to_string(), "option 'indent' must be boolean-or-integer");
    }

    #[test]
    fn allocation_message() {
        let err = TidyError::Allocation {
            resource: Resource::ErrorBuffer,
        };
        assert_eq!(err.to_string(), "failed to allocate native error buffer");
        assert_eq!(err.option_name(), None);
    }

    #[test]
    fn option_name_accessor() {
        let err = TidyError::InternalInvariant {
            name: "wrap".into(),
            kind: 7,
        };
        assert_eq!(err.option_name(), Some("wrap"));
        assert_eq!(err.to_string(), "option 'wrap' has unsupported kind 7");

        let err = TidyError::invalid_argument("options must be a mapping");
        assert_eq!(err.option_name(), None);
        assert_eq!(err.to_string(), "invalid argument: options must be a mapping");
    }
}

//! Engine trait definition.

use std::borrow::Cow;
use std::fmt;

/// The declared value kind of an engine option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// The option takes a text value.
    Text,
    /// The option takes an integer value.
    Integer,
    /// The option takes a boolean value.
    Boolean,
    /// The engine reported a kind this binding does not know, with its raw code.
    Unsupported(i32),
}

impl OptionKind {
    /// Maps libtidy's `TidyOptionType` codes to a kind.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Text,
            1 => Self::Integer,
            2 => Self::Boolean,
            other => Self::Unsupported(other),
        }
    }
}

/// Outcome code of a parse, clean or save phase.
///
/// Phases never fail a call; the status is recorded for reporting only.
/// Ordered by severity, so the worst of several statuses is their `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PhaseStatus {
    /// No diagnostics.
    #[default]
    Clean,
    /// Warnings were written to the error buffer.
    Warnings,
    /// Errors were written to the error buffer.
    Errors,
    /// The engine reported a severe failure, with its raw code.
    Severe(i32),
}

impl PhaseStatus {
    /// Maps libtidy's phase return codes (0, 1, 2, negative) to a status.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Clean,
            1 => Self::Warnings,
            c if c < 0 => Self::Severe(c),
            _ => Self::Errors,
        }
    }

    /// Returns true for [`PhaseStatus::Severe`].
    pub fn is_severe(self) -> bool {
        matches!(self, Self::Severe(_))
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("clean"),
            Self::Warnings => f.write_str("warnings"),
            Self::Errors => f.write_str("errors"),
            Self::Severe(code) => write!(f, "severe ({code})"),
        }
    }
}

/// An external HTML cleanup engine.
///
/// The engine is a black box that hands out opaque documents and buffers
/// and releases them again on request. This trait is the full set of
/// primitives the binding relies on; it interprets nothing about HTML.
///
/// # Contract
///
/// - Every value returned by `create_document` is passed to
///   `release_document` exactly once, and every value returned by
///   `create_buffer` to `free_buffer` exactly once. [`crate::Tidy`]
///   guarantees this; implementors may treat anything else as a bug.
/// - A buffer attached with `set_error_buffer` outlives the document it is
///   attached to.
/// - The parse, clean and save phases do not fail. Their status is
///   advisory.
///
/// # Implementors
///
/// - `tinytidy_native::LibTidy` - the system libtidy
/// - `tinytidy_testkit::RecordingEngine` - an instrumented test double
pub trait TidyEngine {
    /// A parse/clean/serialize session.
    type Document;
    /// A byte buffer the engine writes into.
    type Buffer;
    /// A resolved option.
    type OptionHandle;
    /// The identifier setters take.
    type OptionId: Copy + fmt::Debug;

    /// Creates a document, or `None` if the engine could not allocate one.
    fn create_document(&self) -> Option<Self::Document>;

    /// Releases a document back to the engine.
    fn release_document(&self, document: Self::Document);

    /// Creates an empty buffer, or `None` if allocation failed.
    fn create_buffer(&self) -> Option<Self::Buffer>;

    /// Frees a buffer.
    fn free_buffer(&self, buffer: Self::Buffer);

    /// Returns the bytes currently held by a buffer.
    fn buffer_contents<'b>(&self, buffer: &'b Self::Buffer) -> Cow<'b, [u8]>;

    /// Directs the document's diagnostics into `buffer`.
    ///
    /// Returns false if the engine could not attach the buffer.
    fn set_error_buffer(&self, document: &mut Self::Document, buffer: &mut Self::Buffer) -> bool;

    /// Resolves an option by name.
    fn option_by_name(&self, document: &Self::Document, name: &str) -> Option<Self::OptionHandle>;

    /// Returns the declared kind of an option.
    fn option_kind(&self, option: &Self::OptionHandle) -> OptionKind;

    /// Returns the identifier of an option.
    fn option_id(&self, option: &Self::OptionHandle) -> Self::OptionId;

    /// Sets a text option. Returns false if the engine rejected the value.
    fn set_text_option(&self, document: &mut Self::Document, id: Self::OptionId, value: &str)
        -> bool;

    /// Sets an integer option. Returns false if the engine rejected the value.
    fn set_integer_option(
        &self,
        document: &mut Self::Document,
        id: Self::OptionId,
        value: i64,
    ) -> bool;

    /// Sets a boolean option. Returns false if the engine rejected the value.
    fn set_boolean_option(
        &self,
        document: &mut Self::Document,
        id: Self::OptionId,
        value: bool,
    ) -> bool;

    /// Parses `source` into the document.
    fn parse_string(&self, document: &mut Self::Document, source: &[u8]) -> PhaseStatus;

    /// Runs the clean-and-repair pass over the parsed document.
    fn clean_and_repair(&self, document: &mut Self::Document) -> PhaseStatus;

    /// Serializes the document into `buffer`.
    fn save_to_buffer(&self, document: &mut Self::Document, buffer: &mut Self::Buffer)
        -> PhaseStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_kind_codes() {
        assert_eq!(OptionKind::from_code(0), OptionKind::Text);
        assert_eq!(OptionKind::from_code(1), OptionKind::Integer);
        assert_eq!(OptionKind::from_code(2), OptionKind::Boolean);
        assert_eq!(OptionKind::from_code(3), OptionKind::Unsupported(3));
        assert_eq!(OptionKind::from_code(-1), OptionKind::Unsupported(-1));
    }

    #[test]
    fn phase_status_codes() {
        assert_eq!(PhaseStatus::from_code(0), PhaseStatus::Clean);
        assert_eq!(PhaseStatus::from_code(1), PhaseStatus::Warnings);
        assert_eq!(PhaseStatus::from_code(2), PhaseStatus::Errors);
        assert_eq!(PhaseStatus::from_code(-12), PhaseStatus::Severe(-12));
        assert!(PhaseStatus::from_code(-1).is_severe());
    }

    #[test]
    fn worst_status_is_max() {
        let statuses = [PhaseStatus::Warnings, PhaseStatus::Clean, PhaseStatus::Errors];
        assert_eq!(statuses.into_iter().max(), Some(PhaseStatus::Errors));
        assert!(PhaseStatus::Severe(-1) > PhaseStatus::Errors);
    }
}

//! The configure, parse, clean, serialize call sequence.

use crate::engine::{PhaseStatus, TidyEngine};
use crate::error::{Resource, TidyError, TidyResult};
use crate::guard::{BufferGuard, DocumentGuard};
use crate::marshal::apply_options;
use crate::value::{OptionTable, OptionsArg};
use tracing::{debug, debug_span, warn};

/// Output of one cleanup call, with what the engine reported along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Serialized document, exactly as the engine produced it.
    pub output: Vec<u8>,
    /// Error buffer contents after serialization.
    pub diagnostics: String,
    /// Worst status across the parse, clean and save phases.
    pub status: PhaseStatus,
}

impl CleanReport {
    /// Returns true if the engine wrote any diagnostics.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Runs cleanup calls against an engine.
///
/// Every call gets a fresh document and buffers from the engine and
/// returns all of them before it completes, whether it succeeds or fails.
/// Nothing is carried between calls, so the same inputs always produce the
/// same output, and a shared `Tidy` can serve concurrent callers when the
/// engine is `Sync`.
///
/// # Example
///
/// ```rust,ignore
/// use tinytidy_core::{OptionTable, Tidy};
/// use tinytidy_native::LibTidy;
///
/// let tidy = Tidy::new(LibTidy::new());
/// let options = OptionTable::new().with("indent", 1);
/// let html = tidy.clean(b"<p>hi", Some(&options))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tidy<E> {
    engine: E,
}

impl<E: TidyEngine> Tidy<E> {
    /// Creates a runner over `engine`.
    pub const fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Returns the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Cleans `source`, applying `options` first when given.
    ///
    /// Engine diagnostics are discarded; use [`Tidy::clean_with_report`]
    /// to keep them.
    ///
    /// # Errors
    ///
    /// Returns the marshaler's error if an option cannot be applied, or
    /// [`TidyError::Allocation`] if a native resource cannot be created.
    pub fn clean(&self, source: &[u8], options: Option<&OptionTable>) -> TidyResult<Vec<u8>> {
        let report = self.run(source, options)?;
        if report.has_diagnostics() {
            debug!(
                len = report.diagnostics.len(),
                status = %report.status,
                "discarding engine diagnostics"
            );
        }
        Ok(report.output)
    }

    /// Cleans `source` and returns the output with the engine's diagnostics.
    ///
    /// # Errors
    ///
    /// Same as [`Tidy::clean`].
    pub fn clean_with_report(
        &self,
        source: &[u8],
        options: Option<&OptionTable>,
    ) -> TidyResult<CleanReport> {
        self.run(source, options)
    }

    /// Cleans `source` with options received from a dynamic caller.
    ///
    /// An [`OptionsArg::Invalid`] argument fails before the engine is
    /// touched.
    ///
    /// # Errors
    ///
    /// [`TidyError::InvalidArgument`] for a malformed argument, otherwise
    /// the same as [`Tidy::clean`].
    pub fn parse_string(&self, source: &[u8], options: &OptionsArg) -> TidyResult<Vec<u8>> {
        let table = match options {
            OptionsArg::Absent => None,
            OptionsArg::Table(table) => Some(table),
            OptionsArg::Invalid { reason } => return Err(TidyError::invalid_argument(reason)),
        };
        self.clean(source, table)
    }

    /// Applies `options` to a scratch document without parsing anything.
    ///
    /// Returns the number of options applied.
    ///
    /// # Errors
    ///
    /// The marshaler's error for the first option that cannot be applied,
    /// or [`TidyError::Allocation`].
    pub fn check_options(&self, options: &OptionTable) -> TidyResult<usize> {
        let mut error_buffer = BufferGuard::acquire(&self.engine, Resource::ErrorBuffer)?;
        let mut document = DocumentGuard::acquire(&self.engine)?;
        self.attach(&mut document, &mut error_buffer)?;
        apply_options(&self.engine, document.get_mut(), error_buffer.get(), options)
    }

    fn attach(
        &self,
        document: &mut DocumentGuard<'_, E>,
        error_buffer: &mut BufferGuard<'_, E>,
    ) -> TidyResult<()> {
        if self
            .engine
            .set_error_buffer(document.get_mut(), error_buffer.get_mut())
        {
            Ok(())
        } else {
            Err(TidyError::Allocation {
                resource: Resource::ErrorBuffer,
            })
        }
    }

    fn run(&self, source: &[u8], options: Option<&OptionTable>) -> TidyResult<CleanReport> {
        let span = debug_span!(
            "tidy_clean",
            source_len = source.len(),
            options = options.map_or(0, OptionTable::len)
        );
        let _enter = span.enter();

        // Declared before the document so it is dropped after it.
        let mut error_buffer = BufferGuard::acquire(&self.engine, Resource::ErrorBuffer)?;
        let mut document = DocumentGuard::acquire(&self.engine)?;
        self.attach(&mut document, &mut error_buffer)?;

        if let Some(table) = options {
            let applied =
                apply_options(&self.engine, document.get_mut(), error_buffer.get(), table)?;
            debug!(applied, "configured document");
        }

        let parsed = note_phase("parse", self.engine.parse_string(document.get_mut(), source));
        let cleaned = note_phase("clean", self.engine.clean_and_repair(document.get_mut()));

        let mut output_buffer = BufferGuard::acquire(&self.engine, Resource::OutputBuffer)?;
        let saved = note_phase(
            "save",
            self.engine
                .save_to_buffer(document.get_mut(), output_buffer.get_mut()),
        );

        let output = output_buffer.contents().into_owned();
        debug!(output_len = output.len(), "serialized document");

        Ok(CleanReport {
            output,
            diagnostics: String::from_utf8_lossy(&error_buffer.contents())
                .trim_end()
                .to_owned(),
            status: parsed.max(cleaned).max(saved),
        })
    }
}

fn note_phase(phase: &'static str, status: PhaseStatus) -> PhaseStatus {
    if status.is_severe() {
        warn!(phase, %status, "engine reported a severe status");
    } else {
        debug!(phase, %status, "phase complete");
    }
    status
}

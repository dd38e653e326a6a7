//! An instrumented in-memory engine.
//!
//! [`RecordingEngine`] implements [`TidyEngine`] without any native code.
//! It keeps a small registry of options modelled on libtidy's, counts every
//! primitive call, tracks which documents and buffers are live so leaks and
//! double releases are caught, and can be told to fail allocations.
//!
//! Its "cleanup" is deliberately trivial: the serialized output is the
//! parsed source, preceded by an XML declaration when `add-xml-decl` is on.

use parking_lot::Mutex;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tinytidy_core::{OptionKind, PhaseStatus, TidyEngine};

/// The XML declaration emitted for `add-xml-decl`.
pub const XML_DECL: &str = "<?xml version=\"1.0\"?>\n";

/// The warning written when the source has no doctype.
pub const MISSING_DOCTYPE_WARNING: &str =
    "line 1 column 1 - Warning: missing <!DOCTYPE> declaration";

const DOCTYPES: &[&str] = &["html5", "omit", "auto", "strict", "transitional", "user"];
const ENCODINGS: &[&str] = &[
    "raw", "ascii", "latin0", "latin1", "utf8", "iso2022", "mac", "win1252", "ibm858", "utf16le",
    "utf16be", "utf16", "big5", "shiftjis",
];

/// What values an option accepts beyond its kind.
#[derive(Debug, Clone)]
enum Rule {
    Any,
    OneOf(&'static [&'static str]),
    Range(i64, i64),
    /// Refuses every value without writing a diagnostic.
    Silent,
}

#[derive(Debug, Clone)]
struct RegisteredOption {
    name: String,
    kind: OptionKind,
    rule: Rule,
}

/// A value applied to a document, as recorded by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Applied through the text setter.
    Text(String),
    /// Applied through the integer setter.
    Integer(i64),
    /// Applied through the boolean setter.
    Boolean(bool),
}

/// A resolved option of a [`RecordingEngine`].
#[derive(Debug, Clone, Copy)]
pub struct RecordedOption {
    id: usize,
    kind: OptionKind,
}

/// A document of a [`RecordingEngine`].
#[derive(Debug)]
pub struct RecordedDocument {
    id: u64,
    settings: BTreeMap<usize, Applied>,
    source: Vec<u8>,
    errors: Option<Arc<Mutex<Vec<u8>>>>,
}

impl RecordedDocument {
    fn report(&self, line: &str) {
        if let Some(errors) = &self.errors {
            let mut errors = errors.lock();
            errors.extend_from_slice(line.as_bytes());
            errors.push(b'\n');
        }
    }
}

/// A buffer of a [`RecordingEngine`].
#[derive(Debug)]
pub struct RecordedBuffer {
    id: u64,
    data: Arc<Mutex<Vec<u8>>>,
}

/// A snapshot of a [`RecordingEngine`]'s call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Documents created.
    pub documents_created: usize,
    /// Documents released.
    pub documents_released: usize,
    /// Buffers created.
    pub buffers_created: usize,
    /// Buffers freed.
    pub buffers_freed: usize,
    /// Name lookups, found or not.
    pub lookups: usize,
    /// Setter calls, accepted or not.
    pub setter_calls: usize,
    /// Parse phases run.
    pub parses: usize,
    /// Clean phases run.
    pub cleans: usize,
    /// Save phases run.
    pub saves: usize,
}

impl EngineStats {
    /// Documents and buffers created but not yet released.
    pub fn live_resources(&self) -> usize {
        // Counters are loaded one by one, so a snapshot taken while other
        // threads work may see a release before its creation.
        self.documents_created.saturating_sub(self.documents_released)
            + self.buffers_created.saturating_sub(self.buffers_freed)
    }
}

#[derive(Debug, Default)]
struct Counters {
    documents_created: AtomicUsize,
    documents_released: AtomicUsize,
    buffers_created: AtomicUsize,
    buffers_freed: AtomicUsize,
    buffer_attempts: AtomicUsize,
    lookups: AtomicUsize,
    setter_calls: AtomicUsize,
    parses: AtomicUsize,
    cleans: AtomicUsize,
    saves: AtomicUsize,
}

fn bump(counter: &AtomicUsize) -> usize {
    counter.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Default, Clone)]
struct Faults {
    fail_documents: bool,
    fail_buffer_at: Option<usize>,
    fail_attach: bool,
}

/// An in-memory [`TidyEngine`] that records what is done to it.
///
/// # Panics
///
/// Releasing a document or freeing a buffer that is not live panics, so a
/// double release shows up as a test failure.
///
/// # Example
///
/// ```rust
/// use tinytidy_core::Tidy;
/// use tinytidy_testkit::RecordingEngine;
///
/// let tidy = Tidy::new(RecordingEngine::new());
/// let out = tidy.clean(b"<p>hi</p>", None).unwrap();
/// assert_eq!(out, b"<p>hi</p>");
///
/// let stats = tidy.engine().stats();
/// assert_eq!(stats.documents_created, 1);
/// assert_eq!(stats.live_resources(), 0);
/// ```
#[derive(Debug)]
pub struct RecordingEngine {
    registry: Vec<RegisteredOption>,
    counters: Counters,
    faults: Faults,
    next_id: AtomicU64,
    live: Mutex<HashSet<u64>>,
    applied: Mutex<Vec<(String, Applied)>>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingEngine {
    /// Creates an engine with the stock option registry.
    ///
    /// | Option | Kind |
    /// |---|---|
    /// | `indent`, `markup`, `add-xml-decl`, `output-xhtml`, `uppercase-tags` | boolean |
    /// | `wrap`, `tab-size` | integer, `0..=4294967295` |
    /// | `doctype`, `char-encoding` | text, fixed pick list |
    /// | `alt-text` | text |
    #[must_use]
    pub fn new() -> Self {
        let mut engine = Self::empty();
        for name in ["indent", "markup", "add-xml-decl", "output-xhtml", "uppercase-tags"] {
            engine.register(name, OptionKind::Boolean, Rule::Any);
        }
        for name in ["wrap", "tab-size"] {
            engine.register(name, OptionKind::Integer, Rule::Range(0, i64::from(u32::MAX)));
        }
        engine.register("doctype", OptionKind::Text, Rule::OneOf(DOCTYPES));
        engine.register("char-encoding", OptionKind::Text, Rule::OneOf(ENCODINGS));
        engine.register("alt-text", OptionKind::Text, Rule::Any);
        engine
    }

    /// Creates an engine that knows no options.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            registry: Vec::new(),
            counters: Counters::default(),
            faults: Faults::default(),
            next_id: AtomicU64::new(1),
            live: Mutex::new(HashSet::new()),
            applied: Mutex::new(Vec::new()),
        }
    }

    /// Registers an extra option that accepts any value of its kind.
    ///
    /// Registering [`OptionKind::Unsupported`] simulates an engine newer
    /// than the binding.
    #[must_use]
    pub fn with_option(mut self, name: &str, kind: OptionKind) -> Self {
        self.register(name, kind, Rule::Any);
        self
    }

    /// Registers an extra option whose setter refuses every value and
    /// leaves the error buffer untouched.
    #[must_use]
    pub fn with_silent_option(mut self, name: &str, kind: OptionKind) -> Self {
        self.register(name, kind, Rule::Silent);
        self
    }

    /// Makes every document creation fail.
    #[must_use]
    pub fn failing_documents(mut self) -> Self {
        self.faults.fail_documents = true;
        self
    }

    /// Makes the buffer creation attempt with the given zero-based index
    /// fail. Later attempts succeed.
    ///
    /// In the first clean call on a fresh engine, attempt 0 is the error
    /// buffer and attempt 1 the output buffer.
    #[must_use]
    pub fn failing_buffer(mut self, index: usize) -> Self {
        self.faults.fail_buffer_at = Some(index);
        self
    }

    /// Makes attaching an error buffer fail.
    #[must_use]
    pub fn failing_attach(mut self) -> Self {
        self.faults.fail_attach = true;
        self
    }

    /// Returns a snapshot of the call counters.
    pub fn stats(&self) -> EngineStats {
        let c = &self.counters;
        let get = |counter: &AtomicUsize| counter.load(Ordering::SeqCst);
        EngineStats {
            documents_created: get(&c.documents_created),
            documents_released: get(&c.documents_released),
            buffers_created: get(&c.buffers_created),
            buffers_freed: get(&c.buffers_freed),
            lookups: get(&c.lookups),
            setter_calls: get(&c.setter_calls),
            parses: get(&c.parses),
            cleans: get(&c.cleans),
            saves: get(&c.saves),
        }
    }

    /// Every accepted setter call so far, in call order.
    pub fn applied_options(&self) -> Vec<(String, Applied)> {
        self.applied.lock().clone()
    }

    /// Names of the registered options.
    pub fn option_names(&self) -> Vec<&str> {
        self.registry.iter().map(|o| o.name.as_str()).collect()
    }

    fn register(&mut self, name: &str, kind: OptionKind, rule: Rule) {
        self.registry.push(RegisteredOption {
            name: name.to_owned(),
            kind,
            rule,
        });
    }

    fn track(&self) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.live.lock().insert(id);
        id
    }

    fn untrack(&self, id: u64, what: &str) {
        assert!(
            self.live.lock().remove(&id),
            "{what} {id} released twice or never created"
        );
    }

    fn apply(&self, document: &mut RecordedDocument, id: usize, value: Applied) -> bool {
        bump(&self.counters.setter_calls);
        let Some(option) = self.registry.get(id) else {
            return false;
        };

        let accepted = match (&option.rule, &value) {
            (Rule::Silent, _) => return false,
            (Rule::Any, _) => true,
            (Rule::OneOf(picks), Applied::Text(text)) => picks.contains(&text.as_str()),
            (Rule::Range(lo, hi), Applied::Integer(n)) => (*lo..=*hi).contains(n),
            _ => true,
        };

        if !accepted {
            let shown = match &value {
                Applied::Text(text) => text.clone(),
                Applied::Integer(n) => n.to_string(),
                Applied::Boolean(b) => b.to_string(),
            };
            document.report(&format!(
                "Config: invalid value \"{shown}\" for option \"{}\"",
                option.name
            ));
            return false;
        }

        self.applied.lock().push((option.name.clone(), value.clone()));
        document.settings.insert(id, value);
        true
    }

    fn flag(&self, document: &RecordedDocument, name: &str) -> bool {
        self.registry
            .iter()
            .position(|o| o.name == name)
            .and_then(|id| document.settings.get(&id))
            .is_some_and(|value| matches!(value, Applied::Boolean(true)))
    }
}

impl TidyEngine for RecordingEngine {
    type Document = RecordedDocument;
    type Buffer = RecordedBuffer;
    type OptionHandle = RecordedOption;
    type OptionId = usize;

    fn create_document(&self) -> Option<RecordedDocument> {
        if self.faults.fail_documents {
            return None;
        }
        bump(&self.counters.documents_created);
        Some(RecordedDocument {
            id: self.track(),
            settings: BTreeMap::new(),
            source: Vec::new(),
            errors: None,
        })
    }

    fn release_document(&self, document: RecordedDocument) {
        self.untrack(document.id, "document");
        bump(&self.counters.documents_released);
    }

    fn create_buffer(&self) -> Option<RecordedBuffer> {
        let attempt = bump(&self.counters.buffer_attempts);
        if self.faults.fail_buffer_at == Some(attempt) {
            return None;
        }
        bump(&self.counters.buffers_created);
        Some(RecordedBuffer {
            id: self.track(),
            data: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn free_buffer(&self, buffer: RecordedBuffer) {
        self.untrack(buffer.id, "buffer");
        bump(&self.counters.buffers_freed);
    }

    fn buffer_contents<'b>(&self, buffer: &'b RecordedBuffer) -> Cow<'b, [u8]> {
        Cow::Owned(buffer.data.lock().clone())
    }

    fn set_error_buffer(
        &self,
        document: &mut RecordedDocument,
        buffer: &mut RecordedBuffer,
    ) -> bool {
        if self.faults.fail_attach {
            return false;
        }
        document.errors = Some(Arc::clone(&buffer.data));
        true
    }

    fn option_by_name(
        &self,
        _document: &RecordedDocument,
        name: &str,
    ) -> Option<RecordedOption> {
        bump(&self.counters.lookups);
        self.registry
            .iter()
            .position(|o| o.name == name)
            .map(|id| RecordedOption {
                id,
                kind: self.registry[id].kind,
            })
    }

    fn option_kind(&self, option: &RecordedOption) -> OptionKind {
        option.kind
    }

    fn option_id(&self, option: &RecordedOption) -> usize {
        option.id
    }

    fn set_text_option(&self, document: &mut RecordedDocument, id: usize, value: &str) -> bool {
        self.apply(document, id, Applied::Text(value.to_owned()))
    }

    fn set_integer_option(&self, document: &mut RecordedDocument, id: usize, value: i64) -> bool {
        self.apply(document, id, Applied::Integer(value))
    }

    fn set_boolean_option(&self, document: &mut RecordedDocument, id: usize, value: bool) -> bool {
        self.apply(document, id, Applied::Boolean(value))
    }

    fn parse_string(&self, document: &mut RecordedDocument, source: &[u8]) -> PhaseStatus {
        bump(&self.counters.parses);
        document.source = source.to_vec();
        let has_doctype = source
            .get(..9)
            .is_some_and(|head| head.eq_ignore_ascii_case(b"<!doctype"));
        if has_doctype || source.starts_with(b"<?xml") {
            PhaseStatus::Clean
        } else {
            document.report(MISSING_DOCTYPE_WARNING);
            PhaseStatus::Warnings
        }
    }

    fn clean_and_repair(&self, _document: &mut RecordedDocument) -> PhaseStatus {
        bump(&self.counters.cleans);
        PhaseStatus::Clean
    }

    fn save_to_buffer(
        &self,
        document: &mut RecordedDocument,
        buffer: &mut RecordedBuffer,
    ) -> PhaseStatus {
        bump(&self.counters.saves);
        let mut out = buffer.data.lock();
        out.clear();
        if self.flag(document, "add-xml-decl") && !document.source.starts_with(b"<?xml") {
            out.extend_from_slice(XML_DECL.as_bytes());
        }
        out.extend_from_slice(&document.source);
        PhaseStatus::Clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_live_resources() {
        let engine = RecordingEngine::new();
        let doc = engine.create_document().unwrap();
        let buf = engine.create_buffer().unwrap();
        assert_eq!(engine.stats().live_resources(), 2);

        engine.free_buffer(buf);
        engine.release_document(doc);
        assert_eq!(engine.stats().live_resources(), 0);
    }

    #[test]
    #[should_panic(expected = "released twice")]
    fn double_release_panics() {
        let engine = RecordingEngine::new();
        let doc = engine.create_document().unwrap();
        let id = doc.id;
        engine.release_document(doc);
        engine.release_document(RecordedDocument {
            id,
            settings: BTreeMap::new(),
            source: Vec::new(),
            errors: None,
        });
    }

    #[test]
    fn failed_buffer_is_not_counted() {
        let engine = RecordingEngine::new().failing_buffer(0);
        assert!(engine.create_buffer().is_none());
        assert_eq!(engine.stats().buffers_created, 0);

        let buf = engine.create_buffer().unwrap();
        assert_eq!(engine.stats().buffers_created, 1);
        engine.free_buffer(buf);
    }

    #[test]
    fn rejected_value_is_reported_to_error_buffer() {
        let engine = RecordingEngine::new();
        let mut doc = engine.create_document().unwrap();
        let mut buf = engine.create_buffer().unwrap();
        assert!(engine.set_error_buffer(&mut doc, &mut buf));

        let option = engine.option_by_name(&doc, "doctype").unwrap();
        assert!(!engine.set_text_option(&mut doc, option.id, "html6"));
        let text = String::from_utf8(engine.buffer_contents(&buf).into_owned()).unwrap();
        assert!(text.contains("\"html6\""));
        assert!(engine.applied_options().is_empty());

        engine.release_document(doc);
        engine.free_buffer(buf);
    }

    #[test]
    fn silent_option_leaves_error_buffer_empty() {
        let engine = RecordingEngine::empty().with_silent_option("wrap", OptionKind::Integer);
        let mut doc = engine.create_document().unwrap();
        let mut buf = engine.create_buffer().unwrap();
        assert!(engine.set_error_buffer(&mut doc, &mut buf));

        let option = engine.option_by_name(&doc, "wrap").unwrap();
        assert!(!engine.set_integer_option(&mut doc, option.id, 72));
        assert!(engine.buffer_contents(&buf).is_empty());
        assert_eq!(engine.stats().setter_calls, 1);

        engine.release_document(doc);
        engine.free_buffer(buf);
    }

    #[test]
    fn live_resources_never_underflow() {
        let stats = EngineStats {
            documents_created: 1,
            documents_released: 2,
            buffers_created: 3,
            buffers_freed: 1,
            ..EngineStats::default()
        };
        assert_eq!(stats.live_resources(), 2);
    }

    #[test]
    fn registry_lists_stock_options() {
        let engine =
            RecordingEngine::new().with_option("vertical-space", OptionKind::Unsupported(3));
        let names = engine.option_names();
        assert!(names.contains(&"indent"));
        assert!(names.contains(&"doctype"));
        assert!(names.contains(&"vertical-space"));
        assert!(RecordingEngine::empty().option_names().is_empty());
    }
}

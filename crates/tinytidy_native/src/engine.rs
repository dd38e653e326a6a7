//! [`TidyEngine`] over the system libtidy.

use crate::ffi;
use std::borrow::Cow;
use std::ffi::{c_ulong, CStr, CString};
use std::ptr::NonNull;
use tinytidy_core::{OptionKind, PhaseStatus, TidyEngine};
use tracing::debug;

/// The system libtidy.
///
/// Stateless: all state lives in the documents it creates, and libtidy
/// documents share nothing, so one `LibTidy` can serve any number of
/// threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibTidy;

impl LibTidy {
    /// Creates a handle to the system libtidy.
    pub const fn new() -> Self {
        Self
    }

    /// Returns the version string libtidy reports, e.g. `5.8.0`.
    pub fn version(&self) -> String {
        // SAFETY: tidyLibraryVersion returns a pointer to a static string.
        let raw = unsafe { ffi::tidyLibraryVersion() };
        if raw.is_null() {
            return String::new();
        }
        // SAFETY: non-null and NUL-terminated per the libtidy API.
        unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned()
    }
}

/// A live libtidy document.
#[derive(Debug)]
pub struct NativeDocument(NonNull<ffi::TidyDocImpl>);

/// A libtidy buffer at a stable heap address.
#[derive(Debug)]
pub struct NativeBuffer(NonNull<ffi::TidyBuffer>);

/// An option resolved by name.
#[derive(Debug, Clone, Copy)]
pub struct NativeOption(NonNull<ffi::TidyOptionImpl>);

fn to_bool(value: ffi::TidyBool) -> bool {
    value != ffi::NO
}

impl TidyEngine for LibTidy {
    type Document = NativeDocument;
    type Buffer = NativeBuffer;
    type OptionHandle = NativeOption;
    type OptionId = ffi::TidyOptionId;

    fn create_document(&self) -> Option<NativeDocument> {
        // SAFETY: no preconditions.
        NonNull::new(unsafe { ffi::tidyCreate() }).map(NativeDocument)
    }

    fn release_document(&self, document: NativeDocument) {
        // SAFETY: the document came from tidyCreate and is released once.
        unsafe { ffi::tidyRelease(document.0.as_ptr()) }
    }

    fn create_buffer(&self) -> Option<NativeBuffer> {
        let buffer = NonNull::from(Box::leak(Box::new(ffi::TidyBuffer::zeroed())));
        // SAFETY: the buffer is valid, zeroed and owned by us.
        unsafe { ffi::tidyBufInit(buffer.as_ptr()) };
        Some(NativeBuffer(buffer))
    }

    fn free_buffer(&self, buffer: NativeBuffer) {
        let raw = buffer.0.as_ptr();
        // SAFETY: the buffer was initialized by tidyBufInit and leaked from a
        // Box in create_buffer; any document it was attached to has been
        // released.
        unsafe {
            ffi::tidyBufFree(raw);
            drop(Box::from_raw(raw));
        }
    }

    fn buffer_contents<'b>(&self, buffer: &'b NativeBuffer) -> Cow<'b, [u8]> {
        // SAFETY: the buffer is live for 'b and only libtidy writes to it,
        // never while we hold this borrow.
        let raw = unsafe { buffer.0.as_ref() };
        if raw.bp.is_null() || raw.size == 0 {
            return Cow::Borrowed(&[]);
        }
        // SAFETY: bp points at `size` initialized bytes owned by the buffer.
        Cow::Borrowed(unsafe { std::slice::from_raw_parts(raw.bp, raw.size as usize) })
    }

    fn set_error_buffer(&self, document: &mut NativeDocument, buffer: &mut NativeBuffer) -> bool {
        // SAFETY: both are live; the buffer outlives the document.
        let rc = unsafe { ffi::tidySetErrorBuffer(document.0.as_ptr(), buffer.0.as_ptr()) };
        rc >= 0
    }

    fn option_by_name(&self, document: &NativeDocument, name: &str) -> Option<NativeOption> {
        let name = CString::new(name).ok()?;
        // SAFETY: the document is live and `name` is NUL-terminated.
        let option = unsafe { ffi::tidyGetOptionByName(document.0.as_ptr(), name.as_ptr()) };
        NonNull::new(option).map(NativeOption)
    }

    fn option_kind(&self, option: &NativeOption) -> OptionKind {
        // SAFETY: option handles point into libtidy's static option table.
        OptionKind::from_code(unsafe { ffi::tidyOptGetType(option.0.as_ptr()) })
    }

    fn option_id(&self, option: &NativeOption) -> ffi::TidyOptionId {
        // SAFETY: as above.
        unsafe { ffi::tidyOptGetId(option.0.as_ptr()) }
    }

    fn set_text_option(
        &self,
        document: &mut NativeDocument,
        id: ffi::TidyOptionId,
        value: &str,
    ) -> bool {
        let Ok(value) = CString::new(value) else {
            debug!(option = id, "text value contains a NUL byte");
            return false;
        };
        // SAFETY: the document is live and `value` is NUL-terminated.
        to_bool(unsafe { ffi::tidyOptSetValue(document.0.as_ptr(), id, value.as_ptr()) })
    }

    fn set_integer_option(
        &self,
        document: &mut NativeDocument,
        id: ffi::TidyOptionId,
        value: i64,
    ) -> bool {
        let Ok(value) = c_ulong::try_from(value) else {
            debug!(option = id, value, "integer value out of range");
            return false;
        };
        // SAFETY: the document is live.
        to_bool(unsafe { ffi::tidyOptSetInt(document.0.as_ptr(), id, value) })
    }

    fn set_boolean_option(
        &self,
        document: &mut NativeDocument,
        id: ffi::TidyOptionId,
        value: bool,
    ) -> bool {
        let value = if value { ffi::YES } else { ffi::NO };
        // SAFETY: the document is live.
        to_bool(unsafe { ffi::tidyOptSetBool(document.0.as_ptr(), id, value) })
    }

    fn parse_string(&self, document: &mut NativeDocument, source: &[u8]) -> PhaseStatus {
        // libtidy reads a C string, so input ends at the first NUL.
        let end = source.iter().position(|&b| b == 0).unwrap_or(source.len());
        if end < source.len() {
            debug!(
                kept = end,
                dropped = source.len() - end,
                "source truncated at NUL byte"
            );
        }
        // SAFETY: `source[..end]` contains no NUL byte.
        let content = unsafe { CString::from_vec_unchecked(source[..end].to_vec()) };
        // SAFETY: the document is live and `content` is NUL-terminated.
        let rc = unsafe { ffi::tidyParseString(document.0.as_ptr(), content.as_ptr()) };
        PhaseStatus::from_code(rc)
    }

    fn clean_and_repair(&self, document: &mut NativeDocument) -> PhaseStatus {
        // SAFETY: the document is live.
        PhaseStatus::from_code(unsafe { ffi::tidyCleanAndRepair(document.0.as_ptr()) })
    }

    fn save_to_buffer(
        &self,
        document: &mut NativeDocument,
        buffer: &mut NativeBuffer,
    ) -> PhaseStatus {
        // SAFETY: both are live.
        let rc = unsafe { ffi::tidySaveBuffer(document.0.as_ptr(), buffer.0.as_ptr()) };
        PhaseStatus::from_code(rc)
    }
}

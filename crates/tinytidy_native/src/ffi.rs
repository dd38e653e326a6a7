//! Raw declarations for the parts of the libtidy C API the engine uses.
//!
//! Layouts follow `tidy.h` and `tidybuffio.h` of tidy-html5 5.x.

use std::ffi::{c_char, c_int, c_uint, c_ulong};

/// An opaque `TidyDoc` target.
///
/// Never dereference or modify directly.
#[repr(C)]
pub struct TidyDocImpl {
    _private: [u8; 0],
}

/// An opaque `TidyOption` target.
#[repr(C)]
pub struct TidyOptionImpl {
    _private: [u8; 0],
}

/// An opaque `TidyAllocator`.
#[repr(C)]
pub struct TidyAllocator {
    _private: [u8; 0],
}

/// `TidyDoc`.
pub type TidyDoc = *mut TidyDocImpl;

/// `TidyOption`.
pub type TidyOption = *mut TidyOptionImpl;

/// `TidyOptionId`, a C enum.
pub type TidyOptionId = c_int;

/// `TidyOptionType`, a C enum.
pub type TidyOptionType = c_int;

/// libtidy's `Bool` enum.
pub type TidyBool = c_int;

/// `no`.
pub const NO: TidyBool = 0;

/// `yes`.
pub const YES: TidyBool = 1;

/// `TidyBuffer`.
///
/// Initialized by `tidyBufInit`, grown by the library and released with
/// `tidyBufFree`. The struct itself must not move while a document points
/// at it.
#[repr(C)]
#[derive(Debug)]
pub struct TidyBuffer {
    /// Allocator the buffer grows with.
    pub allocator: *mut TidyAllocator,
    /// Start of the data.
    pub bp: *mut u8,
    /// Bytes in use.
    pub size: c_uint,
    /// Bytes allocated.
    pub allocated: c_uint,
    /// Read cursor.
    pub next: c_uint,
}

impl TidyBuffer {
    /// An all-zero buffer, the state `tidyBufInit` expects.
    pub const fn zeroed() -> Self {
        Self {
            allocator: std::ptr::null_mut(),
            bp: std::ptr::null_mut(),
            size: 0,
            allocated: 0,
            next: 0,
        }
    }
}

#[link(name = "tidy")]
extern "C" {
    pub fn tidyCreate() -> TidyDoc;
    pub fn tidyRelease(doc: TidyDoc);
    pub fn tidyLibraryVersion() -> *const c_char;

    pub fn tidySetErrorBuffer(doc: TidyDoc, errbuf: *mut TidyBuffer) -> c_int;

    pub fn tidyGetOptionByName(doc: TidyDoc, name: *const c_char) -> TidyOption;
    pub fn tidyOptGetId(opt: TidyOption) -> TidyOptionId;
    pub fn tidyOptGetType(opt: TidyOption) -> TidyOptionType;

    pub fn tidyOptSetValue(doc: TidyDoc, id: TidyOptionId, value: *const c_char) -> TidyBool;
    pub fn tidyOptSetInt(doc: TidyDoc, id: TidyOptionId, value: c_ulong) -> TidyBool;
    pub fn tidyOptSetBool(doc: TidyDoc, id: TidyOptionId, value: TidyBool) -> TidyBool;

    pub fn tidyParseString(doc: TidyDoc, content: *const c_char) -> c_int;
    pub fn tidyCleanAndRepair(doc: TidyDoc) -> c_int;
    pub fn tidySaveBuffer(doc: TidyDoc, buf: *mut TidyBuffer) -> c_int;

    pub fn tidyBufInit(buf: *mut TidyBuffer);
    pub fn tidyBufFree(buf: *mut TidyBuffer);
}

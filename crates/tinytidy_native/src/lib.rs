//! # TinyTidy Native
//!
//! [`TidyEngine`](tinytidy_core::TidyEngine) implementation over the system
//! libtidy (tidy-html5), linked as `-ltidy`.
//!
//! This crate provides:
//! - [`LibTidy`], the engine
//! - [`parse_string`] and [`clean`], one-call helpers over a shared
//!   [`Tidy<LibTidy>`](tinytidy_core::Tidy)
//! - [`tidy_version`], the linked library's version
//!
//! ```rust,no_run
//! use tinytidy_core::OptionTable;
//!
//! let options = OptionTable::new().with("indent", 1);
//! let html = tinytidy_native::clean(b"<p>hi", Some(&options))?;
//! assert!(String::from_utf8_lossy(&html).contains("</p>"));
//! # Ok::<(), tinytidy_core::TidyError>(())
//! ```

#![warn(missing_docs)]

mod engine;
mod ffi;

pub use engine::{LibTidy, NativeBuffer, NativeDocument, NativeOption};

use tinytidy_core::{OptionTable, OptionsArg, Tidy, TidyResult};

static TIDY: Tidy<LibTidy> = Tidy::new(LibTidy::new());

/// Returns the shared runner over the system libtidy.
pub fn tidy() -> &'static Tidy<LibTidy> {
    &TIDY
}

/// Cleans `source` with the system libtidy.
///
/// See [`Tidy::clean`].
pub fn clean(source: &[u8], options: Option<&OptionTable>) -> TidyResult<Vec<u8>> {
    TIDY.clean(source, options)
}

/// Cleans `source` with options from a dynamic caller.
///
/// See [`Tidy::parse_string`].
pub fn parse_string(source: &[u8], options: &OptionsArg) -> TidyResult<Vec<u8>> {
    TIDY.parse_string(source, options)
}

/// Returns the version of the linked libtidy.
pub fn tidy_version() -> String {
    LibTidy::new().version()
}

//! # TinyTidy Core
//!
//! The binding layer between a caller and an HTML Tidy engine.
//!
//! This crate provides:
//! - [`TidyEngine`], the set of primitives an engine must offer
//! - [`OptionTable`] and [`OptionValue`] for per-call configuration
//! - [`apply_options`], which checks each value against the kind the
//!   engine declares for the option and applies it
//! - [`Tidy`], which runs configure, parse, clean and serialize on a fresh
//!   document and releases every native resource on every exit path
//!
//! HTML repair itself happens inside the engine; nothing here inspects
//! markup.
//!
//! ## Example
//!
//! ```rust
//! use tinytidy_core::{OptionTable, Tidy, TidyError};
//! use tinytidy_testkit::RecordingEngine;
//!
//! let tidy = Tidy::new(RecordingEngine::new());
//! let options = OptionTable::new().with("indnet", 1);
//! let err = tidy.clean(b"<p>hi", Some(&options)).unwrap_err();
//! assert_eq!(err, TidyError::UnknownOption { name: "indnet".into() });
//! assert_eq!(tidy.engine().stats().live_resources(), 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cleaner;
mod engine;
mod error;
mod guard;
mod marshal;
mod value;

pub use cleaner::{CleanReport, Tidy};
pub use engine::{OptionKind, PhaseStatus, TidyEngine};
pub use error::{ExpectedKind, Resource, TidyError, TidyResult};
pub use marshal::apply_options;
pub use value::{OptionTable, OptionValue, OptionsArg};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

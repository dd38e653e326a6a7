//! # TinyTidy Testkit
//!
//! Test utilities for TinyTidy.
//!
//! This crate provides:
//! - [`RecordingEngine`], an in-memory engine that counts calls and
//!   catches leaked or doubly released resources
//! - Leak assertions
//! - Property-based test generators using proptest

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod recording;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::recording::*;
}

pub use fixtures::*;
pub use generators::*;
pub use recording::*;

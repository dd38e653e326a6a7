//! CLI command implementations.

pub mod check;
pub mod clean;
pub mod options;
pub mod preset;

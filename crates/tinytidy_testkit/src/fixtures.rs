//! Assertions over engine bookkeeping.

use crate::recording::{EngineStats, RecordingEngine};

/// Asserts that every document and buffer the engine handed out has come
/// back, and returns the stats for further checks.
///
/// # Panics
///
/// Panics if any resource is still live.
pub fn assert_balanced(engine: &RecordingEngine) -> EngineStats {
    let stats = engine.stats();
    assert_eq!(
        stats.documents_created, stats.documents_released,
        "document leak: {stats:?}"
    );
    assert_eq!(
        stats.buffers_created, stats.buffers_freed,
        "buffer leak: {stats:?}"
    );
    stats
}

//! Scoped ownership of engine resources.
//!
//! Each guard holds one native resource and hands it back to the engine
//! when dropped, so early returns release exactly what was acquired.
//! Drop order is the reverse of declaration order: declare a buffer guard
//! before the document guard it is attached to.

use crate::engine::TidyEngine;
use crate::error::{Resource, TidyError, TidyResult};
use std::borrow::Cow;
use tracing::trace;

/// Owns one engine document.
pub(crate) struct DocumentGuard<'e, E: TidyEngine> {
    engine: &'e E,
    document: Option<E::Document>,
}

impl<'e, E: TidyEngine> DocumentGuard<'e, E> {
    /// Creates a document.
    pub(crate) fn acquire(engine: &'e E) -> TidyResult<Self> {
        let document = engine.create_document().ok_or(TidyError::Allocation {
            resource: Resource::Document,
        })?;
        trace!("acquired document");
        Ok(Self {
            engine,
            document: Some(document),
        })
    }

    pub(crate) fn get_mut(&mut self) -> &mut E::Document {
        // Only `Drop` empties the slot.
        match &mut self.document {
            Some(document) => document,
            None => unreachable!("document guard used after release"),
        }
    }
}

impl<E: TidyEngine> Drop for DocumentGuard<'_, E> {
    fn drop(&mut self) {
        if let Some(document) = self.document.take() {
            self.engine.release_document(document);
            trace!("released document");
        }
    }
}

/// Owns one engine buffer.
pub(crate) struct BufferGuard<'e, E: TidyEngine> {
    engine: &'e E,
    buffer: Option<E::Buffer>,
    resource: Resource,
}

impl<'e, E: TidyEngine> BufferGuard<'e, E> {
    /// Creates a buffer in the role given by `resource`.
    pub(crate) fn acquire(engine: &'e E, resource: Resource) -> TidyResult<Self> {
        let buffer = engine
            .create_buffer()
            .ok_or(TidyError::Allocation { resource })?;
        trace!(%resource, "acquired buffer");
        Ok(Self {
            engine,
            buffer: Some(buffer),
            resource,
        })
    }

    pub(crate) fn get(&self) -> &E::Buffer {
        match &self.buffer {
            Some(buffer) => buffer,
            None => unreachable!("buffer guard used after release"),
        }
    }

    pub(crate) fn get_mut(&mut self) -> &mut E::Buffer {
        match &mut self.buffer {
            Some(buffer) => buffer,
            None => unreachable!("buffer guard used after release"),
        }
    }

    /// The bytes currently in the buffer.
    pub(crate) fn contents(&self) -> Cow<'_, [u8]> {
        self.engine.buffer_contents(self.get())
    }
}

impl<E: TidyEngine> Drop for BufferGuard<'_, E> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.engine.free_buffer(buffer);
            trace!(resource = %self.resource, "freed buffer");
        }
    }
}

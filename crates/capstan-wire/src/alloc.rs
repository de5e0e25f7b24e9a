//! Buffer allocation capability for serialization.
//!
//! Serialization entry points take an allocator argument rather than going
//! straight to the global heap, so callers that pool or slab-allocate wire
//! buffers can plug their policy in without the codec knowing about it.

use bytes::BytesMut;

/// Source of writable buffers for serialization output.
pub trait BufferAllocator {
    /// Obtain a writable buffer with capacity for at least `len` bytes.
    fn allocate(&self, len: usize) -> BytesMut;
}

/// Allocator that goes straight to the global heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn allocate(&self, len: usize) -> BytesMut {
        BytesMut::with_capacity(len)
    }
}

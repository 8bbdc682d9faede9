//! Error type for heap operations
//!
//! Every fallible operation on [`FibHeap`](crate::FibHeap) reports failure through
//! [`HeapError`]. A failed call never mutates the heap.

use thiserror::Error;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The tag is already present in the target heap (insert or union)
    #[error("duplicate tag found in the target heap")]
    DuplicateTag,
    /// Negative infinity is reserved and cannot be supplied as a key
    #[error("negative infinity key is reserved for internal usage")]
    ReservedKey,
    /// NaN has no place in a total order of keys
    #[error("key must not be NaN")]
    NanKey,
    /// No entry with the given tag is present
    #[error("tag is not found")]
    TagNotFound,
    /// The new key is not strictly smaller than the current key
    #[error("new key is not smaller than current key")]
    KeyNotSmaller,
    /// The new key is not strictly larger than the current key
    #[error("new key is not larger than current key")]
    KeyNotLarger,
}

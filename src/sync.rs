//! Thread-safe heap behind a single lock
//!
//! [`SyncFibHeap`] wraps a [`FibHeap`] in one `parking_lot::Mutex`. Every public
//! operation takes the lock, including read-only queries, and runs to completion
//! before releasing it. Results are returned by value (tags are cloned) because
//! references cannot outlive the guard.
//!
//! For several operations that must appear atomic, hold the guard returned by
//! [`SyncFibHeap::lock`] across them.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use tagged_fibheap::SyncFibHeap;
//!
//! let heap = Arc::new(SyncFibHeap::new());
//! let workers: Vec<_> = (0..4u32)
//!     .map(|worker| {
//!         let heap = Arc::clone(&heap);
//!         thread::spawn(move || heap.insert(worker, f64::from(worker)).unwrap())
//!     })
//!     .collect();
//! for worker in workers {
//!     worker.join().unwrap();
//! }
//! assert_eq!(heap.len(), 4);
//! assert_eq!(heap.extract_min(), Some((0, 0.0)));
//! ```

use crate::error::HeapError;
use crate::fibonacci::FibHeap;
use crate::stats::HeapStats;
use parking_lot::{Mutex, MutexGuard};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

/// A [`FibHeap`] guarded by one exclusive lock
pub struct SyncFibHeap<T> {
    inner: Mutex<FibHeap<T>>,
}

impl<T> Default for SyncFibHeap<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(FibHeap::default()),
        }
    }
}

impl<T> From<FibHeap<T>> for SyncFibHeap<T> {
    fn from(heap: FibHeap<T>) -> Self {
        Self {
            inner: Mutex::new(heap),
        }
    }
}

impl<T> SyncFibHeap<T> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the heap for a batch of operations
    pub fn lock(&self) -> MutexGuard<'_, FibHeap<T>> {
        self.inner.lock()
    }

    /// Unwraps the inner heap
    pub fn into_inner(self) -> FibHeap<T> {
        self.inner.into_inner()
    }

    /// See [`FibHeap::len`]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// See [`FibHeap::is_empty`]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// See [`FibHeap::stats`]
    pub fn stats(&self) -> HeapStats {
        self.inner.lock().stats()
    }
}

impl<T: fmt::Debug> SyncFibHeap<T> {
    /// See [`FibHeap::dump`]
    pub fn dump(&self) -> String {
        self.inner.lock().dump()
    }
}

impl<T: Eq + Hash + Clone> SyncFibHeap<T> {
    /// Creates an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        FibHeap::with_capacity(capacity).into()
    }

    /// See [`FibHeap::insert`]
    pub fn insert(&self, tag: T, key: f64) -> Result<(), HeapError> {
        self.inner.lock().insert(tag, key)
    }

    /// See [`FibHeap::minimum`]
    pub fn minimum(&self) -> Option<(T, f64)> {
        self.inner.lock().minimum().map(|(tag, key)| (tag.clone(), key))
    }

    /// See [`FibHeap::extract_min`]
    pub fn extract_min(&self) -> Option<(T, f64)> {
        self.inner.lock().extract_min()
    }

    /// See [`FibHeap::contains`]
    pub fn contains<Q>(&self, tag: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(tag)
    }

    /// See [`FibHeap::get_key`]
    pub fn get_key<Q>(&self, tag: &Q) -> Option<f64>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get_key(tag)
    }

    /// See [`FibHeap::decrease_key`]
    pub fn decrease_key<Q>(&self, tag: &Q, key: f64) -> Result<(), HeapError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().decrease_key(tag, key)
    }

    /// See [`FibHeap::increase_key`]
    pub fn increase_key<Q>(&self, tag: &Q, key: f64) -> Result<(), HeapError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().increase_key(tag, key)
    }

    /// See [`FibHeap::delete`]
    pub fn delete<Q>(&self, tag: &Q) -> Result<(), HeapError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete(tag)
    }

    /// See [`FibHeap::extract`]
    pub fn extract<Q>(&self, tag: &Q) -> Option<(T, f64)>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().extract(tag)
    }

    /// See [`FibHeap::extract_key`]
    pub fn extract_key<Q>(&self, tag: &Q) -> Option<f64>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().extract_key(tag)
    }

    /// Inserts every entry of `other` into this heap
    ///
    /// `other` is snapshotted under its own lock, which is released before this
    /// heap's lock is taken. The two locks are never held together, so opposing
    /// unions cannot deadlock and `heap.union(&heap)` is safe (it fails with
    /// [`HeapError::DuplicateTag`] unless the heap is empty).
    pub fn union(&self, other: &SyncFibHeap<T>) -> Result<(), HeapError> {
        let snapshot: Vec<(T, f64)> = other
            .inner
            .lock()
            .iter()
            .map(|(tag, key)| (tag.clone(), key))
            .collect();
        self.inner.lock().union_entries(snapshot)
    }

    /// Inserts every entry of an unshared heap into this one
    pub fn union_heap(&self, other: &FibHeap<T>) -> Result<(), HeapError> {
        self.inner.lock().union(other)
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncFibHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SyncFibHeap").field(&*self.inner.lock()).finish()
    }
}

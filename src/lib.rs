//! Tagged Fibonacci heap for Rust
//!
//! This crate provides a mergeable priority queue implemented as a Fibonacci heap
//! whose entries are identified by caller-supplied *tags*. Because every entry is
//! addressed by its tag, priorities can be updated or entries removed without
//! holding on to handles, which suits algorithms that revise priorities of queued
//! items (shortest paths, minimum spanning trees, event schedulers).
//!
//! # Features
//!
//! - **[`FibHeap`]**: O(1) insert, minimum and amortized decrease_key; O(log n)
//!   amortized extract_min and delete; increase_key; all-or-nothing union
//! - **[`SyncFibHeap`]**: the same heap behind one `parking_lot` mutex (feature `sync`, on by default)
//! - **[`pathfinding`]**: Dijkstra and A* driven by `decrease_key`
//! - **Diagnostics**: [`FibHeap::stats`], a deterministic [`FibHeap::dump`] and [`FibHeap::validate`]
//!
//! Nodes are kept in a generational arena and refer to each other by key, so the
//! parent/child/root graph needs no `unsafe` and no reference counting.
//!
//! # Example
//!
//! ```rust
//! use tagged_fibheap::{FibHeap, HeapError};
//!
//! let mut heap = FibHeap::new();
//! heap.insert("A", 5.0).unwrap();
//! heap.insert("B", 3.0).unwrap();
//! heap.insert("C", 9.0).unwrap();
//! assert_eq!(heap.minimum(), Some((&"B", 3.0)));
//!
//! heap.decrease_key("C", 1.0).unwrap();
//! assert_eq!(heap.decrease_key("C", 2.0), Err(HeapError::KeyNotSmaller));
//! assert_eq!(heap.extract_min(), Some(("C", 1.0)));
//! assert_eq!(heap.insert("A", 0.0), Err(HeapError::DuplicateTag));
//! ```

pub mod error;
pub mod fibonacci;
pub mod pathfinding;
pub mod stats;
mod storage;
#[cfg(feature = "sync")]
pub mod sync;

pub use error::HeapError;
pub use fibonacci::{DrainSorted, FibHeap, Iter, RESERVED_KEY};
pub use stats::HeapStats;
#[cfg(feature = "sync")]
pub use sync::SyncFibHeap;

//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert and decrease_key
//! - O(1) find-minimum
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees whose roots form an
//! unordered root list. The heap maintains a reference to the minimum root.
//!
//! Entries are identified by a caller-supplied *tag*. A hash index maps each tag to
//! its node, so priority updates and deletions address entries by identity instead
//! of through handles.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity                           |
//! |----------------|--------------------------------------|
//! | `insert`       | O(1)                                 |
//! | `minimum`      | O(1)                                 |
//! | `extract_min`  | O(log n) amortized                   |
//! | `decrease_key` | O(1) amortized                       |
//! | `increase_key` | O(violating children + roots)        |
//! | `delete`       | O(log n) amortized                   |
//! | `union`        | O(size of the other heap)            |
//!
//! The amortized bounds come from the potential `#roots + 2 * #marked`.
//!
//! # Keys
//!
//! Keys are `f64` and may be `+inf`. Negative infinity is reserved
//! ([`RESERVED_KEY`]) and NaN is rejected, so every key-setting call
//! validates its key before touching the heap.

use crate::error::HeapError;
use crate::storage::{Forest, NodeKey, Siblings};
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace, warn};

/// The key value no public operation accepts
///
/// Callers that prefer sentinel values over `Option` can map an absent
/// result to this key.
pub const RESERVED_KEY: f64 = f64::NEG_INFINITY;

fn check_key(key: f64) -> Result<(), HeapError> {
    if key.is_nan() {
        Err(HeapError::NanKey)
    } else if key == RESERVED_KEY {
        Err(HeapError::ReservedKey)
    } else {
        Ok(())
    }
}

/// Fibonacci Heap keyed by unique tags
///
/// # Example
///
/// ```rust
/// use tagged_fibheap::FibHeap;
///
/// let mut heap = FibHeap::new();
/// heap.insert("a", 5.0).unwrap();
/// heap.insert("b", 3.0).unwrap();
/// heap.decrease_key(&"a", 1.0).unwrap();
/// assert_eq!(heap.minimum(), Some((&"a", 1.0)));
/// assert_eq!(heap.extract_min(), Some(("a", 1.0)));
/// ```
pub struct FibHeap<T> {
    forest: Forest<T>,
    index: FxHashMap<T, NodeKey>,
    min: Option<NodeKey>,
    /// Scratch space for consolidate: degree to (scan position, root)
    degree_table: Vec<Option<(usize, NodeKey)>>,
}

impl<T> Default for FibHeap<T> {
    fn default() -> Self {
        Self {
            forest: Forest::default(),
            index: FxHashMap::default(),
            min: None,
            degree_table: Vec::new(),
        }
    }
}

impl<T> FibHeap<T> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the heap is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the tag and key of the minimum entry without removing it
    ///
    /// On key ties the entry that consolidation left first in the root list wins,
    /// which is deterministic for a given sequence of operations.
    pub fn minimum(&self) -> Option<(&T, f64)> {
        self.min.map(|min| {
            let node = &self.forest[min];
            (&node.tag, node.key)
        })
    }

    /// Iterates over all entries in depth-first forest order
    ///
    /// The order is deterministic for a given heap state but unrelated to key order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            forest: &self.forest,
            stack: smallvec![self.forest.roots()],
            remaining: self.len(),
        }
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.forest.clear();
        self.index.clear();
        self.min = None;
    }

    pub(crate) fn forest(&self) -> &Forest<T> {
        &self.forest
    }

    /// Recomputes the minimum as the first root holding the smallest key
    fn reset_min(&mut self) {
        let mut min: Option<NodeKey> = None;
        for root in self.forest.roots() {
            if min.map_or(true, |m| self.forest[root].key < self.forest[m].key) {
                min = Some(root);
            }
        }
        self.min = min;
    }

    /// Merges same-degree trees until each degree occurs at most once among the roots
    ///
    /// Roots are scanned in list order. A merged tree keeps the list position of
    /// whichever of the two roots stays on top, and on equal keys the root
    /// scanned later wins.
    fn consolidate(&mut self) {
        let mut trees: Vec<Option<NodeKey>> =
            self.forest.take_roots().into_iter().map(Some).collect();
        let before = trees.len();

        for scanned in 0..trees.len() {
            let (mut pos, mut tree) = match trees[scanned] {
                Some(tree) => (scanned, tree),
                None => continue,
            };
            loop {
                let degree = self.forest[tree].degree;
                match self.degree_table.get_mut(degree).and_then(|slot| slot.take()) {
                    Some((other_pos, other)) => {
                        if self.forest[tree].key <= self.forest[other].key {
                            self.forest.link(tree, other);
                            trees[other_pos] = None;
                        } else {
                            self.forest.link(other, tree);
                            trees[pos] = None;
                            pos = other_pos;
                            tree = other;
                        }
                    }
                    None => {
                        if self.degree_table.len() <= degree {
                            self.degree_table.resize(degree + 1, None);
                        }
                        self.degree_table[degree] = Some((pos, tree));
                        break;
                    }
                }
            }
        }

        self.degree_table.clear();
        for tree in trees.into_iter().flatten() {
            self.forest.add_root(tree);
        }
        self.reset_min();
        trace!(before, after = self.forest.root_count(), "consolidated root list");
    }

    /// Detaches `node` from its parent and moves it to the root list
    fn cut(&mut self, node: NodeKey) {
        if self.forest.unlink(node).is_some() {
            self.forest.add_root(node);
        }
    }

    /// Walks up from `node`: marks the first unmarked non-root and stops,
    /// cutting every already-marked node on the way
    fn cascading_cut(&mut self, mut node: NodeKey) {
        while let Some(parent) = self.forest[node].parent {
            if !self.forest[node].marked {
                self.forest[node].marked = true;
                return;
            }
            self.cut(node);
            node = parent;
        }
    }

    /// Removes the current minimum root, promoting its children
    fn remove_min(&mut self) -> Option<(T, f64)> {
        let min = self.min?;
        for child in self.forest.take_children(min) {
            self.forest.add_root(child);
        }
        self.forest.remove_root(min);
        let node = self.forest.remove(min)?;

        if self.forest.len() == 0 {
            self.min = None;
        } else {
            self.consolidate();
        }
        Some((node.tag, node.key))
    }

    /// Turns `node` into a root and makes it the minimum, whatever its key
    ///
    /// This is the deletion path: the node is then removed by `remove_min`
    /// without ever writing an out-of-band key into it.
    fn force_to_root(&mut self, node: NodeKey) {
        if let Some(parent) = self.forest[node].parent {
            self.cut(node);
            self.cascading_cut(parent);
        }
        self.min = Some(node);
    }
}

impl<T: Eq + Hash + Clone> FibHeap<T> {
    /// Creates an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            forest: Forest::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            min: None,
            degree_table: Vec::new(),
        }
    }

    /// Inserts an entry
    ///
    /// # Errors
    /// - [`HeapError::ReservedKey`] if `key` is negative infinity
    /// - [`HeapError::NanKey`] if `key` is NaN
    /// - [`HeapError::DuplicateTag`] if `tag` is already present
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, tag: T, key: f64) -> Result<(), HeapError> {
        check_key(key)?;
        if self.index.contains_key(&tag) {
            return Err(HeapError::DuplicateTag);
        }
        self.insert_unchecked(tag, key);
        Ok(())
    }

    fn insert_unchecked(&mut self, tag: T, key: f64) {
        let node = self.forest.push_root(tag.clone(), key);
        self.index.insert(tag, node);
        if self.min.map_or(true, |min| key < self.forest[min].key) {
            self.min = Some(node);
        }
    }

    /// Returns true if an entry with this tag is present
    pub fn contains<Q>(&self, tag: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(tag)
    }

    /// Returns the key of the entry with this tag
    pub fn get_key<Q>(&self, tag: &Q) -> Option<f64>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(tag).map(|&node| self.forest[node].key)
    }

    fn lookup<Q>(&self, tag: &Q) -> Result<NodeKey, HeapError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(tag).copied().ok_or(HeapError::TagNotFound)
    }

    /// Removes and returns the entry with the smallest key
    ///
    /// # Time Complexity
    /// O(log n) amortized, O(n) worst case for a single call
    pub fn extract_min(&mut self) -> Option<(T, f64)> {
        let (tag, key) = self.remove_min()?;
        self.index.remove(&tag);
        Some((tag, key))
    }

    /// Lowers the key of the entry with this tag
    ///
    /// # Errors
    /// - [`HeapError::ReservedKey`] / [`HeapError::NanKey`] for an invalid key
    /// - [`HeapError::TagNotFound`] if no entry has this tag
    /// - [`HeapError::KeyNotSmaller`] if `key` is not strictly below the current key
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key<Q>(&mut self, tag: &Q, key: f64) -> Result<(), HeapError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        check_key(key)?;
        let node = self.lookup(tag)?;
        if key >= self.forest[node].key {
            return Err(HeapError::KeyNotSmaller);
        }

        self.forest[node].key = key;
        if let Some(parent) = self.forest[node].parent {
            if key < self.forest[parent].key {
                self.cut(node);
                self.cascading_cut(parent);
            }
        }

        if self.forest[node].is_root() && self.min.map_or(true, |min| key < self.forest[min].key) {
            self.min = Some(node);
        }
        Ok(())
    }

    /// Raises the key of the entry with this tag
    ///
    /// Children that now violate heap order are cut to the root list, each cut
    /// cascading through this node. Unlike [`decrease_key`](Self::decrease_key)
    /// this is not O(1) amortized: it costs one cut per violating child, plus a
    /// root scan when the entry was the minimum.
    ///
    /// # Errors
    /// - [`HeapError::ReservedKey`] / [`HeapError::NanKey`] for an invalid key
    /// - [`HeapError::TagNotFound`] if no entry has this tag
    /// - [`HeapError::KeyNotLarger`] if `key` is not strictly above the current key
    pub fn increase_key<Q>(&mut self, tag: &Q, key: f64) -> Result<(), HeapError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        check_key(key)?;
        let node = self.lookup(tag)?;
        if key <= self.forest[node].key {
            return Err(HeapError::KeyNotLarger);
        }

        self.forest[node].key = key;
        let children: Vec<NodeKey> = self.forest.children(node).collect();
        for child in children {
            if self.forest[child].key < key {
                self.cut(child);
                self.cascading_cut(node);
            }
        }

        if self.min == Some(node) {
            self.reset_min();
        }
        Ok(())
    }

    /// Removes the entry with this tag
    ///
    /// # Errors
    /// [`HeapError::TagNotFound`] if no entry has this tag
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete<Q>(&mut self, tag: &Q) -> Result<(), HeapError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.extract(tag) {
            Some(_) => Ok(()),
            None => {
                debug!("delete of absent tag");
                Err(HeapError::TagNotFound)
            }
        }
    }

    /// Removes the entry with this tag, returning its tag and key
    ///
    /// Returns `None` if no entry has this tag. The explicit `Option` keeps
    /// "not found" apart from entries whose key is infinite.
    pub fn extract<Q>(&mut self, tag: &Q) -> Option<(T, f64)>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.index.get(tag).copied()?;
        self.force_to_root(node);
        self.extract_min()
    }

    /// Removes the entry with this tag, returning only its key
    pub fn extract_key<Q>(&mut self, tag: &Q) -> Option<f64>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.extract(tag).map(|(_, key)| key)
    }

    /// Inserts every entry of `other` into this heap
    ///
    /// All of `other`'s tags are checked before anything is inserted, so a
    /// collision leaves this heap untouched. `other` is never modified.
    ///
    /// Entries are re-inserted one by one rather than spliced in as whole trees,
    /// so the cost is proportional to `other.len()`.
    ///
    /// # Errors
    /// [`HeapError::DuplicateTag`] if any tag of `other` is present in this heap
    pub fn union(&mut self, other: &FibHeap<T>) -> Result<(), HeapError> {
        if other.index.keys().any(|tag| self.index.contains_key(tag)) {
            debug!(source = other.len(), "union rejected: duplicate tag");
            return Err(HeapError::DuplicateTag);
        }
        self.index.reserve(other.len());
        for (tag, key) in other.iter() {
            self.insert_unchecked(tag.clone(), key);
        }
        debug!(source = other.len(), len = self.len(), "union complete");
        Ok(())
    }

    /// Union from an owned snapshot of another heap's entries
    ///
    /// The entries must carry distinct tags and valid keys, as any heap's do.
    #[cfg(feature = "sync")]
    pub(crate) fn union_entries(&mut self, entries: Vec<(T, f64)>) -> Result<(), HeapError> {
        if entries.iter().any(|(tag, _)| self.index.contains_key(tag)) {
            debug!(source = entries.len(), "union rejected: duplicate tag");
            return Err(HeapError::DuplicateTag);
        }
        let source = entries.len();
        self.index.reserve(source);
        for (tag, key) in entries {
            self.insert_unchecked(tag, key);
        }
        debug!(source, len = self.len(), "union complete");
        Ok(())
    }

    /// Returns an iterator that extracts entries in non-decreasing key order
    ///
    /// Entries not yet yielded when the iterator is dropped stay in the heap.
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, T> {
        DrainSorted { heap: self }
    }

    /// Checks every structural invariant, describing the first violation found
    ///
    /// This walks the whole forest and is meant for tests and debugging.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = 0usize;
        let mut smallest: Option<f64> = None;
        let mut stack: Vec<NodeKey> = Vec::new();

        let roots = self.check_siblings(self.forest.roots(), None)?;
        if roots.len() != self.forest.root_count() {
            return Err(format!(
                "root list holds {} nodes but counts {}",
                roots.len(),
                self.forest.root_count()
            ));
        }
        for &root in &roots {
            if self.forest[root].marked {
                return Err(format!("root {root:?} is marked"));
            }
        }
        stack.extend(roots);

        while let Some(key) = stack.pop() {
            let node = &self.forest[key];
            seen += 1;
            if smallest.map_or(true, |s| node.key < s) {
                smallest = Some(node.key);
            }
            if self.index.get(&node.tag) != Some(&key) {
                return Err(format!("node {key:?} is not indexed under its tag"));
            }
            let children = self.check_siblings(self.forest.children(key), Some(key))?;
            if children.len() != node.degree {
                return Err(format!(
                    "node {key:?} has {} children but degree {}",
                    children.len(),
                    node.degree
                ));
            }
            for &child in &children {
                let child_key = self.forest[child].key;
                if child_key < node.key {
                    return Err(format!(
                        "heap order violated: child key {child_key} below parent key {}",
                        node.key
                    ));
                }
            }
            stack.extend(children);
        }

        if seen != self.index.len() || seen != self.forest.len() {
            return Err(format!(
                "reachable nodes {seen}, index size {}, arena size {}",
                self.index.len(),
                self.forest.len()
            ));
        }

        match (self.min, smallest) {
            (None, None) => Ok(()),
            (Some(min), Some(smallest)) => {
                let node = &self.forest[min];
                if !node.is_root() {
                    Err("minimum is not a root".to_string())
                } else if node.key != smallest {
                    Err(format!("minimum key {} but smallest live key {smallest}", node.key))
                } else {
                    Ok(())
                }
            }
            (min, _) => Err(format!("minimum {min:?} disagrees with emptiness")),
        }
    }

    /// Collects one sibling list, checking its links and parent pointers
    fn check_siblings(
        &self,
        siblings: Siblings<'_, T>,
        parent: Option<NodeKey>,
    ) -> Result<Vec<NodeKey>, String> {
        let mut keys = Vec::new();
        // A list longer than the arena has lost its way back to its head
        for key in siblings.take(self.forest.len() + 1) {
            let node = self
                .forest
                .get(key)
                .ok_or_else(|| format!("node {key:?} is not live"))?;
            if node.parent != parent {
                return Err(format!("node {key:?} does not point back to {parent:?}"));
            }
            if self.forest[node.right].left != key {
                return Err(format!("node {key:?} and its right sibling disagree"));
            }
            keys.push(key);
        }
        if keys.len() > self.forest.len() {
            return Err("sibling list does not close".to_string());
        }
        Ok(keys)
    }
}

impl<T: fmt::Debug> fmt::Debug for FibHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibHeap")
            .field("len", &self.len())
            .field("roots", &self.forest.root_count())
            .field("minimum", &self.minimum())
            .finish()
    }
}

impl<T: Eq + Hash + Clone> Clone for FibHeap<T> {
    fn clone(&self) -> Self {
        Self {
            forest: self.forest.clone(),
            index: self.index.clone(),
            min: self.min,
            degree_table: Vec::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> Extend<(T, f64)> for FibHeap<T> {
    /// Inserts each entry, skipping (and logging) those that `insert` rejects
    fn extend<I: IntoIterator<Item = (T, f64)>>(&mut self, iter: I) {
        for (tag, key) in iter {
            if let Err(err) = self.insert(tag, key) {
                warn!(%err, key, "skipping rejected entry");
            }
        }
    }
}

impl<T: Eq + Hash + Clone> FromIterator<(T, f64)> for FibHeap<T> {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        let mut heap = FibHeap::new();
        heap.extend(iter);
        heap
    }
}

/// Depth-first iterator over a heap's entries, see [`FibHeap::iter`]
pub struct Iter<'a, T> {
    forest: &'a Forest<T>,
    /// One sibling walk per tree level still being visited
    stack: SmallVec<[Siblings<'a, T>; 8]>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, f64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            let Some(key) = level.next() else {
                self.stack.pop();
                continue;
            };
            let forest = self.forest;
            let node = &forest[key];
            if node.child.is_some() {
                self.stack.push(forest.children(key));
            }
            self.remaining -= 1;
            return Some((&node.tag, node.key));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T: Eq + Hash + Clone> IntoIterator for &'a FibHeap<T> {
    type Item = (&'a T, f64);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator extracting entries in key order, see [`FibHeap::drain_sorted`]
pub struct DrainSorted<'a, T: Eq + Hash + Clone> {
    heap: &'a mut FibHeap<T>,
}

impl<T: Eq + Hash + Clone> Iterator for DrainSorted<'_, T> {
    type Item = (T, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.extract_min()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<T: Eq + Hash + Clone> ExactSizeIterator for DrainSorted<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds 1 -> {2, 3 -> {4}, 5 -> {6, 7 -> {8}}} by inserting 0..=8 and extracting 0
    fn nine_node_tree() -> FibHeap<u32> {
        let mut heap = FibHeap::new();
        for tag in 0..=8u32 {
            heap.insert(tag, f64::from(tag)).unwrap();
        }
        assert_eq!(heap.extract_min(), Some((0, 0.0)));
        heap.validate().unwrap();
        heap
    }

    fn parent_of(heap: &FibHeap<u32>, tag: u32) -> Option<u32> {
        let node = heap.index[&tag];
        heap.forest[node].parent.map(|parent| heap.forest[parent].tag)
    }

    fn children_of(heap: &FibHeap<u32>, tag: u32) -> Vec<u32> {
        heap.forest
            .children(heap.index[&tag])
            .map(|child| heap.forest[child].tag)
            .collect()
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = FibHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.insert("A", 5.0).unwrap();
        heap.insert("B", 3.0).unwrap();
        heap.insert("C", 9.0).unwrap();

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.minimum(), Some((&"B", 3.0)));
        assert_eq!(heap.extract_min(), Some(("B", 3.0)));
        assert_eq!(heap.minimum(), Some((&"A", 5.0)));
        heap.validate().unwrap();
    }

    #[test]
    fn test_empty_heap() {
        let mut heap: FibHeap<i32> = FibHeap::new();
        assert_eq!(heap.minimum(), None);
        assert_eq!(heap.extract_min(), None);
        assert_eq!(heap.get_key(&1), None);
        assert_eq!(heap.extract(&1), None);
        assert_eq!(heap.delete(&1), Err(HeapError::TagNotFound));
        heap.validate().unwrap();
    }

    #[test]
    fn test_consolidate_shape() {
        let heap = nine_node_tree();
        assert_eq!(heap.forest.root_count(), 1);
        assert_eq!(heap.minimum(), Some((&1, 1.0)));
        assert_eq!(parent_of(&heap, 1), None);
        assert_eq!(children_of(&heap, 1), vec![2, 3, 5]);
        assert_eq!(children_of(&heap, 3), vec![4]);
        assert_eq!(children_of(&heap, 5), vec![6, 7]);
        assert_eq!(children_of(&heap, 7), vec![8]);
        assert_eq!(parent_of(&heap, 8), Some(7));
    }

    #[test]
    fn test_consolidate_tie_puts_later_root_on_top() {
        let mut heap = FibHeap::new();
        heap.insert("min", 0.0).unwrap();
        heap.insert("x", 1.0).unwrap();
        heap.insert("y", 1.0).unwrap();
        heap.extract_min();
        // The root list after removing "min" is [x, y]; y is scanned second
        // and takes x as its child on the tie.
        let x = heap.index["x"];
        let y = heap.index["y"];
        assert_eq!(heap.forest[x].parent, Some(y));
        assert_eq!(heap.minimum(), Some((&"y", 1.0)));
        assert_eq!(heap.extract_min(), Some(("y", 1.0)));
        assert_eq!(heap.extract_min(), Some(("x", 1.0)));
    }

    #[test]
    fn test_minimum_tie_picks_first_root() {
        let mut heap = FibHeap::new();
        heap.insert("a", 2.0).unwrap();
        heap.insert("b", 2.0).unwrap();
        assert_eq!(heap.minimum(), Some((&"a", 2.0)));

        heap.insert("c", 5.0).unwrap();
        heap.insert("d", 2.0).unwrap();
        heap.insert("e", 1.0).unwrap();
        heap.increase_key("e", 9.0).unwrap();
        assert_eq!(heap.minimum(), Some((&"a", 2.0)));
    }

    #[test]
    fn test_decrease_key_reorders() {
        let mut heap = FibHeap::new();
        heap.insert("X", 10.0).unwrap();
        heap.decrease_key("X", 1.0).unwrap();
        assert_eq!(heap.minimum(), Some((&"X", 1.0)));
        assert_eq!(heap.decrease_key("X", 1.0), Err(HeapError::KeyNotSmaller));
        assert_eq!(heap.get_key("X"), Some(1.0));
    }

    #[test]
    fn test_decrease_key_cut_marks_parent() {
        let mut heap = nine_node_tree();
        heap.decrease_key(&4, 0.5).unwrap();
        assert_eq!(parent_of(&heap, 4), None);
        assert_eq!(heap.minimum(), Some((&4, 0.5)));
        assert!(heap.forest[heap.index[&3]].marked);
        heap.validate().unwrap();
    }

    #[test]
    fn test_decrease_key_without_violation_keeps_parent() {
        let mut heap = nine_node_tree();
        heap.decrease_key(&8, 7.5).unwrap();
        assert_eq!(parent_of(&heap, 8), Some(7));
        assert!(!heap.forest[heap.index[&7]].marked);
        heap.validate().unwrap();
    }

    #[test]
    fn test_cascading_cut() {
        let mut heap = nine_node_tree();

        heap.decrease_key(&8, 0.5).unwrap();
        assert!(heap.forest[heap.index[&7]].marked);

        heap.decrease_key(&6, 0.75).unwrap();
        assert!(heap.forest[heap.index[&5]].marked);
        assert_eq!(heap.minimum(), Some((&8, 0.5)));

        // 7 loses its place under 5, which is already marked, so 5 is cut too
        heap.decrease_key(&7, 0.25).unwrap();
        assert_eq!(parent_of(&heap, 5), None);
        assert!(!heap.forest[heap.index[&5]].marked);
        let roots: Vec<u32> = heap.forest.roots().map(|root| heap.forest[root].tag).collect();
        assert_eq!(roots, vec![1, 8, 6, 7, 5]);
        assert_eq!(heap.minimum(), Some((&7, 0.25)));
        heap.validate().unwrap();

        let keys: Vec<f64> = heap.drain_sorted().map(|(_, key)| key).collect();
        assert_eq!(keys, vec![0.25, 0.5, 0.75, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_increase_key_cuts_violating_children() {
        let mut heap = nine_node_tree();
        heap.increase_key(&3, 4.5).unwrap();
        assert_eq!(parent_of(&heap, 4), None);
        assert_eq!(parent_of(&heap, 3), Some(1));
        assert!(heap.forest[heap.index[&3]].marked);
        heap.validate().unwrap();
    }

    #[test]
    fn test_increase_key_of_minimum_rescans_roots() {
        let mut heap = nine_node_tree();
        heap.increase_key(&1, 10.0).unwrap();
        assert_eq!(heap.minimum(), Some((&2, 2.0)));
        assert_eq!(heap.forest.root_count(), 4);
        heap.validate().unwrap();
        assert_eq!(heap.increase_key(&1, 10.0), Err(HeapError::KeyNotLarger));
    }

    #[test]
    fn test_increase_key_can_cascade_through_node() {
        let mut heap = nine_node_tree();
        // 5 has children 6 and 7; raising it above both cuts 6 (marking 5) and
        // then 7, whose cut reaches the marked 5 and moves 5 to the root list.
        heap.increase_key(&5, 7.5).unwrap();
        assert_eq!(parent_of(&heap, 5), None);
        assert_eq!(parent_of(&heap, 6), None);
        assert_eq!(parent_of(&heap, 7), None);
        assert_eq!(parent_of(&heap, 8), Some(7));
        heap.validate().unwrap();
    }

    #[test]
    fn test_key_validation_order() {
        let mut heap = FibHeap::new();
        heap.insert(1, 1.0).unwrap();
        assert_eq!(heap.insert(1, RESERVED_KEY), Err(HeapError::ReservedKey));
        assert_eq!(heap.insert(2, f64::NAN), Err(HeapError::NanKey));
        assert_eq!(heap.insert(1, 2.0), Err(HeapError::DuplicateTag));
        assert_eq!(heap.decrease_key(&9, RESERVED_KEY), Err(HeapError::ReservedKey));
        assert_eq!(heap.decrease_key(&9, 0.0), Err(HeapError::TagNotFound));
        assert_eq!(heap.increase_key(&9, f64::NAN), Err(HeapError::NanKey));
        assert_eq!(heap.increase_key(&9, 5.0), Err(HeapError::TagNotFound));
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.get_key(&1), Some(1.0));
    }

    #[test]
    fn test_delete_interior_node() {
        let mut heap = nine_node_tree();
        heap.delete(&7).unwrap();
        assert!(!heap.contains(&7));
        assert_eq!(heap.len(), 7);
        heap.validate().unwrap();
        let tags: Vec<u32> = heap.drain_sorted().map(|(tag, _)| tag).collect();
        assert_eq!(tags, vec![1, 2, 3, 4, 5, 6, 8]);
    }

    #[test]
    fn test_extract_returns_pre_deletion_key() {
        let mut heap = FibHeap::new();
        heap.insert("inf", f64::INFINITY).unwrap();
        heap.insert("one", 1.0).unwrap();
        assert_eq!(heap.extract("inf"), Some(("inf", f64::INFINITY)));
        assert_eq!(heap.extract("inf"), None);
        assert_eq!(heap.extract_key("one"), Some(1.0));
        assert!(heap.is_empty());
        heap.validate().unwrap();
    }

    #[test]
    fn test_infinite_keys() {
        let mut heap = FibHeap::new();
        heap.insert(0, 0.0).unwrap();
        for tag in 1..=3 {
            heap.insert(tag, f64::INFINITY).unwrap();
        }
        assert_eq!(heap.extract_min().map(|(_, key)| key), Some(0.0));
        assert_eq!(heap.extract_min().map(|(_, key)| key), Some(f64::INFINITY));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_union_disjoint() {
        let mut heap1 = FibHeap::new();
        heap1.insert("a", 5.0).unwrap();
        heap1.insert("b", 10.0).unwrap();

        let mut heap2 = FibHeap::new();
        heap2.insert("c", 3.0).unwrap();
        heap2.insert("d", 7.0).unwrap();

        heap1.union(&heap2).unwrap();
        assert_eq!(heap1.minimum(), Some((&"c", 3.0)));
        assert_eq!(heap1.len(), 4);
        assert_eq!(heap2.len(), 2);
        heap1.validate().unwrap();
    }

    #[test]
    fn test_union_collision_is_atomic() {
        let mut heap1 = FibHeap::new();
        heap1.insert("a", 5.0).unwrap();

        let mut heap2 = FibHeap::new();
        heap2.insert("z", 1.0).unwrap();
        heap2.insert("a", 2.0).unwrap();

        assert_eq!(heap1.union(&heap2), Err(HeapError::DuplicateTag));
        assert_eq!(heap1.len(), 1);
        assert_eq!(heap1.minimum(), Some((&"a", 5.0)));
        assert!(!heap1.contains("z"));
        assert_eq!(heap2.len(), 2);
    }

    #[test]
    fn test_iter_visits_every_entry() {
        let heap = nine_node_tree();
        assert_eq!(heap.iter().len(), 8);
        // Depth-first, children in list order
        let tags: Vec<u32> = heap.iter().map(|(&tag, _)| tag).collect();
        assert_eq!(tags, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_extend_skips_rejected() {
        let heap: FibHeap<&str> = vec![("a", 1.0), ("a", 2.0), ("b", f64::NAN), ("c", 0.5)]
            .into_iter()
            .collect();
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.get_key("a"), Some(1.0));
        assert_eq!(heap.minimum(), Some((&"c", 0.5)));
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut heap = nine_node_tree();
        heap.clear();
        assert!(heap.is_empty());
        heap.validate().unwrap();
        heap.insert(3, 3.0).unwrap();
        assert_eq!(heap.minimum(), Some((&3, 3.0)));
    }

    #[test]
    fn test_string_tags_borrow_lookup() {
        let mut heap: FibHeap<String> = FibHeap::with_capacity(4);
        heap.insert("alpha".to_string(), 2.0).unwrap();
        heap.insert("beta".to_string(), 1.0).unwrap();
        heap.decrease_key("alpha", 0.5).unwrap();
        assert_eq!(heap.extract_min(), Some(("alpha".to_string(), 0.5)));
        assert!(heap.contains("beta"));
    }
}

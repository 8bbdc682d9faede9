//! Arena storage for heap nodes
//!
//! Nodes live in a [`SlotMap`] and refer to each other by [`NodeKey`] instead of
//! by pointer. Siblings form a circular doubly linked list through `left` and
//! `right`; a parent keeps its first child and a forest keeps its first root, and
//! the last element of a list is always `first.left`.
//!
//! Every list keeps its order: appends go to the end and removal splices a node
//! out in place. Consolidation scans roots in list order, so this order decides
//! which of two equal keys ends up on top.
//!
//! Keys are generational, so a key that outlived its node never aliases a newer
//! node occupying the same slot.

use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};

new_key_type! {
    /// Arena key identifying one heap node
    pub struct NodeKey;
}

/// One heap entry and its tree bookkeeping
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) tag: T,
    pub(crate) key: f64,
    pub(crate) parent: Option<NodeKey>,
    /// First child, if any
    pub(crate) child: Option<NodeKey>,
    pub(crate) left: NodeKey,
    pub(crate) right: NodeKey,
    pub(crate) degree: usize,
    /// Lost a child since it last became a child itself
    pub(crate) marked: bool,
}

impl<T> Node<T> {
    /// A detached node whose sibling links point at itself
    fn new(tag: T, key: f64, this: NodeKey) -> Self {
        Node {
            tag,
            key,
            parent: None,
            child: None,
            left: this,
            right: this,
            degree: 0,
            marked: false,
        }
    }

    #[inline]
    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The forest of heap-ordered trees: node arena plus the root list
///
/// The forest only maintains structure (who is whose child, who is a root, in
/// which order). Key ordering decisions belong to the heap built on top of it.
#[derive(Debug, Clone)]
pub(crate) struct Forest<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    /// First root, if any
    roots: Option<NodeKey>,
    root_count: usize,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: None,
            root_count: 0,
        }
    }
}

impl<T> Forest<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            roots: None,
            root_count: 0,
        }
    }

    /// Number of live nodes
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn root_count(&self) -> usize {
        self.root_count
    }

    #[inline]
    pub(crate) fn get(&self, key: NodeKey) -> Option<&Node<T>> {
        self.nodes.get(key)
    }

    /// Roots in list order
    pub(crate) fn roots(&self) -> Siblings<'_, T> {
        self.siblings(self.roots)
    }

    /// Children of `key` in list order
    pub(crate) fn children(&self, key: NodeKey) -> Siblings<'_, T> {
        self.siblings(self.nodes[key].child)
    }

    fn siblings(&self, head: Option<NodeKey>) -> Siblings<'_, T> {
        Siblings {
            forest: self,
            head,
            next: head,
        }
    }

    /// Iterates over every live node in arena order
    pub(crate) fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node<T>)> {
        self.nodes.iter()
    }

    /// Allocates a node and appends it to the root list
    pub(crate) fn push_root(&mut self, tag: T, key: f64) -> NodeKey {
        let node = self.nodes.insert_with_key(|this| Node::new(tag, key, this));
        self.roots = Some(self.append(self.roots, node));
        self.root_count += 1;
        node
    }

    /// Appends a detached node to the end of the root list
    ///
    /// Roots never carry a mark, so the mark is cleared here.
    pub(crate) fn add_root(&mut self, key: NodeKey) {
        let node = &mut self.nodes[key];
        node.parent = None;
        node.marked = false;
        self.roots = Some(self.append(self.roots, key));
        self.root_count += 1;
    }

    /// Removes a root from the root list without freeing it
    pub(crate) fn remove_root(&mut self, key: NodeKey) {
        debug_assert!(self.nodes[key].is_root());
        if let Some(head) = self.roots {
            self.roots = self.detach(head, key);
            self.root_count -= 1;
        }
    }

    /// Empties the root list, returning the former roots in order
    ///
    /// The returned nodes are detached and must each be re-attached by
    /// [`add_root`](Self::add_root) or [`link`](Self::link).
    pub(crate) fn take_roots(&mut self) -> Vec<NodeKey> {
        let roots: Vec<NodeKey> = self.roots().collect();
        self.roots = None;
        self.root_count = 0;
        roots
    }

    /// Detaches and returns all children of `key` in order
    ///
    /// The children keep their stale parent link until they are re-attached.
    pub(crate) fn take_children(&mut self, key: NodeKey) -> Vec<NodeKey> {
        let children: Vec<NodeKey> = self.children(key).collect();
        let node = &mut self.nodes[key];
        node.child = None;
        node.degree = 0;
        children
    }

    /// Makes the detached node `child` the last child of `parent`
    pub(crate) fn link(&mut self, parent: NodeKey, child: NodeKey) {
        let head = self.nodes[parent].child;
        let head = self.append(head, child);
        let node = &mut self.nodes[child];
        node.marked = false;
        node.parent = Some(parent);
        let parent = &mut self.nodes[parent];
        parent.child = Some(head);
        parent.degree += 1;
    }

    /// Detaches `child` from its parent, returning the former parent
    ///
    /// The child is left detached: it belongs to no list until the caller
    /// re-attaches it.
    pub(crate) fn unlink(&mut self, child: NodeKey) -> Option<NodeKey> {
        let parent = self.nodes[child].parent.take()?;
        if let Some(head) = self.nodes[parent].child {
            let head = self.detach(head, child);
            let node = &mut self.nodes[parent];
            node.child = head;
            node.degree -= 1;
        }
        Some(parent)
    }

    /// Frees a node that no longer belongs to any list
    pub(crate) fn remove(&mut self, key: NodeKey) -> Option<Node<T>> {
        self.nodes.remove(key)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.roots = None;
        self.root_count = 0;
    }

    /// Appends `key` to the list starting at `head`, returning the new head
    fn append(&mut self, head: Option<NodeKey>, key: NodeKey) -> NodeKey {
        let Some(first) = head else {
            let node = &mut self.nodes[key];
            node.left = key;
            node.right = key;
            return key;
        };
        let last = self.nodes[first].left;
        let node = &mut self.nodes[key];
        node.left = last;
        node.right = first;
        self.nodes[last].right = key;
        self.nodes[first].left = key;
        first
    }

    /// Splices `key` out of the list starting at `head`, returning the new head
    fn detach(&mut self, head: NodeKey, key: NodeKey) -> Option<NodeKey> {
        let (left, right) = (self.nodes[key].left, self.nodes[key].right);
        if right == key {
            return None;
        }
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        let node = &mut self.nodes[key];
        node.left = key;
        node.right = key;
        Some(if head == key { right } else { head })
    }
}

impl<T> Index<NodeKey> for Forest<T> {
    type Output = Node<T>;

    #[inline]
    fn index(&self, key: NodeKey) -> &Node<T> {
        &self.nodes[key]
    }
}

impl<T> IndexMut<NodeKey> for Forest<T> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut Node<T> {
        &mut self.nodes[key]
    }
}

/// Walks one sibling list from its first element to its last
pub(crate) struct Siblings<'a, T> {
    forest: &'a Forest<T>,
    head: Option<NodeKey>,
    next: Option<NodeKey>,
}

impl<T> Iterator for Siblings<'_, T> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.next?;
        let right = self.forest.nodes[key].right;
        self.next = (Some(right) != self.head).then_some(right);
        Some(key)
    }
}

//! Diagnostic summary and forest dump
//!
//! Nothing here affects the heap. The dump is deterministic for a given heap
//! state, so tests can compare it against golden strings.

use crate::fibonacci::FibHeap;
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Summary counts describing the shape of a heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStats {
    /// Number of live entries
    pub count: usize,
    /// Number of trees in the root list
    pub roots: usize,
    /// Number of tags in the index
    pub index_len: usize,
    /// Number of marked nodes
    pub marked: usize,
    /// Largest degree of any node
    pub max_degree: usize,
}

impl fmt::Display for HeapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total number: {}, Root size: {}, Index size: {}, Marked: {}, Max degree: {}",
            self.count, self.roots, self.index_len, self.marked, self.max_degree
        )
    }
}

impl<T> FibHeap<T> {
    /// Computes summary counts in one pass over the nodes
    pub fn stats(&self) -> HeapStats {
        let forest = self.forest();
        let (marked, max_degree) = forest
            .nodes()
            .fold((0, 0), |(marked, max_degree), (_, node)| {
                (marked + usize::from(node.marked), max_degree.max(node.degree))
            });
        HeapStats {
            count: forest.len(),
            roots: forest.root_count(),
            index_len: self.len(),
            marked,
            max_degree,
        }
    }
}

impl<T: fmt::Debug> FibHeap<T> {
    /// Renders the summary counts, the minimum and the forest topology
    ///
    /// Trees are printed depth-first. Each sibling list is wrapped in `< ... >`
    /// and each key is printed with six decimals, e.g.
    /// `< 2.000000 < 3.000000 4.000000 < 5.000000 > > > `.
    pub fn dump(&self) -> String {
        let Some((tag, key)) = self.minimum() else {
            return "Heap is empty.\n".to_string();
        };

        let mut out = format!("{},\n", self.stats());
        out.push_str(&format!("Current min: key({key:.6}), tag({tag:?}),\n"));
        out.push_str("Heap detail:\n");
        self.write_forest(&mut out);
        out.push('\n');
        out
    }

    fn write_forest(&self, out: &mut String) {
        let forest = self.forest();
        let mut levels: SmallVec<[_; 8]> = smallvec![forest.roots()];
        out.push_str("< ");
        while let Some(level) = levels.last_mut() {
            match level.next() {
                None => {
                    out.push_str("> ");
                    levels.pop();
                }
                Some(key) => {
                    let node = &forest[key];
                    out.push_str(&format!("{:.6} ", node.key));
                    if node.child.is_some() {
                        out.push_str("< ");
                        levels.push(forest.children(key));
                    }
                }
            }
        }
    }
}

//! Dijkstra's and A* pathfinding on top of [`FibHeap`]
//!
//! The open set is a [`FibHeap`] tagged by the search nodes themselves. When a
//! shorter route to an already-queued node is found, its priority is lowered in
//! place with [`FibHeap::decrease_key`] instead of queueing a duplicate entry.
//!
//! Note: Dijkstra and A* are the same algorithm. A* just adds a heuristic to guide
//! the search; Dijkstra is A* with h(n) = 0.
//!
//! Edge costs must be non-negative. Successors reached through a negative or NaN
//! cost are skipped.
//!
//! # Example
//!
//! ```rust
//! use tagged_fibheap::pathfinding::{dijkstra, SearchNode};
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     fn successors(&self) -> Vec<(Self, f64)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .into_iter()
//!             .map(|(dx, dy)| (GridPos { x: self.x + dx, y: self.y + dy, ..self.clone() }, 1.0))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let result = dijkstra(&start).unwrap();
//! assert_eq!(result.cost, 4.0); // Manhattan distance
//! assert_eq!(result.path.len(), 5);
//! ```

use crate::error::HeapError;
use crate::fibonacci::FibHeap;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use tracing::{debug, warn};

/// Trait for nodes in a search graph.
///
/// The node carries all context needed to generate successors and recognise a
/// goal. It is used directly as the heap tag, so it must be hashable.
pub trait SearchNode: Clone + Eq + Hash {
    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, f64)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can provide a heuristic estimate for A* search.
///
/// The heuristic must be admissible (never overestimate the true cost)
/// for A* to find optimal paths.
pub trait AStarNode: SearchNode {
    /// Returns a heuristic estimate of the cost from this node to any goal.
    fn heuristic(&self) -> f64;
}

/// Result of a successful pathfinding search.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult<N> {
    /// The path from start to goal (inclusive)
    pub path: Vec<N>,
    /// Total cost of the path
    pub cost: f64,
}

/// Bookkeeping for every node the search has reached.
struct Visit<N> {
    g_score: f64,
    came_from: Option<N>,
    closed: bool,
}

/// Runs Dijkstra's algorithm from `start` until `is_goal()` returns true.
///
/// Returns `None` if no goal is reachable.
pub fn dijkstra<N: SearchNode>(start: &N) -> Option<PathResult<N>> {
    search(start, |_| 0.0)
}

/// Runs A* search from `start` until `is_goal()` returns true.
///
/// Uses the node's `heuristic()` method to guide the search.
pub fn astar<N: AStarNode>(start: &N) -> Option<PathResult<N>> {
    search(start, N::heuristic)
}

fn search<N: SearchNode>(start: &N, heuristic: impl Fn(&N) -> f64) -> Option<PathResult<N>> {
    let mut open: FibHeap<N> = FibHeap::new();
    let mut visited: FxHashMap<N, Visit<N>> = FxHashMap::default();

    visited.insert(
        start.clone(),
        Visit {
            g_score: 0.0,
            came_from: None,
            closed: false,
        },
    );
    if let Err(err) = open.insert(start.clone(), heuristic(start)) {
        warn!(%err, "start node has an unusable heuristic");
        return None;
    }

    let mut expanded = 0usize;
    while let Some((current, _)) = open.extract_min() {
        let current_g = {
            let entry = visited.get_mut(&current)?;
            entry.closed = true;
            entry.g_score
        };
        expanded += 1;

        if current.is_goal() {
            debug!(expanded, cost = current_g, "goal reached");
            let path = reconstruct_path(&visited, current);
            return Some(PathResult {
                path,
                cost: current_g,
            });
        }

        for (neighbor, edge_cost) in current.successors() {
            if edge_cost.is_nan() || edge_cost < 0.0 {
                continue;
            }
            let tentative_g = current_g + edge_cost;
            let f_score = tentative_g + heuristic(&neighbor);

            match visited.entry(neighbor) {
                Entry::Occupied(mut occupied) => {
                    let visit = occupied.get();
                    if visit.closed || tentative_g >= visit.g_score {
                        continue;
                    }
                    match open.decrease_key(occupied.key(), f_score) {
                        // Rounding can leave f unchanged even though g improved;
                        // the queued priority is then already correct.
                        Ok(()) | Err(HeapError::KeyNotSmaller) => {}
                        Err(err) => {
                            warn!(%err, "skipping shorter route with unusable priority");
                            continue;
                        }
                    }
                    let visit = occupied.get_mut();
                    visit.g_score = tentative_g;
                    visit.came_from = Some(current.clone());
                }
                Entry::Vacant(vacant) => {
                    if let Err(err) = open.insert(vacant.key().clone(), f_score) {
                        warn!(%err, "skipping successor with unusable priority");
                        continue;
                    }
                    vacant.insert(Visit {
                        g_score: tentative_g,
                        came_from: Some(current.clone()),
                        closed: false,
                    });
                }
            }
        }
    }

    debug!(expanded, "open set exhausted without reaching a goal");
    None
}

/// Walks `came_from` links back from `goal` to the start.
fn reconstruct_path<N: SearchNode>(visited: &FxHashMap<N, Visit<N>>, goal: N) -> Vec<N> {
    let mut path = vec![goal];
    while let Some(prev) = path
        .last()
        .and_then(|node| visited.get(node))
        .and_then(|visit| visit.came_from.clone())
    {
        path.push(prev);
    }
    path.reverse();
    path
}

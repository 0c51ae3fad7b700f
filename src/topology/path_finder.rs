//! The path-finding boundary collaborator (§4.3, §9 open questions).
//!
//! Path discovery within an already-constructed topology graph is not a Non-goal (only
//! constructing the graph itself — Barabási–Albert, layered generators — is out of scope), so
//! this crate ships one concrete, documented implementation behind the same trait boundary a
//! caller would use to substitute a different discipline (e.g. top-K by product of `rho`).

use std::fmt::Debug;

use petgraph::algo::all_simple_paths;
use petgraph::graph::{DiGraph, NodeIndex};

use super::NodeId;

/// Produces the ordered list of candidate sender -> receiver paths from a topology graph.
pub trait PathFinder: Debug {
    /// Returns simple paths (as sequences of node indices, sender and receiver inclusive) from
    /// `sender` to `receiver` in `graph`.
    fn find_paths(
        &self,
        graph: &DiGraph<NodeId, ()>,
        sender: NodeIndex,
        receiver: NodeIndex,
    ) -> Vec<Vec<NodeIndex>>;
}

/// Every simple directed path from sender to receiver, in discovery order, truncated to
/// `max_paths`. This resolves the spec's open question (all-simple-paths vs. top-K) by making
/// the bound an explicit, required constructor argument.
#[derive(Debug, Clone, Copy)]
pub struct AllSimplePaths {
    max_paths: usize,
}

impl AllSimplePaths {
    /// `max_paths` bounds how many simple paths are considered; construction fails loudly
    /// nowhere, but a topology with more paths than this bound silently only sees the first
    /// `max_paths` of them (in petgraph's DFS discovery order).
    pub fn new(max_paths: usize) -> Self {
        AllSimplePaths { max_paths }
    }
}

impl PathFinder for AllSimplePaths {
    fn find_paths(
        &self,
        graph: &DiGraph<NodeId, ()>,
        sender: NodeIndex,
        receiver: NodeIndex,
    ) -> Vec<Vec<NodeIndex>> {
        all_simple_paths::<Vec<_>, _>(graph, sender, receiver, 0, None)
            .take(self.max_paths)
            .collect()
    }
}

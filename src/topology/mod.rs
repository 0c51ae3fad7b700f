//! The network topology: a directed graph with designated sender and receiver, per-node
//! interception/drop parameters, per-edge capacities, and the derived, lazily-cached list of
//! candidate paths with their `(epsilon, rho)` (§3, §4.3).
//!
//! Topologies are value objects: derived fields (paths, their probabilities) are computed once,
//! on first access, and cached for the lifetime of the `Topology`. Independence is assumed
//! across paths even when they share interior nodes — an accepted simplification, not a
//! theorem (§9).

pub mod path_finder;

use std::collections::HashMap;

use once_cell::unsync::OnceCell;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub use path_finder::{AllSimplePaths, PathFinder};

use crate::error::{CoreError, Result};

/// A node identifier. JSON object keys are strings natively, so adjacency, node-parameter, and
/// capacity maps all key on this type directly.
pub type NodeId = String;

/// Per-node adversary/network parameters (§3). Sender and receiver are always trusted: their
/// `p_int` and `delta` are forced to `0.0` regardless of what a topology input supplies.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct NodeParams {
    /// Probability the adversary intercepts a share crossing this node.
    pub p_int: f64,
    /// Probability this node drops a share.
    pub delta: f64,
}

impl Default for NodeParams {
    fn default() -> Self {
        NodeParams { p_int: 0.0, delta: 0.0 }
    }
}

/// An edge capacity record: `(u, v)` carries `capacity` shares per timeslot.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeCapacity {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: u64,
}

/// The wire/file format for a topology (§6 "Topology input").
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopologyInput {
    pub adjacency: HashMap<NodeId, Vec<NodeId>>,
    pub sender: NodeId,
    pub receiver: NodeId,
    #[serde(default)]
    pub node_params: HashMap<NodeId, NodeParams>,
    pub edge_capacities: Vec<EdgeCapacity>,
}

/// A sender -> receiver path together with its derived interception (`epsilon`) and
/// delivery (`rho`) probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub epsilon: f64,
    pub rho: f64,
}

impl Path {
    /// The edges `(u, v)` traversed by this path, in order.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.nodes.windows(2).map(|w| (&w[0], &w[1]))
    }
}

/// The network topology, with lazily-computed and cached paths (§4.3, §9 "Graph as value").
pub struct Topology {
    graph: DiGraph<NodeId, ()>,
    node_index: HashMap<NodeId, NodeIndex>,
    sender: NodeId,
    receiver: NodeId,
    node_params: HashMap<NodeId, NodeParams>,
    capacities: HashMap<(NodeId, NodeId), u64>,
    path_finder: Box<dyn PathFinder>,
    paths: OnceCell<Vec<Path>>,
}

impl Topology {
    /// Builds a topology from a wire-format input and a path-finding collaborator. Path
    /// discovery and probability computation are deferred until [`Topology::paths`] is called.
    #[instrument(skip(input, path_finder), fields(sender = %input.sender, receiver = %input.receiver))]
    pub fn new(input: TopologyInput, path_finder: Box<dyn PathFinder>) -> Result<Self> {
        if !input.adjacency.contains_key(&input.sender) {
            return Err(CoreError::MalformedTopology(format!(
                "sender {} is not a node in the adjacency map",
                input.sender
            )));
        }
        if input.adjacency.values().flatten().all(|n| n != &input.receiver)
            && !input.adjacency.contains_key(&input.receiver)
        {
            return Err(CoreError::MalformedTopology(format!(
                "receiver {} does not appear anywhere in the topology",
                input.receiver
            )));
        }

        let mut node_ids: Vec<&NodeId> = input.adjacency.keys().chain(input.adjacency.values().flatten()).collect();
        node_ids.sort();
        node_ids.dedup();

        let mut graph = DiGraph::<NodeId, ()>::new();
        let mut node_index = HashMap::with_capacity(node_ids.len());
        for node in node_ids {
            node_index.insert(node.clone(), graph.add_node(node.clone()));
        }

        let mut sources: Vec<&NodeId> = input.adjacency.keys().collect();
        sources.sort();
        for u in sources {
            let u_idx = node_index[u];
            for v in &input.adjacency[u] {
                let v_idx = node_index[v];
                graph.add_edge(u_idx, v_idx, ());
            }
        }

        let mut capacities = HashMap::with_capacity(input.edge_capacities.len());
        for ec in &input.edge_capacities {
            if ec.capacity == 0 {
                return Err(CoreError::MalformedTopology(format!(
                    "edge ({}, {}) has non-positive capacity",
                    ec.from, ec.to
                )));
            }
            capacities.insert((ec.from.clone(), ec.to.clone()), ec.capacity);
        }

        for params in input.node_params.values() {
            if !(0.0..=1.0).contains(&params.p_int) || !(0.0..=1.0).contains(&params.delta) {
                return Err(CoreError::MalformedTopology(
                    "node parameters must lie in [0, 1]".into(),
                ));
            }
        }

        Ok(Topology {
            graph,
            node_index,
            sender: input.sender,
            receiver: input.receiver,
            node_params: input.node_params,
            capacities,
            path_finder,
            paths: OnceCell::new(),
        })
    }

    /// The sender node.
    pub fn sender(&self) -> &NodeId {
        &self.sender
    }

    /// The receiver node.
    pub fn receiver(&self) -> &NodeId {
        &self.receiver
    }

    /// Capacity of edge `(u, v)`, or `None` if unspecified.
    pub fn capacity(&self, u: &str, v: &str) -> Option<u64> {
        self.capacities.get(&(u.to_string(), v.to_string())).copied()
    }

    /// Node parameters for `node`; sender and receiver are always trusted (`(0, 0)`) regardless
    /// of what the input supplied; any other missing node defaults to `(0, 0)` per §6.
    pub fn params_of(&self, node: &str) -> NodeParams {
        if node == self.sender || node == self.receiver {
            return NodeParams::default();
        }
        self.node_params.get(node).copied().unwrap_or_default()
    }

    /// The derived, ordered list of candidate paths with their `(epsilon, rho)`, computed and
    /// cached on first access.
    #[instrument(skip(self))]
    pub fn paths(&self) -> Result<&[Path]> {
        self.paths
            .get_or_try_init(|| self.compute_paths())
            .map(Vec::as_slice)
    }

    fn compute_paths(&self) -> Result<Vec<Path>> {
        let sender_idx = self.node_index[&self.sender];
        let receiver_idx = self.node_index[&self.receiver];

        let raw_paths = self.path_finder.find_paths(&self.graph, sender_idx, receiver_idx);
        if raw_paths.is_empty() {
            return Err(CoreError::NoPaths);
        }

        raw_paths
            .into_iter()
            .map(|indices| self.build_path(&indices))
            .collect()
    }

    fn build_path(&self, indices: &[NodeIndex]) -> Result<Path> {
        let nodes: Vec<NodeId> = indices.iter().map(|&i| self.graph[i].clone()).collect();

        let mut seen = std::collections::HashSet::with_capacity(nodes.len());
        for n in &nodes {
            if !seen.insert(n) {
                return Err(CoreError::MalformedPath(format!("node {n} repeats in path")));
            }
        }
        for n in &nodes[1..nodes.len() - 1] {
            if *n == self.sender || *n == self.receiver {
                return Err(CoreError::MalformedPath(format!(
                    "sender/receiver {n} appears in an interior slot"
                )));
            }
        }

        let mut epsilon_complement = 1.0;
        let mut rho = 1.0;
        for n in &nodes[1..nodes.len() - 1] {
            let params = self.params_of(n);
            epsilon_complement *= 1.0 - params.p_int;
            rho *= 1.0 - params.delta;
        }
        let epsilon = 1.0 - epsilon_complement;

        Ok(Path { nodes, epsilon, rho })
    }
}

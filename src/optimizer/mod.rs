//! Throughput optimizer: choose how many parallel instances of each SAV tuple to run per
//! timeslot so as to maximise total instances subject to per-edge capacity (§4.5).
//!
//! `load(e, n) = sum` over paths `P_j` crossing edge `e` of `n_j`. For `x_i` instances of tuple
//! `i`, the capacity constraint on edge `e` is `sum_i x_i * load(e, n^(i)) <= capacity(e)`, and
//! the objective is `maximise sum_i x_i`.

mod cbc;
mod gurobi;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use cbc::CbcBackend;
pub use gurobi::GurobiBackend;

use crate::error::Result;
use crate::strategy::SavTuple;
use crate::topology::{NodeId, Topology};

/// Outcome of an ILP solve. `Infeasible` is a reported status, not an error: the zero
/// allocation is always feasible (it violates no capacity), so infeasibility here only ever
/// means the backend itself rejected the (degenerate) problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStatus {
    /// A solution was found and is reported in `objective`/`allocation`.
    Optimal,
    /// The backend rejected the problem outright.
    Infeasible,
}

/// Load placed on one edge by a chosen allocation. A plain record rather than a
/// tuple-keyed map, since JSON object keys must be strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLoad {
    pub from: NodeId,
    pub to: NodeId,
    pub load: u64,
}

/// The result of optimizing throughput over a fixed set of candidate SAV tuples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerOutput {
    pub status: SolverStatus,
    /// `sum_i x_i`, the total number of tuple instances scheduled per timeslot.
    pub objective: f64,
    /// Number of instances of each input tuple, indexed by its position in the input slice.
    pub allocation: HashMap<usize, u64>,
    /// Load placed on each edge touched by the chosen allocation.
    pub per_edge_load: Vec<EdgeLoad>,
}

/// A pluggable ILP solver backend (§9 capability boundary, mirrors [`crate::topology::PathFinder`]).
pub trait IlpBackend {
    /// Solves the throughput ILP for `tuples` over `topology`'s edge capacities.
    fn solve(&self, tuples: &[SavTuple], topology: &Topology) -> Result<OptimizerOutput>;
}

/// The solver backends recognised by configuration / the CLI `--solver` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum BackendKind {
    /// `good_lp` + CBC (the default, always available).
    Cbc,
    /// Stub; see [`GurobiBackend`].
    Gurobi,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Cbc => write!(f, "cbc"),
            BackendKind::Gurobi => write!(f, "gurobi"),
        }
    }
}

impl BackendKind {
    /// Returns the boxed backend implementation for this variant.
    pub fn backend(self) -> Box<dyn IlpBackend> {
        match self {
            BackendKind::Cbc => Box::new(CbcBackend),
            BackendKind::Gurobi => Box::new(GurobiBackend),
        }
    }
}

/// The edges each tuple touches, and how much load it places per instance.
pub(crate) fn per_tuple_edge_loads(
    tuples: &[SavTuple],
    topology: &Topology,
) -> Result<Vec<HashMap<(NodeId, NodeId), u64>>> {
    let paths = topology.paths()?;
    let mut out = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        let mut loads: HashMap<(NodeId, NodeId), u64> = HashMap::new();
        for (j, path) in paths.iter().enumerate() {
            let n_j = tuple.sav.n.get(j).copied().unwrap_or(0);
            if n_j == 0 {
                continue;
            }
            for (u, v) in path.edges() {
                *loads.entry((u.clone(), v.clone())).or_insert(0) += n_j;
            }
        }
        out.push(loads);
    }
    Ok(out)
}

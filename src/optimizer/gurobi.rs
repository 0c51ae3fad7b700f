//! `gurobi` backend stub (§4.5). No Gurobi crate or license is available in this workspace;
//! the backend is kept as a named, selectable variant so configuration and the CLI can
//! reference it, but every call fails with [`SolverError::BackendFailure`].

use super::{IlpBackend, OptimizerOutput};
use crate::error::{CoreError, Result, SolverError};
use crate::strategy::SavTuple;
use crate::topology::Topology;

/// Always-`BackendFailure` stub; see the module doc.
#[derive(Debug, Default)]
pub struct GurobiBackend;

impl IlpBackend for GurobiBackend {
    fn solve(&self, _tuples: &[SavTuple], _topology: &Topology) -> Result<OptimizerOutput> {
        Err(CoreError::Solver(SolverError::BackendFailure(
            "gurobi backend is not available in this build".into(),
        )))
    }
}

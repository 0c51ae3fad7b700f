//! Phase III: reserved interface slot (§4.4.3). No algorithm is specified for an active,
//! Byzantine adversary — this variant exists only so strategy selectors (CLI, optimizer input)
//! are forward-compatible with one being added later.

use super::sav::{PhaseStrategy, StrategyOutput};
use crate::abort::AbortToken;
use crate::error::{CoreError, Result};
use crate::topology::Topology;

/// Reserved interface slot; always fails with [`CoreError::NotImplemented`].
#[derive(Debug, Default)]
pub struct PhaseThree;

impl PhaseStrategy for PhaseThree {
    fn generate_minimal_tuples(
        &self,
        _topology: &Topology,
        _n_max: u64,
        _sigma: f64,
        _tau: f64,
        _renorm_epsilon: f64,
        _abort: Option<&AbortToken>,
    ) -> Result<StrategyOutput> {
        Err(CoreError::NotImplemented)
    }
}

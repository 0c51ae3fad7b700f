//! Share allocation vectors and the shared strategy contract (§3, §4.4, §9).

use serde::{Deserialize, Serialize};

use crate::abort::AbortToken;
use crate::error::Result;
use crate::topology::Topology;

/// A non-negative integer vector assigning a number of shares to each candidate path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sav {
    pub n: Vec<u64>,
}

impl Sav {
    /// `N = sum(n_j)`, the total number of shares this SAV allocates.
    pub fn total(&self) -> u64 {
        self.n.iter().sum()
    }
}

/// A `(n, t)` pair with its exactly-computed achieved guarantees (§6 "Strategy output").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavTuple {
    pub sav: Sav,
    pub t: u64,
    /// `Pr[X_B >= t]`, exact, from the probability engine.
    pub sigma_achieved: f64,
    /// `Pr[X_E >= t]`, exact, from the probability engine.
    pub tau_achieved: f64,
}

impl SavTuple {
    pub fn total(&self) -> u64 {
        self.sav.total()
    }
}

/// The result of a strategy run: the ordered minimal tuples, and whether enumeration hit
/// `n_max` while tuples were still being discovered (§4.4.4 `BudgetExhausted`, informational).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutput {
    pub tuples: Vec<SavTuple>,
    pub budget_exhausted: bool,
}

/// The shared shape of a phase strategy (§9): given a topology and declared `(sigma, tau)`,
/// enumerate every minimal SAV tuple with total shares `<= n_max`, deterministically and in a
/// fixed emission order.
///
/// `abort`, if supplied, is consulted at enumeration level boundaries (§5); a set token fails
/// the call with `CoreError::Aborted` rather than returning a partial result.
pub trait PhaseStrategy {
    fn generate_minimal_tuples(
        &self,
        topology: &Topology,
        n_max: u64,
        sigma: f64,
        tau: f64,
        renorm_epsilon: f64,
        abort: Option<&AbortToken>,
    ) -> Result<StrategyOutput>;
}

//! Error kinds surfaced by the core (see the error handling design section of the spec).
//!
//! Reconstruction and field errors are recoverable by the caller. Topology and parameter
//! errors are surfaced immediately; the core never attempts repair, and there is no retry
//! loop anywhere in this crate.

use thiserror::Error;

/// The single error type returned by every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing sender/receiver, non-numeric capacity, or a negative probability in a topology.
    #[error("malformed topology: {0}")]
    MalformedTopology(String),

    /// A discovered path repeats a node, or places sender/receiver in an interior slot.
    #[error("malformed path: {0}")]
    MalformedPath(String),

    /// No sender -> receiver path exists in the topology.
    #[error("no path from sender to receiver")]
    NoPaths,

    /// The configured modulus is not prime, or is less than 2.
    #[error("configured prime {0} is not a valid prime")]
    InvalidPrime(String),

    /// No SAV tuple of total <= n_max meets the declared (sigma, tau).
    #[error("no feasible SAV tuple of total <= {n_max} satisfies sigma={sigma}, tau={tau}")]
    InfeasibleParameters { n_max: u64, sigma: f64, tau: f64 },

    /// Fewer than `t` shares were supplied to `reconstruct`.
    #[error("insufficient shares: need {needed}, got {got}")]
    InsufficientShares { needed: u64, got: u64 },

    /// Two supplied shares carry the same index.
    #[error("duplicate share index {0}")]
    DuplicateIndex(u64),

    /// A message chunk did not fit under the field modulus.
    #[error("field overflow: chunk value is >= the field modulus")]
    FieldOverflow,

    /// Propagated from the throughput optimizer's ILP backend.
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),

    /// An unpublished interface slot (Phase III) was invoked.
    #[error("strategy not implemented")]
    NotImplemented,

    /// A caller-supplied [`crate::abort::AbortToken`] was set before the operation completed.
    #[error("operation aborted")]
    Aborted,
}

/// Failure modes of a pluggable [`crate::optimizer::IlpBackend`].
#[derive(Debug, Error)]
pub enum SolverError {
    /// The ILP has no feasible solution (reported, not treated as an error by the optimizer).
    #[error("ILP is infeasible")]
    Infeasible,

    /// The ILP is unbounded, which indicates a bug in capacity modelling.
    #[error("ILP is unbounded")]
    Unbounded,

    /// The backend did not return within its allotted time.
    #[error("solver timed out")]
    Timeout,

    /// The backend failed for a reason opaque to this crate (includes the `gurobi` stub).
    #[error("backend failure: {0}")]
    BackendFailure(String),
}

/// A non-fatal warning collected (not returned as an `Err`) by the probability engine when
/// convolution drift exceeds `renorm_epsilon`. The engine renormalises and keeps going.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericalWarning {
    /// How far `sum(P)` had drifted from 1.0 before renormalisation.
    pub drift: f64,
}

pub type Result<T> = std::result::Result<T, CoreError>;

//! Phase strategies: enumeration of minimal share-allocation-vector tuples (§4.4).
//!
//! Phase I and Phase II share an input/output shape (topology, declared `(sigma, tau)`, ordered
//! minimal tuples) but differ in feasibility predicate and enumeration discipline, so they are
//! modelled as tagged variants of one [`PhaseStrategy`] trait rather than a class hierarchy.

mod phase1;
mod phase2;
mod phase3;
mod sav;

pub use phase1::PhaseOne;
pub use phase2::PhaseTwo;
pub use phase3::PhaseThree;
pub use sav::{PhaseStrategy, Sav, SavTuple, StrategyOutput};

/// The phase strategies recognised by configuration / the CLI `--phase` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum PhaseKind {
    /// Passive adversary, `(k, k)` scheme.
    One,
    /// Dropping adversary, `(N, t)` scheme.
    Two,
    /// Reserved interface slot; always fails with `CoreError::NotImplemented`.
    Three,
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseKind::One => write!(f, "1"),
            PhaseKind::Two => write!(f, "2"),
            PhaseKind::Three => write!(f, "3"),
        }
    }
}

impl PhaseKind {
    /// Returns the boxed strategy implementation for this variant.
    pub fn strategy(self) -> Box<dyn PhaseStrategy> {
        match self {
            PhaseKind::One => Box::new(PhaseOne),
            PhaseKind::Two => Box::new(PhaseTwo),
            PhaseKind::Three => Box::new(PhaseThree),
        }
    }
}

//! Run configuration (§6 "Configuration"): deserialized from a JSON file via `serde`, with a
//! `Default` supplying every documented value, validated (range, primality) at load time.

use std::fs;
use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::field::PrimeField;
use crate::optimizer::BackendKind;

fn default_prime() -> String {
    (PrimeField::default_mersenne().modulus()).to_string()
}

fn default_n_max() -> u64 {
    10
}

fn default_sigma() -> f64 {
    0.95
}

fn default_tau() -> f64 {
    0.01
}

fn default_solver() -> BackendKind {
    BackendKind::Cbc
}

fn default_seed() -> u64 {
    0
}

fn default_renorm_epsilon() -> f64 {
    crate::probability::DEFAULT_RENORM_EPSILON
}

/// Run configuration recognised by the CLI and library callers alike.
///
/// The prime is carried as a decimal string on the wire (JSON numbers cannot losslessly hold
/// a 127-bit integer) and parsed at [`Config::load`]/[`Config::validate`] time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Field modulus, as a decimal string; must be prime and `>= 2`.
    #[serde(default = "default_prime")]
    pub prime: String,
    /// Positive bound on `sum(n_j)` during enumeration.
    #[serde(default = "default_n_max")]
    pub n_max: u64,
    /// Declared reliability target, in `[0, 1]`.
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// Declared confidentiality-leakage bound, in `[0, 1]`.
    #[serde(default = "default_tau")]
    pub tau: f64,
    /// ILP backend used by the throughput optimizer.
    #[serde(default = "default_solver")]
    pub solver: BackendKind,
    /// Master seed for the Monte-Carlo simulator.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Drift tolerance before the probability engine renormalises (§4.2).
    #[serde(default = "default_renorm_epsilon")]
    pub renorm_epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prime: default_prime(),
            n_max: default_n_max(),
            sigma: default_sigma(),
            tau: default_tau(),
            solver: default_solver(),
            seed: default_seed(),
            renorm_epsilon: default_renorm_epsilon(),
        }
    }
}

impl Config {
    /// Loads and validates a configuration from a JSON file, failing fast on a malformed or
    /// out-of-range value rather than deferring the check to first use.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            CoreError::MalformedTopology(format!("cannot read config {}: {e}", path.as_ref().display()))
        })?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| CoreError::MalformedTopology(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates range constraints and primality, returning the parsed field on success.
    pub fn validate(&self) -> Result<PrimeField> {
        if !(0.0..=1.0).contains(&self.sigma) || !(0.0..=1.0).contains(&self.tau) {
            return Err(CoreError::MalformedTopology("sigma and tau must lie in [0, 1]".into()));
        }
        if self.n_max == 0 {
            return Err(CoreError::MalformedTopology("n_max must be positive".into()));
        }
        let p: BigUint = self
            .prime
            .parse()
            .map_err(|_| CoreError::InvalidPrime(self.prime.clone()))?;
        PrimeField::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_with_missing_optional_fields_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn rejects_out_of_range_sigma() {
        let mut config = Config::default();
        config.sigma = 1.5;
        assert!(matches!(config.validate(), Err(CoreError::MalformedTopology(_))));
    }

    #[test]
    fn rejects_composite_prime() {
        let mut config = Config::default();
        config.prime = "256".to_string();
        assert!(matches!(config.validate(), Err(CoreError::InvalidPrime(_))));
    }
}

//! Phase I: passive adversary, `(k, k)` scheme (§4.4.1).
//!
//! Only `t = N` is considered. The leakage constraint `prod(eps_j^n_j) <= tau` is linearised as
//! `sum(n_j * log(eps_j)) <= log(tau)`; reliability is computed and reported but never gates
//! feasibility here (the `(k,k)` scheme is already maximally fragile to drops).

use std::collections::HashSet;

use tracing::{info, instrument};

use super::sav::{PhaseStrategy, Sav, SavTuple, StrategyOutput};
use crate::abort::AbortToken;
use crate::error::{CoreError, Result};
use crate::topology::Topology;

/// Passive adversary, `(k, k)` scheme (§4.4.1).
#[derive(Debug, Default)]
pub struct PhaseOne;

impl PhaseStrategy for PhaseOne {
    #[instrument(skip(self, topology))]
    fn generate_minimal_tuples(
        &self,
        topology: &Topology,
        n_max: u64,
        _sigma: f64,
        tau: f64,
        _renorm_epsilon: f64,
        abort: Option<&AbortToken>,
    ) -> Result<StrategyOutput> {
        let paths = topology.paths()?;
        let m = paths.len();
        let log_tau = tau.ln();

        // Cheapest leakage reducer first: descending |log(eps_j)|, i.e. ascending eps_j.
        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by(|&a, &b| paths[a].epsilon.partial_cmp(&paths[b].epsilon).unwrap());

        let log_eps: Vec<f64> = paths.iter().map(|p| p.epsilon.ln()).collect();

        let mut raw_candidates: HashSet<Vec<u64>> = HashSet::new();
        let mut partial = vec![0u64; m];
        search(&order, 0, n_max, 0.0, log_tau, &log_eps, &mut partial, &mut raw_candidates, abort);
        if abort.is_some_and(AbortToken::is_aborted) {
            return Err(CoreError::Aborted);
        }

        let feasible = |n: &[u64]| -> bool {
            let leakage: f64 = n.iter().zip(log_eps.iter()).map(|(&nj, &lj)| nj as f64 * lj).sum();
            leakage <= log_tau
        };

        let mut tuples: Vec<SavTuple> = raw_candidates
            .into_iter()
            .filter(|n| {
                feasible(n)
                    && (0..m).filter(|&j| n[j] > 0).all(|j| {
                        let mut dec = n.clone();
                        dec[j] -= 1;
                        !feasible(&dec)
                    })
            })
            .map(|n| {
                let total: u64 = n.iter().sum();
                let tau_achieved: f64 = n
                    .iter()
                    .zip(paths.iter())
                    .map(|(&nj, p)| p.epsilon.powi(nj as i32))
                    .product();
                let sigma_achieved: f64 = n
                    .iter()
                    .zip(paths.iter())
                    .map(|(&nj, p)| p.rho.powi(nj as i32))
                    .product();
                SavTuple {
                    sav: Sav { n },
                    t: total,
                    sigma_achieved,
                    tau_achieved,
                }
            })
            .collect();

        tuples.sort_by(|a, b| a.sav.n.cmp(&b.sav.n));

        if tuples.is_empty() {
            return Err(CoreError::InfeasibleParameters {
                n_max,
                sigma: _sigma,
                tau,
            });
        }

        info!(count = tuples.len(), "Phase I enumeration complete");
        Ok(StrategyOutput {
            tuples,
            budget_exhausted: false,
        })
    }
}

/// Recursive search over paths in `order`, emitting (into `out`) the first feasible assignment
/// reached along each branch and pruning further growth past it (a feasible prefix with the
/// remaining coordinates at zero dominates any larger vector built on top of it).
#[allow(clippy::too_many_arguments)]
fn search(
    order: &[usize],
    depth: usize,
    remaining_budget: u64,
    accumulated_log_leakage: f64,
    log_tau: f64,
    log_eps: &[f64],
    partial: &mut Vec<u64>,
    out: &mut HashSet<Vec<u64>>,
    abort: Option<&AbortToken>,
) {
    if abort.is_some_and(AbortToken::is_aborted) {
        return;
    }
    if depth == order.len() {
        if accumulated_log_leakage <= log_tau {
            out.insert(partial.clone());
        }
        return;
    }

    let path_idx = order[depth];
    for n_j in 0..=remaining_budget {
        partial[path_idx] = n_j;
        let new_leakage = accumulated_log_leakage + n_j as f64 * log_eps[path_idx];

        if new_leakage <= log_tau {
            // Feasible with every later coordinate at zero: emit and stop growing this branch.
            out.insert(partial.clone());
            partial[path_idx] = 0;
            return;
        }

        search(
            order,
            depth + 1,
            remaining_budget - n_j,
            new_leakage,
            log_tau,
            log_eps,
            partial,
            out,
            abort,
        );
    }
    partial[path_idx] = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{AllSimplePaths, EdgeCapacity, NodeParams, TopologyInput};
    use std::collections::HashMap;

    fn two_path_topology(eps1: f64, eps2: f64) -> Topology {
        // sender -a-> mid1 -> receiver, sender -b-> mid2 -> receiver, tuned so that each
        // path's epsilon equals the requested value via a single interior node.
        let adjacency: HashMap<String, Vec<String>> = [
            ("s".to_string(), vec!["a".into(), "b".into()]),
            ("a".to_string(), vec!["r".into()]),
            ("b".to_string(), vec!["r".into()]),
            ("r".to_string(), vec![]),
        ]
        .into_iter()
        .collect();
        let node_params: HashMap<String, NodeParams> = [
            ("a".to_string(), NodeParams { p_int: eps1, delta: 0.0 }),
            ("b".to_string(), NodeParams { p_int: eps2, delta: 0.0 }),
        ]
        .into_iter()
        .collect();
        let edge_capacities = vec![
            EdgeCapacity { from: "s".into(), to: "a".into(), capacity: 100 },
            EdgeCapacity { from: "s".into(), to: "b".into(), capacity: 100 },
            EdgeCapacity { from: "a".into(), to: "r".into(), capacity: 100 },
            EdgeCapacity { from: "b".into(), to: "r".into(), capacity: 100 },
        ];
        let input = TopologyInput {
            adjacency,
            sender: "s".into(),
            receiver: "r".into(),
            node_params,
            edge_capacities,
        };
        Topology::new(input, Box::new(AllSimplePaths::new(10))).unwrap()
    }

    #[test]
    fn scenario_s6_two_paths() {
        let topology = two_path_topology(0.5, 0.1);
        let output = PhaseOne.generate_minimal_tuples(&topology, 10, 0.0, 0.01, 1e-12, None).unwrap();

        let log_tau = 0.01_f64.ln();
        let log_eps = [0.5_f64.ln(), 0.1_f64.ln()];

        for tuple in &output.tuples {
            let leakage: f64 = tuple
                .sav
                .n
                .iter()
                .zip(log_eps.iter())
                .map(|(&n, &l)| n as f64 * l)
                .sum();
            assert!(leakage <= log_tau, "tuple {:?} violates leakage bound", tuple.sav.n);

            for j in 0..2 {
                if tuple.sav.n[j] > 0 {
                    let mut dec = tuple.sav.n.clone();
                    dec[j] -= 1;
                    let dec_leakage: f64 = dec.iter().zip(log_eps.iter()).map(|(&n, &l)| n as f64 * l).sum();
                    assert!(dec_leakage > log_tau, "tuple {:?} is not minimal", tuple.sav.n);
                }
            }
        }

        // (0, 2) must be present: 0.1^2 = 0.01 <= tau.
        assert!(output.tuples.iter().any(|t| t.sav.n == vec![0, 2]));
    }

    #[test]
    fn no_path_is_emitted_twice() {
        let topology = two_path_topology(0.3, 0.6);
        let output = PhaseOne.generate_minimal_tuples(&topology, 8, 0.0, 0.05, 1e-12, None).unwrap();
        let mut seen = HashSet::new();
        for tuple in &output.tuples {
            assert!(seen.insert(tuple.sav.n.clone()));
        }
    }

    #[test]
    fn an_already_aborted_token_yields_no_tuples() {
        let topology = two_path_topology(0.5, 0.1);
        let token = crate::abort::AbortToken::new();
        token.abort();
        assert!(matches!(
            PhaseOne.generate_minimal_tuples(&topology, 10, 0.0, 0.01, 1e-12, Some(&token)),
            Err(CoreError::Aborted)
        ));
    }
}

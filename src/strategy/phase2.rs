//! Phase II: dropping adversary, `(N, t)` scheme (§4.4.2).
//!
//! Breadth-first over SAV vectors by total `N`, with dominance pruning (a feasible vector is
//! never expanded into a superset) and an exact minimality re-check at emission.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use super::sav::{PhaseStrategy, Sav, SavTuple, StrategyOutput};
use crate::abort::AbortToken;
use crate::error::{CoreError, Result};
use crate::probability::{sum_pmf, tail_ge, threshold_interval};
use crate::topology::Topology;

/// Dropping adversary, `(N, t)` scheme (§4.4.2).
#[derive(Debug, Default)]
pub struct PhaseTwo;

impl PhaseStrategy for PhaseTwo {
    #[instrument(skip(self, topology))]
    fn generate_minimal_tuples(
        &self,
        topology: &Topology,
        n_max: u64,
        sigma: f64,
        tau: f64,
        renorm_epsilon: f64,
        abort: Option<&AbortToken>,
    ) -> Result<StrategyOutput> {
        let paths = topology.paths()?;
        let m = paths.len();
        let rhos: Vec<f64> = paths.iter().map(|p| p.rho).collect();
        let epsilons: Vec<f64> = paths.iter().map(|p| p.epsilon).collect();

        let canonical_threshold = |n: &[u64]| -> Option<u64> {
            let ns: Vec<u64> = n.to_vec();
            let (pmf_b, _) = sum_pmf(&ns, &rhos, renorm_epsilon);
            let (pmf_e, _) = sum_pmf(&ns, &epsilons, renorm_epsilon);
            threshold_interval(&pmf_b, &pmf_e, sigma, tau).map(|(lo, _)| lo)
        };

        let zero = vec![0u64; m];
        let mut active: HashSet<Vec<u64>> = HashSet::from([zero.clone()]);
        let mut seen_all: HashSet<Vec<u64>> = HashSet::from([zero]);
        let mut feasible_candidates: Vec<Vec<u64>> = Vec::new();
        let mut budget_exhausted = false;

        for level in 1..=n_max {
            if abort.is_some_and(AbortToken::is_aborted) {
                return Err(CoreError::Aborted);
            }
            let mut next_active: HashSet<Vec<u64>> = HashSet::new();
            for v in &active {
                for j in 0..m {
                    let mut w = v.clone();
                    w[j] += 1;
                    if !seen_all.insert(w.clone()) {
                        continue;
                    }
                    if canonical_threshold(&w).is_some() {
                        feasible_candidates.push(w);
                    } else {
                        next_active.insert(w);
                    }
                }
            }
            debug!(level, frontier = next_active.len(), "Phase II BFS level complete");
            active = next_active;
            if level == n_max && !active.is_empty() {
                budget_exhausted = true;
            }
            if active.is_empty() {
                break;
            }
        }

        let mut tuples: Vec<SavTuple> = Vec::new();
        for n in feasible_candidates {
            let Some(t_star) = canonical_threshold(&n) else {
                continue;
            };
            let minimal = (0..m).filter(|&j| n[j] > 0).all(|j| {
                let mut dec = n.clone();
                dec[j] -= 1;
                canonical_threshold(&dec).is_none()
            });
            if !minimal {
                continue;
            }
            let (pmf_b, _) = sum_pmf(&n, &rhos, renorm_epsilon);
            let (pmf_e, _) = sum_pmf(&n, &epsilons, renorm_epsilon);
            tuples.push(SavTuple {
                sigma_achieved: tail_ge(&pmf_b, t_star),
                tau_achieved: tail_ge(&pmf_e, t_star),
                t: t_star,
                sav: Sav { n },
            });
        }

        tuples.sort_by(|a, b| a.total().cmp(&b.total()).then_with(|| a.sav.n.cmp(&b.sav.n)));

        if tuples.is_empty() {
            return Err(CoreError::InfeasibleParameters { n_max, sigma, tau });
        }

        info!(count = tuples.len(), budget_exhausted, "Phase II enumeration complete");
        Ok(StrategyOutput { tuples, budget_exhausted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{AllSimplePaths, EdgeCapacity, NodeParams, TopologyInput};
    use std::collections::HashMap;

    fn scenario_s1_topology() -> Topology {
        let adjacency: HashMap<String, Vec<String>> = [
            ("1".to_string(), vec!["2".into(), "4".into(), "6".into()]),
            ("2".to_string(), vec!["5".into()]),
            ("3".to_string(), vec![]),
            ("4".to_string(), vec!["5".into()]),
            ("5".to_string(), vec!["3".into()]),
            ("6".to_string(), vec!["3".into()]),
        ]
        .into_iter()
        .collect();
        let node_params: HashMap<String, NodeParams> = [
            ("2".to_string(), NodeParams { p_int: 0.10, delta: 0.30 }),
            ("4".to_string(), NodeParams { p_int: 0.15, delta: 0.20 }),
            ("5".to_string(), NodeParams { p_int: 0.05, delta: 0.50 }),
            ("6".to_string(), NodeParams { p_int: 0.20, delta: 0.10 }),
        ]
        .into_iter()
        .collect();
        let edge_capacities = [("1", "2", 5), ("1", "4", 5), ("1", "6", 5), ("2", "5", 5), ("4", "5", 5), ("5", "3", 10), ("6", "3", 5)]
            .into_iter()
            .map(|(from, to, capacity)| EdgeCapacity { from: from.into(), to: to.into(), capacity })
            .collect();
        let input = TopologyInput {
            adjacency,
            sender: "1".into(),
            receiver: "3".into(),
            node_params,
            edge_capacities,
        };
        Topology::new(input, Box::new(AllSimplePaths::new(100))).unwrap()
    }

    #[test]
    fn scenario_s1_enumerates_21_minimal_tuples() {
        let topology = scenario_s1_topology();
        let output = PhaseTwo.generate_minimal_tuples(&topology, 10, 0.95, 0.01, 1e-12, None).unwrap();
        assert_eq!(output.tuples.len(), 21);
    }

    #[test]
    fn every_emitted_tuple_satisfies_its_declared_guarantees() {
        let topology = scenario_s1_topology();
        let output = PhaseTwo.generate_minimal_tuples(&topology, 10, 0.95, 0.01, 1e-12, None).unwrap();
        for tuple in &output.tuples {
            assert!(tuple.sigma_achieved >= 0.95 - 1e-9, "{:?}", tuple);
            assert!(tuple.tau_achieved <= 0.01 + 1e-9, "{:?}", tuple);
        }
    }

    #[test]
    fn no_emitted_tuple_is_a_strict_superset_of_another() {
        let topology = scenario_s1_topology();
        let output = PhaseTwo.generate_minimal_tuples(&topology, 10, 0.95, 0.01, 1e-12, None).unwrap();
        for a in &output.tuples {
            for b in &output.tuples {
                if a.sav.n == b.sav.n {
                    continue;
                }
                let a_dominates_b = a.sav.n.iter().zip(b.sav.n.iter()).all(|(x, y)| x >= y);
                assert!(!a_dominates_b, "{:?} dominates {:?}", a.sav.n, b.sav.n);
            }
        }
    }

    #[test]
    fn scenario_s3_minimum_total_is_at_least_four() {
        // Two parallel paths both with epsilon = rho = 0.5, modelled via two interior nodes
        // each used by exactly one path.
        let node_params: HashMap<String, NodeParams> = [
            ("a".to_string(), NodeParams { p_int: 0.5, delta: 0.5 }),
            ("b".to_string(), NodeParams { p_int: 0.5, delta: 0.5 }),
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
            adjacency: [
                ("s".to_string(), vec!["a".into(), "b".into()]),
                ("a".to_string(), vec!["r".into()]),
                ("b".to_string(), vec!["r".into()]),
                ("r".to_string(), vec![]),
            ]
            .into_iter()
            .collect(),
            sender: "s".into(),
            receiver: "r".into(),
            node_params,
            edge_capacities,
        };
        let topology = Topology::new(input, Box::new(AllSimplePaths::new(10))).unwrap();

        let output = PhaseTwo.generate_minimal_tuples(&topology, 10, 0.6, 0.3, 1e-12, None).unwrap();
        assert!(output.tuples.iter().all(|t| t.total() >= 4));
        assert!(!output.tuples.iter().any(|t| t.sav.n == vec![1, 1]));
    }

    #[test]
    fn an_already_aborted_token_fails_the_call() {
        let topology = scenario_s1_topology();
        let token = crate::abort::AbortToken::new();
        token.abort();
        assert!(matches!(
            PhaseTwo.generate_minimal_tuples(&topology, 10, 0.95, 0.01, 1e-12, Some(&token)),
            Err(CoreError::Aborted)
        ));
    }
}

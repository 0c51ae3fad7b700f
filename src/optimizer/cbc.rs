//! `good_lp` + CBC backend (§4.5, the `cbc` solver kind).

use std::collections::HashMap;

use good_lp::{constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel};
use tracing::{instrument, warn};

use super::{per_tuple_edge_loads, EdgeLoad, IlpBackend, OptimizerOutput, SolverStatus};
use crate::error::{CoreError, Result, SolverError};
use crate::strategy::SavTuple;
use crate::topology::Topology;

/// The default, always-available ILP backend.
#[derive(Debug, Default)]
pub struct CbcBackend;

impl IlpBackend for CbcBackend {
    #[instrument(skip(self, tuples, topology))]
    fn solve(&self, tuples: &[SavTuple], topology: &Topology) -> Result<OptimizerOutput> {
        if tuples.is_empty() {
            return Ok(OptimizerOutput {
                status: SolverStatus::Optimal,
                objective: 0.0,
                allocation: HashMap::new(),
                per_edge_load: Vec::new(),
            });
        }

        let edge_loads = per_tuple_edge_loads(tuples, topology)?;
        let mut edges: Vec<(String, String)> = Vec::new();
        for loads in &edge_loads {
            for edge in loads.keys() {
                if !edges.contains(edge) {
                    edges.push(edge.clone());
                }
            }
        }

        let mut vars = variables!();
        let xs: Vec<_> = (0..tuples.len())
            .map(|_| vars.add(variable().integer().min(0)))
            .collect();

        let objective: Expression = xs.iter().fold(Expression::from(0.0), |acc, x| acc + *x);
        let mut model = vars.maximise(objective).using(good_lp::default_solver);

        for (u, v) in &edges {
            let cap = topology.capacity(u, v).unwrap_or(0) as f64;
            let mut load_expr = Expression::from(0.0);
            for (i, x) in xs.iter().enumerate() {
                let load = edge_loads[i].get(&(u.clone(), v.clone())).copied().unwrap_or(0);
                if load > 0 {
                    load_expr = load_expr + (load as f64) * (*x);
                }
            }
            model = model.with(constraint!(load_expr <= cap));
        }

        match model.solve() {
            Ok(solution) => {
                let mut allocation = HashMap::new();
                let mut objective = 0.0;
                for (i, x) in xs.iter().enumerate() {
                    let value = solution.value(*x).round().max(0.0);
                    objective += value;
                    if value > 0.0 {
                        allocation.insert(i, value as u64);
                    }
                }

                let mut per_edge_load = Vec::new();
                for (u, v) in &edges {
                    let mut total = 0u64;
                    for (i, &count) in &allocation {
                        total += edge_loads[*i].get(&(u.clone(), v.clone())).copied().unwrap_or(0) * count;
                    }
                    if total > 0 {
                        per_edge_load.push(EdgeLoad { from: u.clone(), to: v.clone(), load: total });
                    }
                }

                Ok(OptimizerOutput { status: SolverStatus::Optimal, objective, allocation, per_edge_load })
            }
            Err(ResolutionError::Infeasible) => Ok(OptimizerOutput {
                status: SolverStatus::Infeasible,
                objective: 0.0,
                allocation: HashMap::new(),
                per_edge_load: Vec::new(),
            }),
            Err(ResolutionError::Unbounded) => Err(CoreError::Solver(SolverError::Unbounded)),
            Err(other) => {
                warn!(error = %other, "CBC backend failure");
                Err(CoreError::Solver(SolverError::BackendFailure(other.to_string())))
            }
        }
    }
}

//! Depth-first branch and bound over perfect matchings

use tracing::debug;

use super::{check_solvable, Assignment, MatchingSolver};
use crate::cost::CostMatrix;
use crate::error::{PairingError, PairingResult, SolverFailure};

/// Default cap on explored search nodes
pub const DEFAULT_NODE_LIMIT: u64 = 5_000_000;

/// Exact search that always expands the lowest unmatched index.
///
/// Partners are tried cheapest first, so the first complete matching is the
/// greedy one. A branch is cut once its cost plus half the sum of each
/// unmatched competitor's cheapest remaining edge cannot beat the incumbent.
#[derive(Debug, Clone, Copy)]
pub struct BranchAndBoundSolver {
    pub node_limit: u64,
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_LIMIT)
    }
}

impl BranchAndBoundSolver {
    pub fn new(node_limit: u64) -> Self {
        Self { node_limit }
    }
}

impl MatchingSolver for BranchAndBoundSolver {
    fn name(&self) -> &str {
        "branch_and_bound"
    }

    fn solve(&self, costs: &CostMatrix) -> PairingResult<Assignment> {
        check_solvable(costs)?;

        let mut search = Search {
            costs,
            matched: vec![false; costs.size()],
            current: Vec::with_capacity(costs.size() / 2),
            best: None,
            nodes: 0,
            node_limit: self.node_limit,
        };
        search.expand(0.0)?;

        let nodes = search.nodes;
        let (cost, pairs) = search
            .best
            .ok_or(PairingError::Solver(SolverFailure::Infeasible))?;
        debug!(nodes, cost, "branch and bound finished");

        let assignment = Assignment::from_pairs(costs.size(), &pairs);
        assignment.validate()?;
        Ok(assignment)
    }
}

struct Search<'a> {
    costs: &'a CostMatrix,
    matched: Vec<bool>,
    current: Vec<(usize, usize)>,
    best: Option<(f64, Vec<(usize, usize)>)>,
    nodes: u64,
    node_limit: u64,
}

impl Search<'_> {
    fn expand(&mut self, cost: f64) -> Result<(), SolverFailure> {
        self.nodes += 1;
        if self.nodes > self.node_limit {
            return Err(SolverFailure::NodeLimitExceeded(self.node_limit));
        }

        let Some(i) = self.matched.iter().position(|&m| !m) else {
            if self.best.as_ref().map_or(true, |(best, _)| cost < *best) {
                self.best = Some((cost, self.current.clone()));
            }
            return Ok(());
        };

        if let Some((best, _)) = &self.best {
            if cost + self.lower_bound() >= *best {
                return Ok(());
            }
        }

        let n = self.costs.size();
        let mut partners: Vec<usize> = ((i + 1)..n).filter(|&j| !self.matched[j]).collect();
        partners.sort_by(|&a, &b| self.costs.get(i, a).total_cmp(&self.costs.get(i, b)));

        self.matched[i] = true;
        for j in partners {
            self.matched[j] = true;
            self.current.push((i, j));
            let result = self.expand(cost + self.costs.get(i, j));
            self.current.pop();
            self.matched[j] = false;
            result?;
        }
        self.matched[i] = false;

        Ok(())
    }

    /// Half the sum of every unmatched index's cheapest edge to another unmatched index
    fn lower_bound(&self) -> f64 {
        let n = self.costs.size();
        let mut total = 0.0;
        for k in (0..n).filter(|&k| !self.matched[k]) {
            let cheapest = (0..n)
                .filter(|&l| l != k && !self.matched[l])
                .map(|l| self.costs.get(k, l))
                .fold(f64::INFINITY, f64::min);
            if cheapest.is_finite() {
                total += cheapest;
            }
        }
        total / 2.0
    }
}

//! Exact minimum-cost perfect matching over a cost matrix
//!
//! Two interchangeable backends are provided behind [`MatchingSolver`]:
//! - [`MilpSolver`]: the full N x N binary program solved by a MILP solver
//! - [`BranchAndBoundSolver`]: depth-first search over matchings with a lower bound
//!
//! Both are exact. Neither retries or falls back to a heuristic on failure.

mod branch_bound;
mod milp;

use serde::{Deserialize, Serialize};

use crate::cost::CostMatrix;
use crate::error::{PairingResult, Precondition, SolverFailure};

pub use branch_bound::{BranchAndBoundSolver, DEFAULT_NODE_LIMIT};
pub use milp::MilpSolver;

/// A solver that returns a globally optimal perfect matching
pub trait MatchingSolver {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Minimise `sum C[i][j] * X[i][j]` over symmetric perfect matchings `X`
    fn solve(&self, costs: &CostMatrix) -> PairingResult<Assignment>;
}

/// Which backend to use, as chosen in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    #[default]
    Milp,
    BranchAndBound,
}

impl SolverBackend {
    pub fn build(self, node_limit: u64) -> Box<dyn MatchingSolver> {
        match self {
            SolverBackend::Milp => Box::new(MilpSolver),
            SolverBackend::BranchAndBound => Box::new(BranchAndBoundSolver::new(node_limit)),
        }
    }
}

/// Reject matrices no perfect matching can exist for
pub fn check_solvable(costs: &CostMatrix) -> PairingResult<()> {
    let n = costs.size();
    if n < 2 {
        return Err(Precondition::TooFewCompetitors(n).into());
    }
    if n % 2 != 0 {
        return Err(Precondition::OddCompetitorCount(n).into());
    }
    Ok(())
}

/// N x N 0/1 assignment matrix produced by a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    size: usize,
    cells: Vec<bool>,
}

impl Assignment {
    /// All-zero matrix
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Matrix with both directions of every pair set
    pub fn from_pairs(size: usize, pairs: &[(usize, usize)]) -> Self {
        let mut assignment = Self::new(size);
        for &(i, j) in pairs {
            assignment.set(i, j, true);
            assignment.set(j, i, true);
        }
        assignment
    }

    /// Matrix from explicit 0/1 rows, taken as given
    pub fn from_rows(rows: &[Vec<u8>]) -> Self {
        let size = rows.len();
        let mut assignment = Self::new(size);
        for (i, row) in rows.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate().take(size) {
                assignment.set(i, j, cell != 0);
            }
        }
        assignment
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.size + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        self.cells[i * self.size + j] = value;
    }

    /// First column set in `row`
    pub fn partner(&self, row: usize) -> Option<usize> {
        (0..self.size).find(|&j| self.get(row, j))
    }

    /// Objective value `sum C[i][j] * X[i][j]`; each pair counts in both directions
    pub fn objective(&self, costs: &CostMatrix) -> f64 {
        let mut total = 0.0;
        for i in 0..self.size {
            for j in 0..self.size {
                if i != j && self.get(i, j) {
                    total += costs.get(i, j);
                }
            }
        }
        total
    }

    /// Check row and column sums of 1, symmetry and an empty diagonal
    pub fn validate(&self) -> Result<(), SolverFailure> {
        let n = self.size;
        for i in 0..n {
            if self.get(i, i) {
                return Err(SolverFailure::InvalidAssignment(format!("{} paired with itself", i)));
            }
            let row = (0..n).filter(|&j| self.get(i, j)).count();
            if row != 1 {
                return Err(SolverFailure::InvalidAssignment(format!("row {} sums to {}", i, row)));
            }
            let column = (0..n).filter(|&j| self.get(j, i)).count();
            if column != 1 {
                return Err(SolverFailure::InvalidAssignment(format!(
                    "column {} sums to {}",
                    i, column
                )));
            }
            for j in (i + 1)..n {
                if self.get(i, j) != self.get(j, i) {
                    return Err(SolverFailure::InvalidAssignment(format!(
                        "cells ({}, {}) and ({}, {}) disagree",
                        i, j, j, i
                    )));
                }
            }
        }
        Ok(())
    }
}

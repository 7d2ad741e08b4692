//! Binary integer program backend

use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use tracing::debug;

use super::{check_solvable, Assignment, MatchingSolver};
use crate::cost::CostMatrix;
use crate::error::{PairingResult, SolverFailure};

/// Solves the pairing as a 0/1 program with one variable per ordered pair.
///
/// Constraints:
/// - every row and every column of `X` sums to 1
/// - `X[i][i] = 0`
/// - `X[i][j] = X[j][i]`
#[derive(Debug, Clone, Copy, Default)]
pub struct MilpSolver;

impl MatchingSolver for MilpSolver {
    fn name(&self) -> &str {
        "milp"
    }

    fn solve(&self, costs: &CostMatrix) -> PairingResult<Assignment> {
        check_solvable(costs)?;
        let n = costs.size();

        let mut vars = ProblemVariables::new();
        let mut x: Vec<Vec<Variable>> = Vec::with_capacity(n);
        for _ in 0..n {
            x.push(vars.add_vector(variable().binary(), n));
        }

        let objective: Expression = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j)
            .map(|(i, j)| costs.get(i, j) * x[i][j])
            .sum();

        let mut model = vars.minimise(objective).using(microlp);

        for i in 0..n {
            let row: Expression = x[i].iter().copied().sum();
            let column: Expression = x.iter().map(|r| r[i]).sum();
            let diagonal = x[i][i];
            model.add_constraint(constraint!(row == 1));
            model.add_constraint(constraint!(column == 1));
            model.add_constraint(constraint!(diagonal == 0));

            for j in (i + 1)..n {
                let forward = x[i][j];
                let backward = x[j][i];
                model.add_constraint(constraint!(forward == backward));
            }
        }

        debug!(size = n, variables = n * n, "solving pairing program");
        let solution = model.solve().map_err(resolution_failure)?;

        let mut assignment = Assignment::new(n);
        for i in 0..n {
            for j in 0..n {
                if solution.value(x[i][j]) > 0.5 {
                    assignment.set(i, j, true);
                }
            }
        }
        assignment.validate()?;

        debug!(objective = assignment.objective(costs), "pairing program solved");
        Ok(assignment)
    }
}

fn resolution_failure(error: ResolutionError) -> SolverFailure {
    match error {
        ResolutionError::Infeasible => SolverFailure::Infeasible,
        ResolutionError::Unbounded => SolverFailure::Unbounded,
        other => SolverFailure::Backend(other.to_string()),
    }
}

//! Decode a solved assignment into pairs

use crate::competitor::{Pair, Player};
use crate::error::{PairingResult, Precondition, SolverFailure};
use crate::solver::Assignment;

/// Index pairs in scan order: ascending by the lower index of each pair.
///
/// Deterministic for a given assignment; every index appears exactly once.
pub fn extract_index_pairs(assignment: &Assignment) -> Result<Vec<(usize, usize)>, SolverFailure> {
    let n = assignment.size();
    let mut consumed = vec![false; n];
    let mut pairs = Vec::with_capacity(n / 2);

    for i in 0..n {
        if consumed[i] {
            continue;
        }
        let j = assignment
            .partner(i)
            .ok_or_else(|| SolverFailure::InvalidAssignment(format!("{} has no partner", i)))?;
        if j == i || consumed[j] {
            return Err(SolverFailure::InvalidAssignment(format!(
                "{} is paired with unavailable {}",
                i, j
            )));
        }
        consumed[i] = true;
        consumed[j] = true;
        pairs.push((i, j));
    }

    Ok(pairs)
}

/// Pairs of players for an assignment solved over `players` in the same order
pub fn extract_pairs(assignment: &Assignment, players: &[Player]) -> PairingResult<Vec<Pair>> {
    if assignment.size() != players.len() {
        return Err(Precondition::MatrixSizeMismatch {
            expected: players.len(),
            actual: assignment.size(),
        }
        .into());
    }

    let pairs = extract_index_pairs(assignment)?
        .into_iter()
        .map(|(i, j)| Pair::new(players[i].clone(), players[j].clone()))
        .collect();
    Ok(pairs)
}

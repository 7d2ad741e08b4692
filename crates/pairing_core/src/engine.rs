//! Pairing pipeline: byes, cost matrix, solve, extract

use tracing::{debug, info};

use crate::bye::{check_unique, split_byes};
use crate::competitor::{HeadToHead, Pair, Player};
use crate::cost::{CostMatrix, CostWeights};
use crate::error::{PairingResult, Precondition};
use crate::extract::extract_pairs;
use crate::solver::{MatchingSolver, MilpSolver};

/// Computes one round of pairings.
///
/// The engine is stateless between calls: every call takes an immutable
/// roster snapshot and returns fresh pairs.
pub struct PairingEngine {
    weights: CostWeights,
    solver: Box<dyn MatchingSolver>,
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::new(CostWeights::default(), Box::new(MilpSolver))
    }
}

impl PairingEngine {
    pub fn new(weights: CostWeights, solver: Box<dyn MatchingSolver>) -> Self {
        Self { weights, solver }
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Build the cost matrix this engine would solve for `players`
    pub fn cost_matrix(&self, players: &[Player], history: &HeadToHead) -> CostMatrix {
        CostMatrix::build(players, history, &self.weights)
    }

    /// Optimal pairs for an even roster with no byes.
    ///
    /// Parity is the caller's responsibility; an odd roster is rejected before
    /// the solver runs.
    pub fn pair(&self, players: &[Player], history: &HeadToHead) -> PairingResult<Vec<Pair>> {
        check_unique(players)?;
        if players.len() < 2 {
            return Err(Precondition::TooFewCompetitors(players.len()).into());
        }
        if players.len() % 2 != 0 {
            return Err(Precondition::OddCompetitorCount(players.len()).into());
        }

        let costs = self.cost_matrix(players, history);
        debug!(solver = self.solver.name(), size = costs.size(), "solving round");
        let assignment = self.solver.solve(&costs)?;
        let pairs = extract_pairs(&assignment, players)?;

        info!(
            pairs = pairs.len(),
            cost = assignment.objective(&costs) / 2.0,
            "round paired"
        );
        Ok(pairs)
    }

    /// Pairs for a full roster, with sit-outs and a parity bye resolved first.
    ///
    /// Optimizer pairs come first in scan order, followed by bye pairs in
    /// roster order.
    pub fn pair_round(
        &self,
        players: &[Player],
        sit_outs: &[String],
        history: &HeadToHead,
    ) -> PairingResult<Vec<Pair>> {
        let split = split_byes(players, sit_outs)?;

        let mut pairs = if split.active.is_empty() {
            Vec::new()
        } else {
            self.pair(&split.active, history)?
        };
        pairs.extend(split.byes.into_iter().map(Pair::bye));

        Ok(pairs)
    }
}

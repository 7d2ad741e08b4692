//! Pairwise cost matrix over the active roster

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::competitor::{HeadToHead, Player};

/// Weights applied to each term of the pairing cost.
///
/// The score difference always enters with weight 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Cost per previous meeting of the same two players
    pub rematch_cost: f64,
    /// Flat cost for pairing two members of the same federation
    pub within_federation_cost: f64,
    /// Cost per step of experience-tier difference
    pub experience_cost: f64,
    /// Cost per rating point of difference
    pub elo_cost: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            rematch_cost: 1.5,
            within_federation_cost: 0.75,
            experience_cost: 0.5,
            elo_cost: 0.0001,
        }
    }
}

impl CostWeights {
    /// Every weight zero: cost reduces to the score difference
    pub fn score_only() -> Self {
        Self {
            rematch_cost: 0.0,
            within_federation_cost: 0.0,
            experience_cost: 0.0,
            elo_cost: 0.0,
        }
    }

    /// Scale the experience term, e.g. to fade it out over later rounds
    pub fn with_experience_scaled(mut self, factor: f64) -> Self {
        self.experience_cost *= factor.max(0.0);
        self
    }

    /// Weights for `round` when experience fades linearly to zero by `taper_rounds`
    pub fn for_round(self, round: u32, taper_rounds: Option<u32>) -> Self {
        match taper_rounds {
            Some(taper) if taper > 0 => {
                let elapsed = round.saturating_sub(1) as f64;
                self.with_experience_scaled(1.0 - elapsed / taper as f64)
            }
            _ => self,
        }
    }
}

/// Symmetric N x N cost matrix, indexed in roster order.
///
/// The diagonal is stored as zero and is never a valid pairing; solvers must
/// exclude it through constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    costs: Vec<f64>,
}

impl CostMatrix {
    /// Build the matrix for `players` in the given order
    pub fn build(players: &[Player], history: &HeadToHead, weights: &CostWeights) -> Self {
        let size = players.len();
        let mut costs = vec![0.0; size * size];

        for i in 0..size {
            for j in (i + 1)..size {
                let cost = pair_cost(&players[i], &players[j], history, weights);
                costs[i * size + j] = cost;
                costs[j * size + i] = cost;
            }
        }

        debug!(size, "built cost matrix");
        Self { size, costs }
    }

    /// Wrap raw rows, mirroring the upper triangle so the result is symmetric
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let size = rows.len();
        let mut costs = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let cost = rows[i].get(j).copied().unwrap_or(0.0);
                costs[i * size + j] = cost;
                costs[j * size + i] = cost;
            }
        }
        Self { size, costs }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.costs[i * self.size + j]
    }

    /// Sum of `C[i][j]` over the given unordered pairs
    pub fn matching_cost(&self, pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(i, j)| self.get(i, j)).sum()
    }
}

/// Cost of pairing `a` with `b`
pub fn pair_cost(a: &Player, b: &Player, history: &HeadToHead, weights: &CostWeights) -> f64 {
    let score_delta = (a.score - b.score).abs();
    let rematch = weights.rematch_cost * history.count(&a.name, &b.name) as f64;
    let federation = if a.same_federation(b) {
        weights.within_federation_cost
    } else {
        0.0
    };
    let experience =
        weights.experience_cost * (a.experience.tier() - b.experience.tier()).abs() as f64;
    let rating = weights.elo_cost * (a.rating - b.rating).abs();

    score_delta + rematch + federation + experience + rating
}

#[cfg(test)]
#[path = "cost_tests.rs"]
mod cost_tests;

//! Elo expectation and update rule

use serde::{Deserialize, Serialize};

/// Starting Elo for new players
pub const DEFAULT_RATING: f64 = 1500.0;

/// K-factor for Elo updates (higher = more volatile)
pub const K_FACTOR: f64 = 100.0;

/// Points scored by one side of a finished game
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    /// Score from this side's perspective (1 for win, 0.5 for draw, 0 for loss)
    pub fn points(self) -> f64 {
        match self {
            GameResult::Win => 1.0,
            GameResult::Draw => 0.5,
            GameResult::Loss => 0.0,
        }
    }

    /// The same game seen from the other side
    pub fn flip(self) -> Self {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Loss => GameResult::Win,
            GameResult::Draw => GameResult::Draw,
        }
    }
}

/// Expected score of a player rated `rating` against `opponent`
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
}

/// New rating after scoring `actual` (0, 0.5 or 1) against `opponent`.
///
/// No floor or ceiling is applied; ratings may go negative.
pub fn updated_rating(rating: f64, opponent: f64, actual: f64, k_factor: f64) -> f64 {
    rating + k_factor * (actual - expected_score(rating, opponent))
}

/// Rate both sides of a decisive or drawn game at once.
///
/// Both updates use the pre-game ratings. Returns `(new_a, new_b)`.
pub fn rate_game(rating_a: f64, rating_b: f64, result_a: GameResult, k_factor: f64) -> (f64, f64) {
    (
        updated_rating(rating_a, rating_b, result_a.points(), k_factor),
        updated_rating(rating_b, rating_a, result_a.flip().points(), k_factor),
    )
}

#[cfg(test)]
#[path = "rating_tests.rs"]
mod rating_tests;

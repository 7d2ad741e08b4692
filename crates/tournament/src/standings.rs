//! Ratings and scores rebuilt from the match history

use pairing_core::{rate_game, HeadToHead, PairingError, Player};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::records::{MatchRecord, Opponent, RosterEntry};

/// One player's current state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player: Player,
    /// Games with a terminal outcome, byes included
    pub games_played: u32,
}

/// Standings for the whole roster, in roster order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    entries: Vec<Standing>,
}

impl Standings {
    /// Replay `matches` in order on top of `roster`.
    ///
    /// Every terminal match awards points. Ratings move once per match that
    /// was actually played (not expired, not a bye), using both players'
    /// ratings from before the game.
    pub fn replay(
        roster: &[RosterEntry],
        matches: &[MatchRecord],
        initial_rating: f64,
        k_factor: f64,
    ) -> Result<Self, PairingError> {
        let mut entries: Vec<Standing> = roster
            .iter()
            .map(|entry| Standing {
                player: Player {
                    name: entry.name.clone(),
                    handle: entry.handle.clone(),
                    federation: entry.federation.clone(),
                    experience: entry.experience,
                    rating: initial_rating,
                    score: 0.0,
                    byes: 0,
                },
                games_played: 0,
            })
            .collect();

        let index: HashMap<String, usize> = roster
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name.clone(), i))
            .collect();
        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| PairingError::UnknownCompetitor(name.to_string()))
        };

        for record in matches {
            let white = lookup(&record.white)?;

            let black = match &record.black {
                Opponent::Bye => {
                    entries[white].player.byes += 1;
                    if record.outcome.is_terminal() {
                        entries[white].player.score += record.points_for(&record.white);
                        entries[white].games_played += 1;
                    }
                    continue;
                }
                Opponent::Player(name) => lookup(name)?,
            };

            if !record.outcome.is_terminal() {
                continue;
            }

            for side in [white, black] {
                let name = entries[side].player.name.clone();
                entries[side].player.score += record.points_for(&name);
                entries[side].games_played += 1;
            }

            if let Some(result) = record.outcome.white_result() {
                let (white_rating, black_rating) = rate_game(
                    entries[white].player.rating,
                    entries[black].player.rating,
                    result,
                    k_factor,
                );
                entries[white].player.rating = white_rating;
                entries[black].player.rating = black_rating;
            }
        }

        debug!(players = entries.len(), matches = matches.len(), "standings replayed");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Standing] {
        &self.entries
    }

    /// Pairing snapshots in roster order
    pub fn players(&self) -> Vec<Player> {
        self.entries.iter().map(|s| s.player.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Standing> {
        self.entries.iter().find(|s| s.player.name == name)
    }

    /// Sorted by score, then rating, highest first
    pub fn leaderboard(&self) -> Vec<&Standing> {
        let mut sorted: Vec<&Standing> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            b.player
                .score
                .total_cmp(&a.player.score)
                .then(b.player.rating.total_cmp(&a.player.rating))
        });
        sorted
    }

    /// Print leaderboard to stdout
    pub fn print_leaderboard(&self) {
        println!("{}", crate::report::leaderboard_report(self));
    }
}

/// Completed meetings between real players, for rematch costs
pub fn head_to_head(matches: &[MatchRecord]) -> HeadToHead {
    matches
        .iter()
        .filter(|m| m.outcome.is_terminal())
        .filter_map(|m| match &m.black {
            Opponent::Player(black) => Some((m.white.as_str(), black.as_str())),
            Opponent::Bye => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;

//! Bye handling around the optimizer
//!
//! Byes never enter the cost matrix. Requested sit-outs are removed up front,
//! and if the remaining count is odd one more player is chosen for a parity
//! bye by a fixed rule. Everyone removed here is later paired with their own
//! fresh [`Competitor::Bye`](crate::Competitor::Bye).

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::competitor::Player;
use crate::error::{PairingResult, Precondition};

/// Roster split into optimizer input and bye recipients
#[derive(Debug, Clone, PartialEq)]
pub struct ByeSplit {
    /// Players handed to the optimizer, roster order, always even in number
    pub active: Vec<Player>,
    /// Players receiving a bye, roster order
    pub byes: Vec<Player>,
    /// Name of the player given the parity bye, if one was needed
    pub parity_bye: Option<String>,
}

/// Reject rosters that name the same player twice
pub fn check_unique(players: &[Player]) -> PairingResult<()> {
    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        if !seen.insert(player.name.as_str()) {
            return Err(Precondition::DuplicateCompetitor(player.name.clone()).into());
        }
    }
    Ok(())
}

/// Remove sit-outs and, if needed, one parity bye from `players`
pub fn split_byes(players: &[Player], sit_outs: &[String]) -> PairingResult<ByeSplit> {
    check_unique(players)?;

    let sitting: HashSet<&str> = sit_outs.iter().map(String::as_str).collect();
    for name in &sitting {
        if !players.iter().any(|p| p.name == *name) {
            return Err(Precondition::UnknownSitOut(name.to_string()).into());
        }
    }

    let mut byes = Vec::new();
    let mut active = Vec::with_capacity(players.len());
    for player in players {
        if sitting.contains(player.name.as_str()) {
            byes.push(player.clone());
        } else {
            active.push(player.clone());
        }
    }

    let mut parity_bye = None;
    if active.len() % 2 != 0 {
        let index = parity_bye_index(&active);
        let player = active.remove(index);
        debug!(player = %player.name, "parity bye");
        parity_bye = Some(player.name.clone());
        byes.push(player);

        let order = |p: &Player| players.iter().position(|q| q.name == p.name);
        byes.sort_by_key(order);
    }

    Ok(ByeSplit {
        active,
        byes,
        parity_bye,
    })
}

/// Fewest previous byes, then lowest score, then lowest rating, then latest in roster
fn parity_bye_index(active: &[Player]) -> usize {
    let mut best = 0;
    for (i, candidate) in active.iter().enumerate().skip(1) {
        let current = &active[best];
        let ordering = candidate
            .byes
            .cmp(&current.byes)
            .then(candidate.score.total_cmp(&current.score))
            .then(candidate.rating.total_cmp(&current.rating));
        if ordering != Ordering::Greater {
            best = i;
        }
    }
    best
}

#[cfg(test)]
#[path = "bye_tests.rs"]
mod bye_tests;

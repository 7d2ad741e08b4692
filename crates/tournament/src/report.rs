//! Plain-text reports for the leaderboard and a round's pairings

use pairing_core::expected_score;

use crate::records::{MatchRecord, Opponent};
use crate::standings::Standings;

/// Leaderboard table: rank, player, federation, Elo, score, games
pub fn leaderboard_report(standings: &Standings) -> String {
    let mut report = String::new();
    report.push_str("=== Leaderboard ===\n");
    report.push_str(&format!(
        "{:>4} {:<24} {:<12} {:>8} {:>6} {:>6}\n",
        "#", "Player", "Federation", "Elo", "Score", "Games"
    ));
    report.push_str(&"-".repeat(65));
    report.push('\n');

    for (rank, standing) in standings.leaderboard().into_iter().enumerate() {
        let player = &standing.player;
        report.push_str(&format!(
            "{:>4} {:<24} {:<12} {:>8.1} {:>6} {:>6}\n",
            rank + 1,
            player.name,
            player.federation.as_deref().unwrap_or("-"),
            player.rating,
            player.score,
            standing.games_played
        ));
    }

    report
}

/// Pairings of `round` with white's winning chances
pub fn round_report(round: u32, matches: &[MatchRecord], standings: &Standings) -> String {
    let mut report = String::new();
    report.push_str(&format!("=== Round {} ===\n", round));
    report.push_str(&format!(
        "{:<24} vs {:<24} {:>7} {:>8}  {}\n",
        "White", "Black", "P(W)", "Outcome", "Link"
    ));
    report.push_str(&"-".repeat(80));
    report.push('\n');

    for record in matches.iter().filter(|m| m.round == round) {
        let odds = white_odds(record, standings)
            .map(|p| format!("{:.0}%", p * 100.0))
            .unwrap_or_else(|| "-".to_string());
        report.push_str(&format!(
            "{:<24} vs {:<24} {:>7} {:>8}  {}\n",
            record.white,
            record.black.name(),
            odds,
            record.outcome.to_string(),
            record.match_link.as_deref().unwrap_or("")
        ));
    }

    report
}

/// Expected score of white against black at current ratings; none for byes
pub fn white_odds(record: &MatchRecord, standings: &Standings) -> Option<f64> {
    let Opponent::Player(black) = &record.black else {
        return None;
    };
    let white = standings.get(&record.white)?;
    let black = standings.get(black)?;
    Some(expected_score(white.player.rating, black.player.rating))
}

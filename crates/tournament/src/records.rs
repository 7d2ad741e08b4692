//! Strongly typed roster and match records

use chrono::{DateTime, FixedOffset};
use pairing_core::{Experience, GameResult, BYE_NAME};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Pending,
    White,
    Black,
    Draw,
    Expired,
}

impl Outcome {
    /// Text stored in the games sheet; pending is an empty cell
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Pending => "",
            Outcome::White => "White",
            Outcome::Black => "Black",
            Outcome::Draw => "Draw",
            Outcome::Expired => "Expired",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "" => Some(Outcome::Pending),
            "White" => Some(Outcome::White),
            "Black" => Some(Outcome::Black),
            "Draw" => Some(Outcome::Draw),
            "Expired" => Some(Outcome::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::Pending
    }

    /// Result from white's perspective, for outcomes that move ratings
    pub fn white_result(self) -> Option<GameResult> {
        match self {
            Outcome::White => Some(GameResult::Win),
            Outcome::Black => Some(GameResult::Loss),
            Outcome::Draw => Some(GameResult::Draw),
            Outcome::Pending | Outcome::Expired => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pending => f.write_str("Pending"),
            other => f.write_str(other.label()),
        }
    }
}

/// The black side of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opponent {
    Player(String),
    Bye,
}

impl Opponent {
    pub fn name(&self) -> &str {
        match self {
            Opponent::Player(name) => name,
            Opponent::Bye => BYE_NAME,
        }
    }
}

/// One game of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub round: u32,
    pub white: String,
    pub black: Opponent,
    /// White's score minus black's score when the game was created
    pub score_delta: f64,
    /// Completed meetings between the two before this game
    pub games_played: u32,
    pub match_link: Option<String>,
    pub expires: Option<DateTime<FixedOffset>>,
    pub outcome: Outcome,
}

impl MatchRecord {
    pub fn is_bye(&self) -> bool {
        self.black == Opponent::Bye
    }

    pub fn involves(&self, name: &str) -> bool {
        self.white == name || self.black == Opponent::Player(name.to_string())
    }

    /// Points earned by `name`: 1 for a win, 0.5 for a draw, 0 otherwise
    pub fn points_for(&self, name: &str) -> f64 {
        let white = self.white == name;
        let black = !white && self.black.name() == name && !self.is_bye();
        match self.outcome {
            Outcome::Draw if white || black => 0.5,
            Outcome::White if white => 1.0,
            Outcome::Black if black => 1.0,
            _ => 0.0,
        }
    }
}

/// A player as registered on the roster sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub handle: String,
    pub federation: Option<String>,
    pub experience: Experience,
}

impl RosterEntry {
    pub fn new(name: &str, handle: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: handle.to_string(),
            federation: None,
            experience: Experience::default(),
        }
    }

    pub fn with_federation(mut self, federation: &str) -> Self {
        self.federation = Some(federation.to_string());
        self
    }

    pub fn with_experience(mut self, experience: Experience) -> Self {
        self.experience = experience;
        self
    }
}

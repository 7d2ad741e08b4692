//! Competitor snapshots and head-to-head history

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::rating::DEFAULT_RATING;

/// Self-reported experience tier, ordered from least to most experienced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Experience {
    /// Numeric tier used by the cost function (-1, 0, 1)
    pub fn tier(self) -> i8 {
        match self {
            Experience::Beginner => -1,
            Experience::Intermediate => 0,
            Experience::Advanced => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Experience::Beginner => "Beginner",
            Experience::Intermediate => "Intermediate",
            Experience::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Experience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "low" | "-1" => Ok(Experience::Beginner),
            "intermediate" | "mid" | "0" => Ok(Experience::Intermediate),
            "advanced" | "high" | "1" => Ok(Experience::Advanced),
            other => Err(format!("unknown experience tier `{}`", other)),
        }
    }
}

/// A real tournament participant as seen at the start of a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique display name
    pub name: String,
    /// Account handle on the game server
    pub handle: String,
    /// Federation or club, if any
    pub federation: Option<String>,
    pub experience: Experience,
    pub rating: f64,
    /// Points accumulated so far
    pub score: f64,
    /// Number of byes already received
    pub byes: u32,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: name.to_lowercase(),
            federation: None,
            experience: Experience::default(),
            rating: DEFAULT_RATING,
            score: 0.0,
            byes: 0,
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

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_byes(mut self, byes: u32) -> Self {
        self.byes = byes;
        self
    }

    /// True when both players belong to the same (known) federation
    pub fn same_federation(&self, other: &Player) -> bool {
        matches!((&self.federation, &other.federation), (Some(a), Some(b)) if a == b)
    }
}

/// Either a real player or the "sits out this round" placeholder.
///
/// The bye carries no rating, federation or experience; code that needs those
/// must match on the variant instead of relying on a sentinel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Competitor {
    Real(Player),
    Bye,
}

impl Competitor {
    pub fn is_bye(&self) -> bool {
        matches!(self, Competitor::Bye)
    }

    pub fn player(&self) -> Option<&Player> {
        match self {
            Competitor::Real(player) => Some(player),
            Competitor::Bye => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Competitor::Real(player) => &player.name,
            Competitor::Bye => BYE_NAME,
        }
    }
}

/// Name under which a bye is displayed and persisted
pub const BYE_NAME: &str = "bye";

/// One pairing of the round. A bye, if present, is always `second`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub first: Competitor,
    pub second: Competitor,
}

impl Pair {
    pub fn new(first: Player, second: Player) -> Self {
        Self {
            first: Competitor::Real(first),
            second: Competitor::Real(second),
        }
    }

    pub fn bye(player: Player) -> Self {
        Self {
            first: Competitor::Real(player),
            second: Competitor::Bye,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.first.is_bye() || self.second.is_bye()
    }

    /// Names of both sides, in order
    pub fn names(&self) -> (&str, &str) {
        (self.first.name(), self.second.name())
    }

    /// True if this pair joins `a` and `b`, in either order
    pub fn joins(&self, a: &str, b: &str) -> bool {
        let (x, y) = self.names();
        (x == a && y == b) || (x == b && y == a)
    }
}

/// Counts of completed meetings between two players, independent of colour
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadToHead {
    counts: HashMap<(String, String), u32>,
}

impl HeadToHead {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    /// Record one more meeting between `a` and `b`
    pub fn record(&mut self, a: &str, b: &str) {
        *self.counts.entry(Self::key(a, b)).or_insert(0) += 1;
    }

    /// Number of previous meetings between `a` and `b`
    pub fn count(&self, a: &str, b: &str) -> u32 {
        self.counts.get(&Self::key(a, b)).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for HeadToHead {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut h2h = HeadToHead::new();
        for (a, b) in iter {
            h2h.record(a, b);
        }
        h2h
    }
}

//! Tournament configuration, loaded from TOML

use chrono_tz::Tz;
use pairing_core::{
    CostWeights, PairingEngine, SolverBackend, DEFAULT_NODE_LIMIT, DEFAULT_RATING, K_FACTOR,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TournamentError};

/// Default config file name
pub const DEFAULT_CONFIG_PATH: &str = "tournament.toml";

/// Complete tournament configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Name/description of the tournament
    pub name: String,
    /// JSON workbook holding the roster and games sheets
    pub workbook: PathBuf,
    pub players_sheet: String,
    pub games_sheet: String,
    pub initial_rating: f64,
    pub k_factor: f64,
    /// Experience cost fades to zero by this round
    pub experience_taper_rounds: Option<u32>,
    pub weights: CostWeights,
    pub solver: SolverConfig,
    pub challenge: ChallengeConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "Swiss".to_string(),
            workbook: PathBuf::from("tournament.json"),
            players_sheet: "Leaderboard".to_string(),
            games_sheet: "Games".to_string(),
            initial_rating: DEFAULT_RATING,
            k_factor: K_FACTOR,
            experience_taper_rounds: None,
            weights: CostWeights::default(),
            solver: SolverConfig::default(),
            challenge: ChallengeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Search node cap for the branch-and-bound backend
    pub node_limit: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Milp,
            node_limit: DEFAULT_NODE_LIMIT,
        }
    }
}

/// Time control and hosting options for created games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    pub clock_secs: u32,
    pub increment_secs: u32,
    pub days_until_expired: u32,
    /// IANA time zone whose calendar days bound a game's lifetime
    pub timezone: String,
    pub variant: String,
    pub rated: bool,
    pub base_url: String,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            clock_secs: 600,
            increment_secs: 5,
            days_until_expired: 7,
            timezone: "US/Pacific".to_string(),
            variant: "standard".to_string(),
            rated: true,
            base_url: "https://lichess.org".to_string(),
        }
    }
}

impl ChallengeConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| TournamentError::Config(format!("unknown time zone `{}`", self.timezone)))
    }
}

impl TournamentConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| TournamentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| TournamentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject negative weights and nonsensical constants
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("rematch_cost", self.weights.rematch_cost),
            ("within_federation_cost", self.weights.within_federation_cost),
            ("experience_cost", self.weights.experience_cost),
            ("elo_cost", self.weights.elo_cost),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(TournamentError::Config(format!("{} must be non-negative", name)));
            }
        }
        if !self.k_factor.is_finite() || !self.initial_rating.is_finite() {
            return Err(TournamentError::Config("ratings must be finite".to_string()));
        }
        self.challenge.timezone()?;
        Ok(())
    }

    /// Pairing engine for `round`, with the experience taper applied
    pub fn engine_for_round(&self, round: u32) -> PairingEngine {
        let weights = self.weights.for_round(round, self.experience_taper_rounds);
        PairingEngine::new(weights, self.solver.backend.build(self.solver.node_limit))
    }
}

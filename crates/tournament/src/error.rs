//! Errors raised while running a tournament

use std::path::PathBuf;

use pairing_core::PairingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid workbook JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("sheet `{0}` not found")]
    MissingSheet(String),

    #[error("sheet `{sheet}` has no `{column}` column")]
    MissingColumn { sheet: String, column: String },

    #[error("sheet `{sheet}` row {row}: bad {column} value `{value}`")]
    BadCell {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("challenge service returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Challenges opened before the failure are still live on the service
    #[error("round {round} not recorded; cancel the open challenges {}: {source}", .opened.join(", "))]
    RoundAborted {
        round: u32,
        opened: Vec<String>,
        #[source]
        source: Box<TournamentError>,
    },
}

pub type Result<T> = std::result::Result<T, TournamentError>;

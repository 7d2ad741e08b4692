//! Swiss tournament runner
//!
//! This crate provides infrastructure for:
//! - Keeping the roster and game history in a workbook of sheets
//! - Replaying scores and Elo ratings from the history
//! - Pairing each new round with [`pairing_core`] and opening Lichess challenges
//! - Collecting results and printing leaderboards
//!
//! # Usage
//!
//! ```bash
//! # Write a default config and an empty roster sheet
//! cargo run -p tournament -- init
//!
//! # Show the pairings the next round would get, without creating games
//! cargo run -p tournament -- preview --sit-out "Ana"
//!
//! # Create the next round and open its challenges
//! LICHESS_API_TOKEN=... cargo run -p tournament -- next-round
//!
//! # Pull finished games and update the leaderboard
//! cargo run -p tournament -- fetch-results
//! ```

mod challenge;
mod config;
mod error;
mod records;
mod report;
mod round;
mod sheets;
mod standings;
mod table;

pub use challenge::*;
pub use config::*;
pub use error::*;
pub use records::*;
pub use report::*;
pub use round::*;
pub use sheets::*;
pub use standings::*;
pub use table::*;

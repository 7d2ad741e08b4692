//! Pairing engine for Swiss-style tournaments
//!
//! This crate provides:
//! - An Elo expectation and update model
//! - A pairwise cost matrix over the active roster
//! - Exact minimum-cost perfect matching (MILP or branch and bound)
//! - Extraction of pairs from a solved assignment, plus bye handling
//!
//! # Usage
//!
//! ```ignore
//! let engine = PairingEngine::new(CostWeights::default(), Box::new(MilpSolver));
//! let pairs = engine.pair_round(&players, &sit_outs, &head_to_head)?;
//! ```

mod bye;
mod competitor;
mod cost;
mod engine;
mod error;
mod extract;
mod rating;
pub mod solver;

pub use bye::*;
pub use competitor::*;
pub use cost::*;
pub use engine::*;
pub use error::*;
pub use extract::*;
pub use rating::*;
pub use solver::{
    Assignment, BranchAndBoundSolver, MatchingSolver, MilpSolver, SolverBackend, DEFAULT_NODE_LIMIT,
};

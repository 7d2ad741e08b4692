//! Error kinds surfaced by the pairing engine

use thiserror::Error;

/// Everything that can stop a round from being paired.
///
/// None of these are retried inside the engine; the caller decides whether to
/// relax weights, switch solver backend, or abort the round.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PairingError {
    /// The inputs can never produce a valid perfect matching.
    #[error("precondition violated: {0}")]
    Precondition(#[from] Precondition),

    /// The optimizer did not return a usable optimal matching.
    #[error("solver failed: {0}")]
    Solver(#[from] SolverFailure),

    /// A match or sit-out references a competitor missing from the roster snapshot.
    #[error("competitor `{0}` is not on the roster")]
    UnknownCompetitor(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("{0} competitors cannot be perfectly matched (apply a bye first)")]
    OddCompetitorCount(usize),

    #[error("at least two competitors are required, got {0}")]
    TooFewCompetitors(usize),

    #[error("competitor `{0}` appears more than once")]
    DuplicateCompetitor(String),

    #[error("sit-out `{0}` is not an active competitor")]
    UnknownSitOut(String),

    #[error("cost matrix is {actual}x{actual} but {expected} competitors were given")]
    MatrixSizeMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverFailure {
    #[error("problem is infeasible")]
    Infeasible,

    #[error("problem is unbounded")]
    Unbounded,

    #[error("search exceeded {0} nodes without proving optimality")]
    NodeLimitExceeded(u64),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("solver returned an invalid assignment: {0}")]
    InvalidAssignment(String),
}

pub type PairingResult<T> = Result<T, PairingError>;

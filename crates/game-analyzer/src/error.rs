//! Analyzer error types

use chess_core::Side;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// User-requested abort; not a failure
    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Stockfish error: {0}")]
    Engine(String),

    #[error("Engine reported no score")]
    NoScore,

    #[error("Move list is empty")]
    EmptyGame,

    #[error("No moves made by {0}")]
    NoMovesForSide(Side),

    #[error("Illegal move {uci} at ply {index}")]
    IllegalMove { index: usize, uci: String },

    #[error("Reference catalog is empty")]
    EmptyCatalog,

    #[error("Configuration error: {0}")]
    Config(&'static str),
}

impl AnalysisError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnalysisError::Cancelled)
    }
}

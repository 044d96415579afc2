use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Invalid SAN '{san}' at ply {ply}: {reason}")]
    InvalidSan {
        ply: usize,
        san: String,
        reason: String,
    },

    #[error("Illegal move '{san}' at ply {ply}: {reason}")]
    IllegalMove {
        ply: usize,
        san: String,
        reason: String,
    },

    #[error("Unsupported move at ply {0}")]
    UnsupportedMove(usize),

    #[error("PGN contains no moves")]
    NoMoves,

    #[error("Non-standard starting position")]
    NonStandardStart,
}

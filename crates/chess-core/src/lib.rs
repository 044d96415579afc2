//! Game input for the playstyle analyzer.
//!
//! Turns SAN movetext (or a whole PGN) into immutable [`moves::Move`] records.
//! Everything downstream consumes these records and never parses notation itself.

pub mod error;
pub mod game_data;
pub mod moves;
pub mod pgn;

pub use error::GameError;
pub use moves::{replay_san, CastleSide, Move, PieceKind, Side};

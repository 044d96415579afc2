//! Replays a validated move list into the positions the walker evaluates.

use std::collections::HashMap;

use chess_core::{Move, Side};
use shakmaty::{fen::Fen, uci::UciMove, Chess, EnPassantMode, Position};

use crate::error::AnalysisError;
use crate::types::START_FEN;

/// Threefold repetition / fifty-move rule
const REPETITION_LIMIT: u32 = 3;
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Terminal state of a position, as far as the fallback evaluator cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Checkmate { winner: Side },
    Draw,
}

/// A position reached after a prefix of the game
#[derive(Debug, Clone)]
pub struct PlayedPosition {
    pub fen: String,
    pub side_to_move: Side,
    pub outcome: Outcome,
}

/// Replay every move from the start position.
///
/// Returns one entry per move (the position *after* it). Fails on the first
/// move that is not legal in the running position.
pub fn replay(moves: &[Move]) -> Result<Vec<PlayedPosition>, AnalysisError> {
    if moves.is_empty() {
        return Err(AnalysisError::EmptyGame);
    }

    let mut pos = Chess::default();
    let mut seen: HashMap<String, u32> = HashMap::new();
    seen.insert(repetition_key(START_FEN), 1);
    let mut played = Vec::with_capacity(moves.len());

    for (index, mv) in moves.iter().enumerate() {
        let uci = mv.uci();
        let illegal = || AnalysisError::IllegalMove {
            index,
            uci: uci.clone(),
        };
        let uci_move: UciMove = uci.parse().map_err(|_| illegal())?;
        let legal_move = uci_move.to_move(&pos).map_err(|_| illegal())?;
        pos.play_unchecked(legal_move);

        let fen = Fen::from_position(&pos, EnPassantMode::Legal).to_string();
        let repetitions = {
            let count = seen.entry(repetition_key(&fen)).or_insert(0);
            *count += 1;
            *count
        };

        let side_to_move = Side::from(pos.turn());
        let outcome = if pos.is_checkmate() {
            Outcome::Checkmate {
                winner: side_to_move.opponent(),
            }
        } else if pos.is_stalemate()
            || pos.is_insufficient_material()
            || pos.halfmoves() >= FIFTY_MOVE_HALFMOVES
            || repetitions >= REPETITION_LIMIT
        {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        };

        played.push(PlayedPosition {
            fen,
            side_to_move,
            outcome,
        });
    }

    Ok(played)
}

/// Placement, side, castling and en passant: the fields that define a repetition
fn repetition_key(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

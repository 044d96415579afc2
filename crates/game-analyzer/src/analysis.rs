//! Move quality and trend detection: pure functions only
//! (No engine or board dependencies; evaluations are White-perspective pawns)

use chess_core::Side;
use serde::{Deserialize, Serialize};

/// Classification thresholds (pawns lost by the mover)
pub const MISTAKE_THRESHOLD: f64 = 0.8;
pub const BLUNDER_THRESHOLD: f64 = 1.8;

/// Accuracy points lost per pawn of evaluation ceded
const ACCURACY_LOSS_PER_PAWN: f64 = 20.0;

/// Accuracy reported for a side that made no evaluated moves
pub const DEFAULT_ACCURACY: f64 = 0.5;

/// Sacrifice signature: a drop of more than this for the mover...
const SACRIFICE_DROP: f64 = 0.5;
/// ...followed by a recovery of more than this on the next ply
const SACRIFICE_RECOVERY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    Fine,
    Mistake,
    Blunder,
}

/// Evaluation change in the mover's favor (negative = mover got worse)
pub fn mover_delta(delta: f64, mover: Side) -> f64 {
    match mover {
        Side::White => delta,
        Side::Black => -delta,
    }
}

/// Classify a move from the White-perspective delta it produced.
pub fn classify_move(delta: f64, mover: Side) -> MoveQuality {
    let change = mover_delta(delta, mover);
    if change < -BLUNDER_THRESHOLD {
        MoveQuality::Blunder
    } else if change < -MISTAKE_THRESHOLD {
        MoveQuality::Mistake
    } else {
        MoveQuality::Fine
    }
}

/// Accuracy contribution of one move, 0..=100
pub fn move_accuracy(delta: f64, mover: Side) -> f64 {
    let change = mover_delta(delta, mover);
    if change < 0.0 {
        (100.0 - change.abs() * ACCURACY_LOSS_PER_PAWN).max(0.0)
    } else {
        100.0
    }
}

/// Running accuracy for one side
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyTally {
    total: f64,
    moves: u32,
}

impl AccuracyTally {
    pub fn add(&mut self, accuracy: f64) {
        self.total += accuracy;
        self.moves += 1;
    }

    /// Average accuracy as 0..=1, `default` when no moves were counted
    pub fn average(&self, default: f64) -> f64 {
        if self.moves == 0 {
            return default;
        }
        (self.total / self.moves as f64 / 100.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sacrifice {
    /// Index into the evaluation trace where the drop starts
    pub position_index: usize,
    pub side: Side,
    /// Size of the initial drop
    pub value: f64,
}

/// Find drop-then-recovery signatures in an evaluation trace.
///
/// The first entry and the last two are never the start of a signature. An
/// index `i` is attributed to White when odd, Black when even.
pub fn detect_sacrifices(evals: &[f64]) -> Vec<Sacrifice> {
    let mut sacrifices = Vec::new();
    if evals.len() < 4 {
        return sacrifices;
    }

    for i in 1..evals.len() - 2 {
        let side = if i % 2 == 1 { Side::White } else { Side::Black };
        let initial = mover_delta(evals[i + 1] - evals[i], side);
        let followup = mover_delta(evals[i + 2] - evals[i + 1], side);

        if initial < -SACRIFICE_DROP && followup > SACRIFICE_RECOVERY {
            sacrifices.push(Sacrifice {
                position_index: i,
                side,
                value: initial.abs(),
            });
        }
    }

    sacrifices
}

/// Piece values used for material balance (bishop slightly above knight)
pub fn piece_value(piece: char) -> f64 {
    match piece.to_ascii_lowercase() {
        'p' => 1.0,
        'n' => 3.0,
        'b' => 3.25,
        'r' => 5.0,
        'q' => 9.0,
        _ => 0.0,
    }
}

/// Signed material balance of a FEN (positive favors White)
pub fn material_balance(fen: &str) -> f64 {
    let placement = fen.split_whitespace().next().unwrap_or("");
    placement
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| {
            if c.is_ascii_uppercase() {
                piece_value(c)
            } else {
                -piece_value(c)
            }
        })
        .sum()
}

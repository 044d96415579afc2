//! Engine-free analysis: material balance with a little positional noise.
//!
//! Used only when no oracle can be started. The jitter makes this path
//! non-deterministic on purpose; nothing downstream may rely on it for
//! reproducibility.

use chess_core::{Move, Side};
use rand::Rng;
use tracing::info;

use crate::analysis::{detect_sacrifices, material_balance, AccuracyTally};
use crate::board::{self, Outcome, PlayedPosition};
use crate::error::AnalysisError;
use crate::types::{AnalysisResult, AnalysisSource, PerSide, PositionAnalysis};
use crate::uci::MATE_SCORE;

/// Half-width of the random positional factor, in pawns
const JITTER: f64 = 0.2;

/// Depth reported for synthetic evaluations
const FALLBACK_DEPTH: u32 = 8;

/// Coarser thresholds than the engine path; material swings are lumpier
const MISTAKE_SWING: f64 = 1.5;
const BLUNDER_SWING: f64 = 3.0;
const ACCURACY_LOSS_PER_PAWN: f64 = 10.0;
const DEFAULT_ACCURACY: f64 = 0.7;

/// Analyze a move list without an engine.
pub fn analyze_without_engine<R: Rng>(
    moves: &[Move],
    on_progress: impl FnMut(f64),
    is_cancelled: impl Fn() -> bool,
    rng: &mut R,
) -> Result<AnalysisResult, AnalysisError> {
    let played = board::replay(moves)?;
    analyze_played(&played, on_progress, is_cancelled, rng)
}

/// Synthetic evaluation of one position
pub fn evaluate_position<R: Rng>(position: &PlayedPosition, rng: &mut R) -> f64 {
    let evaluation = match position.outcome {
        Outcome::Checkmate { winner: Side::White } => MATE_SCORE,
        Outcome::Checkmate { winner: Side::Black } => -MATE_SCORE,
        Outcome::Draw => 0.0,
        Outcome::Ongoing => material_balance(&position.fen) + rng.gen_range(-JITTER..JITTER),
    };
    evaluation.clamp(-MATE_SCORE, MATE_SCORE)
}

pub(crate) fn analyze_played<R: Rng>(
    played: &[PlayedPosition],
    mut on_progress: impl FnMut(f64),
    is_cancelled: impl Fn() -> bool,
    rng: &mut R,
) -> Result<AnalysisResult, AnalysisError> {
    info!(moves = played.len(), "Using fallback analysis");

    let total = played.len();
    let mut positions = Vec::with_capacity(total + 1);
    positions.push(PositionAnalysis::start());

    for (i, position) in played.iter().enumerate() {
        if is_cancelled() {
            info!(ply = i, "Fallback analysis cancelled");
            return Err(AnalysisError::Cancelled);
        }
        on_progress(i as f64 / total as f64 * 100.0);

        let evaluation = evaluate_position(position, rng);
        positions.push(PositionAnalysis::bare(
            position.fen.clone(),
            evaluation,
            FALLBACK_DEPTH,
        ));
    }

    let mut mistakes = PerSide::<u32>::default();
    let mut blunders = PerSide::<u32>::default();
    let mut tallies = PerSide::<AccuracyTally>::default();

    // Transition i -> i+1 is the move made from position i; the opening move is not scored
    for i in 1..positions.len().saturating_sub(1) {
        let diff = positions[i + 1].evaluation - positions[i].evaluation;
        let mover = if i % 2 == 0 { Side::White } else { Side::Black };
        let loss = match mover {
            Side::White => -diff,
            Side::Black => diff,
        };

        if loss > BLUNDER_SWING {
            *blunders.get_mut(mover) += 1;
        } else if loss > MISTAKE_SWING {
            *mistakes.get_mut(mover) += 1;
        }

        tallies
            .get_mut(mover)
            .add((100.0 - diff.abs() * ACCURACY_LOSS_PER_PAWN).max(0.0));
    }

    let evals: Vec<f64> = positions.iter().map(|p| p.evaluation).collect();
    let mut sacrifices = PerSide::<u32>::default();
    for sacrifice in detect_sacrifices(&evals) {
        *sacrifices.get_mut(sacrifice.side) += 1;
    }

    Ok(AnalysisResult {
        positions,
        accuracy: PerSide::new(
            tallies.white.average(DEFAULT_ACCURACY),
            tallies.black.average(DEFAULT_ACCURACY),
        ),
        mistakes,
        blunders,
        sacrifices,
        source: AnalysisSource::Fallback,
    })
}

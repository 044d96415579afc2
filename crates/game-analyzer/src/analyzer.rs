//! Game walker: evaluates every position of a game with the oracle and
//! derives per-side mistakes, blunders, accuracy and sacrifices.

use chess_core::Move;
use tracing::{debug, info, warn};

use crate::analysis::{
    classify_move, detect_sacrifices, material_balance, move_accuracy, AccuracyTally, MoveQuality,
    DEFAULT_ACCURACY,
};
use crate::board::{self, PlayedPosition};
use crate::config::SearchLimits;
use crate::error::AnalysisError;
use crate::fallback;
use crate::oracle::{Oracle, OracleLauncher};
use crate::types::{AnalysisResult, AnalysisSource, PerSide, PositionAnalysis};

/// Depth reported for a position whose evaluation was substituted
const SUBSTITUTED_DEPTH: u32 = 1;

/// Whether a live oracle is available after [`Analyzer::init_engine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Ready,
    Unavailable,
}

/// Walks games through one long-lived oracle.
///
/// Requests are serialized by `&mut self`. Callers that share an analyzer
/// across tasks wrap it in a `tokio::sync::Mutex`.
pub struct Analyzer<L: OracleLauncher> {
    launcher: L,
    oracle: Option<L::Oracle>,
}

impl<L: OracleLauncher> Analyzer<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            oracle: None,
        }
    }

    /// Launch the oracle if it is not running yet.
    pub async fn init_engine(&mut self) -> EngineStatus {
        if self.oracle.is_some() {
            return EngineStatus::Ready;
        }

        match self.launcher.launch().await {
            Ok(oracle) => {
                self.oracle = Some(oracle);
                EngineStatus::Ready
            }
            Err(e) => {
                warn!(error = %e, "Engine unavailable");
                EngineStatus::Unavailable
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.oracle.is_some()
    }

    /// Stop the oracle. The next analysis relaunches it.
    pub async fn shutdown(&mut self) {
        if let Some(mut oracle) = self.oracle.take() {
            oracle.shutdown().await;
            info!("Engine shut down");
        }
    }

    /// Analyze a whole game.
    ///
    /// The move list is validated before the oracle sees anything.
    /// `on_progress` receives `i / total * 100` before move `i` is evaluated;
    /// `is_cancelled` is polled once per move. A cancelled run shuts the
    /// oracle down and returns [`AnalysisError::Cancelled`].
    pub async fn analyze_game(
        &mut self,
        moves: &[Move],
        limits: SearchLimits,
        on_progress: impl FnMut(f64),
        is_cancelled: impl Fn() -> bool,
    ) -> Result<AnalysisResult, AnalysisError> {
        let played = board::replay(moves)?;

        self.init_engine().await;
        let Some(oracle) = self.oracle.as_mut() else {
            return fallback::analyze_played(
                &played,
                on_progress,
                is_cancelled,
                &mut rand::thread_rng(),
            );
        };

        info!(moves = moves.len(), depth = limits.depth, "Analyzing game");
        let walk = walk_game(oracle, moves, &played, limits, on_progress, is_cancelled).await;

        match walk {
            Ok((result, engine_faulted)) => {
                if engine_faulted {
                    // The process may be gone; relaunch on the next game
                    self.shutdown().await;
                }
                Ok(result)
            }
            Err(e) => {
                self.shutdown().await;
                Err(e)
            }
        }
    }
}

/// Evaluate every played position and build the result.
///
/// Returns the result and whether the oracle reported a transport fault.
async fn walk_game<O: Oracle>(
    oracle: &mut O,
    moves: &[Move],
    played: &[PlayedPosition],
    limits: SearchLimits,
    mut on_progress: impl FnMut(f64),
    is_cancelled: impl Fn() -> bool,
) -> Result<(AnalysisResult, bool), AnalysisError> {
    let total = moves.len();
    let mut positions = Vec::with_capacity(total + 1);
    positions.push(PositionAnalysis::start());

    let mut prev_eval = 0.0;
    let mut mistakes = PerSide::<u32>::default();
    let mut blunders = PerSide::<u32>::default();
    let mut tallies = PerSide::<AccuracyTally>::default();
    let mut engine_faulted = false;

    for (i, (mv, position)) in moves.iter().zip(played).enumerate() {
        if is_cancelled() {
            info!(ply = i, "Analysis cancelled");
            return Err(AnalysisError::Cancelled);
        }
        on_progress(i as f64 / total as f64 * 100.0);

        match oracle.evaluate(&position.fen, limits).await {
            Ok(analysis) => {
                let delta = analysis.evaluation - prev_eval;
                match classify_move(delta, mv.side) {
                    MoveQuality::Blunder => *blunders.get_mut(mv.side) += 1,
                    MoveQuality::Mistake => *mistakes.get_mut(mv.side) += 1,
                    MoveQuality::Fine => {}
                }
                tallies.get_mut(mv.side).add(move_accuracy(delta, mv.side));

                debug!(ply = i, san = %mv.san, eval = analysis.evaluation, "Position analyzed");
                prev_eval = analysis.evaluation;
                positions.push(analysis);
            }
            Err(e) => {
                warn!(ply = i, error = %e, "Position analysis failed, using material balance");
                if matches!(e, AnalysisError::Engine(_)) {
                    engine_faulted = true;
                }
                positions.push(PositionAnalysis::bare(
                    position.fen.clone(),
                    material_balance(&position.fen),
                    SUBSTITUTED_DEPTH,
                ));
            }
        }
    }

    let evals: Vec<f64> = positions.iter().map(|p| p.evaluation).collect();
    let mut sacrifices = PerSide::<u32>::default();
    for sacrifice in detect_sacrifices(&evals) {
        *sacrifices.get_mut(sacrifice.side) += 1;
    }

    let result = AnalysisResult {
        positions,
        accuracy: PerSide::new(
            tallies.white.average(DEFAULT_ACCURACY),
            tallies.black.average(DEFAULT_ACCURACY),
        ),
        mistakes,
        blunders,
        sacrifices,
        source: AnalysisSource::Engine,
    };

    Ok((result, engine_faulted))
}

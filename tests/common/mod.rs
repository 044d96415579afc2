#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chess_core::{replay_san, Move, Side};
use game_analyzer::types::{AnalysisResult, PositionAnalysis};
use game_analyzer::uci::{parse_line, side_to_move, SearchAccumulator};
use game_analyzer::{AnalysisError, Oracle, OracleLauncher, SearchLimits};

/// Observable state shared by a launcher and every oracle it starts.
#[derive(Debug, Default)]
pub struct OracleState {
    pub launches: AtomicUsize,
    pub evaluations: AtomicUsize,
    pub running: AtomicBool,
    pub shutdowns: AtomicUsize,
}

impl OracleState {
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Stub engine: 0.2 when White is to move, -0.1 when Black is to move.
///
/// Answers are pushed through the real report parser and accumulator, as an
/// engine's output would be. `fail_at` makes the n-th evaluation (0-based)
/// fail with a transport error.
pub struct ScriptedOracle {
    state: Arc<OracleState>,
    fail_at: Option<usize>,
}

impl Oracle for ScriptedOracle {
    async fn evaluate(
        &mut self,
        fen: &str,
        limits: SearchLimits,
    ) -> Result<PositionAnalysis, AnalysisError> {
        let n = self.state.evaluations.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(n) {
            return Err(AnalysisError::Engine("scripted failure".to_string()));
        }

        // Scores are reported from the side to move
        let cp = match side_to_move(fen) {
            Side::White => 20,
            Side::Black => 10,
        };
        let script = [
            format!("info depth {} multipv 1 score cp {cp} nodes 1000", limits.depth),
            "bestmove (none)".to_string(),
        ];

        let mut acc = SearchAccumulator::new(fen, 1);
        for line in &script {
            acc.feed(parse_line(line));
        }
        acc.finish()
    }

    async fn shutdown(&mut self) {
        self.state.running.store(false, Ordering::SeqCst);
        self.state.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
pub struct ScriptedLauncher {
    pub state: Arc<OracleState>,
    pub fail_at: Option<usize>,
}

impl ScriptedLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::default()
        }
    }
}

impl OracleLauncher for ScriptedLauncher {
    type Oracle = ScriptedOracle;

    async fn launch(&self) -> Result<ScriptedOracle, AnalysisError> {
        self.state.launches.fetch_add(1, Ordering::SeqCst);
        self.state.running.store(true, Ordering::SeqCst);
        Ok(ScriptedOracle {
            state: self.state.clone(),
            fail_at: self.fail_at,
        })
    }
}

pub fn limits() -> SearchLimits {
    SearchLimits {
        depth: 12,
        movetime: std::time::Duration::from_millis(100),
    }
}

pub fn moves(sans: &[&str]) -> Vec<Move> {
    replay_san(sans).expect("valid test game")
}

/// Opera Game, Morphy vs. Duke Karl / Count Isouard, Paris 1858
pub const OPERA_GAME: [&str; 33] = [
    "e4", "e5", "Nf3", "d6", "d4", "Bg4", "dxe5", "Bxf3", "Qxf3", "dxe5", "Bc4", "Nf6", "Qb3",
    "Qe7", "Nc3", "c6", "Bg5", "b5", "Nxb5", "cxb5", "Bxb5+", "Nbd7", "O-O-O", "Rd8", "Rxd7",
    "Rxd7", "Rd1", "Qe6", "Bxd7+", "Nxd7", "Qb8+", "Nxb8", "Rd8#",
];

/// Checks that hold for every result, whichever path produced it.
pub fn assert_result_invariants(result: &AnalysisResult, moves: &[Move]) {
    assert_eq!(result.positions.len(), moves.len() + 1);
    for accuracy in [result.accuracy.white, result.accuracy.black] {
        assert!((0.0..=1.0).contains(&accuracy), "accuracy {accuracy}");
    }
    let white_moves = moves.iter().filter(|m| m.side == Side::White).count() as u32;
    let black_moves = moves.len() as u32 - white_moves;
    assert!(result.mistakes.white + result.blunders.white <= white_moves);
    assert!(result.mistakes.black + result.blunders.black <= black_moves);
}

//! Result types shared by the walker, the profiler and the matcher.

use chess_core::Side;
use serde::{Deserialize, Serialize};

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Sentinel for the endgame trait when the game ended before the endgame
pub const ENDGAME_NOT_REACHED: f64 = -1.0;

/// A candidate continuation reported by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    /// First move of the line in UCI notation
    #[serde(rename = "move")]
    pub uci: String,
    /// Evaluation of the line (White's perspective, pawns)
    pub evaluation: f64,
    /// First move rendered as SAN, UCI when it could not be converted
    pub line: String,
}

/// Engine verdict for one position of the trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionAnalysis {
    pub fen: String,
    /// Pawns, positive favors White
    pub evaluation: f64,
    /// Raw mate distance as reported (relative to the side to move)
    pub mate: Option<i32>,
    pub best_move: Option<String>,
    pub depth: u32,
    /// Up to three ranked candidate continuations
    pub variations: Vec<Variation>,
}

impl PositionAnalysis {
    /// Trivial analysis of the starting position
    pub fn start() -> Self {
        Self::bare(START_FEN.to_string(), 0.0, 0)
    }

    /// Analysis without engine output (substitutions and fallback)
    pub fn bare(fen: String, evaluation: f64, depth: u32) -> Self {
        Self {
            fen,
            evaluation,
            mate: None,
            best_move: None,
            depth,
            variations: Vec::new(),
        }
    }
}

/// Per-side pair of counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub white: T,
    pub black: T,
}

impl<T: Copy> PerSide<T> {
    pub fn new(white: T, black: T) -> Self {
        Self { white, black }
    }

    pub fn get(&self, side: Side) -> T {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}

/// Which evaluator produced the trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Engine,
    /// Material balance with random jitter; approximate
    Fallback,
}

/// Full trace of a game plus aggregate counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// One entry per position, starting position included
    pub positions: Vec<PositionAnalysis>,
    /// 0..=1
    pub accuracy: PerSide<f64>,
    pub mistakes: PerSide<u32>,
    pub blunders: PerSide<u32>,
    pub sacrifices: PerSide<u32>,
    pub source: AnalysisSource,
}

impl AnalysisResult {
    pub fn evaluations(&self) -> Vec<f64> {
        self.positions.iter().map(|p| p.evaluation).collect()
    }
}

/// The six scored traits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitScores {
    pub aggression: f64,
    pub positional: f64,
    pub tactical: f64,
    pub defensive: f64,
    pub risk_taking: f64,
    /// `ENDGAME_NOT_REACHED` when the game was too short
    pub endgame: f64,
}

impl TraitScores {
    pub const fn new(
        aggression: f64,
        positional: f64,
        tactical: f64,
        defensive: f64,
        risk_taking: f64,
        endgame: f64,
    ) -> Self {
        Self {
            aggression,
            positional,
            tactical,
            defensive,
            risk_taking,
            endgame,
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.aggression,
            self.positional,
            self.tactical,
            self.defensive,
            self.risk_taking,
            self.endgame,
        ]
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        let [aggression, positional, tactical, defensive, risk_taking, endgame] = values;
        Self::new(aggression, positional, tactical, defensive, risk_taking, endgame)
    }

    pub fn endgame_reached(&self) -> bool {
        self.endgame != ENDGAME_NOT_REACHED
    }
}

/// Playstyle of one side in one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleVector {
    #[serde(flatten)]
    pub traits: TraitScores,
    pub opening_repertoire: Vec<String>,
}

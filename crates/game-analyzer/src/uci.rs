//! UCI report parsing and per-search accumulation.
//!
//! Engine output is folded into a [`SearchAccumulator`] one line at a time, in
//! arrival order. Parsing is tolerant: a missing or malformed field never fails
//! the line, it just leaves that field unset.

use std::sync::LazyLock;

use chess_core::Side;
use regex::Regex;
use shakmaty::{fen::Fen, san::San, uci::UciMove, CastlingMode, Chess};

use crate::error::AnalysisError;
use crate::types::{PositionAnalysis, Variation};

static DEPTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" depth (\d+)").expect("valid regex"));
static MULTIPV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" multipv (\d+)").expect("valid regex"));
static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" score (cp|mate) (-?\d+)").expect("valid regex"));
static PV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" pv ((?:[a-h][1-8][a-h][1-8][qrbn]?\s*)+)").expect("valid regex")
});
static BESTMOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^bestmove ([a-h][1-8][a-h][1-8][qrbn]?)").expect("valid regex"));

/// Saturation magnitude for forced mates, in pawns
pub const MATE_SCORE: f64 = 20.0;

/// Decay per ply of mate distance
const MATE_DECAY: f64 = 0.1;

/// Engine score, relative to the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Cp(i32),
    Mate(i32),
}

impl Score {
    /// Score in pawns, mates saturated near ±20 and decaying with distance.
    pub fn to_pawns(self) -> f64 {
        match self {
            Score::Cp(cp) => cp as f64 / 100.0,
            Score::Mate(n) if n > 0 => MATE_SCORE - n as f64 * MATE_DECAY,
            Score::Mate(n) => -MATE_SCORE + n.abs() as f64 * MATE_DECAY,
        }
    }

    /// Score in pawns from White's point of view.
    pub fn white_pawns(self, side_to_move: Side) -> f64 {
        let pawns = self.to_pawns();
        match side_to_move {
            Side::White => pawns,
            Side::Black => -pawns,
        }
    }

    pub fn mate(self) -> Option<i32> {
        match self {
            Score::Mate(n) => Some(n),
            Score::Cp(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoReport {
    pub depth: Option<u32>,
    pub multipv: Option<u32>,
    pub score: Option<Score>,
    pub pv: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineReport {
    Info(InfoReport),
    /// Terminal report; `None` for `bestmove (none)`
    BestMove(Option<String>),
    Other,
}

/// Classify one line of engine output.
pub fn parse_line(line: &str) -> EngineReport {
    let line = line.trim();
    if line.starts_with("bestmove") {
        let best = BESTMOVE_RE
            .captures(line)
            .map(|cap| cap[1].to_string());
        return EngineReport::BestMove(best);
    }
    if !line.starts_with("info") {
        return EngineReport::Other;
    }

    let capture_u32 = |re: &Regex| {
        re.captures(line)
            .and_then(|cap| cap[1].parse::<u32>().ok())
    };

    let score = SCORE_RE.captures(line).and_then(|cap| {
        let value: i32 = cap[2].parse().ok()?;
        Some(if &cap[1] == "cp" {
            Score::Cp(value)
        } else {
            Score::Mate(value)
        })
    });

    let pv = PV_RE
        .captures(line)
        .map(|cap| cap[1].split_whitespace().map(String::from).collect())
        .unwrap_or_default();

    EngineReport::Info(InfoReport {
        depth: capture_u32(&*DEPTH_RE),
        multipv: capture_u32(&*MULTIPV_RE),
        score,
        pv,
    })
}

/// Side to move from the second FEN field.
pub fn side_to_move(fen: &str) -> Side {
    match fen.split_whitespace().nth(1) {
        Some("b") => Side::Black,
        _ => Side::White,
    }
}

/// Convert a single UCI move to SAN at a given position.
pub fn uci_to_san(fen: &str, uci_str: &str) -> Option<String> {
    let fen: Fen = fen.parse().ok()?;
    let pos: Chess = fen.into_position(CastlingMode::Standard).ok()?;
    let uci_move: UciMove = uci_str.parse().ok()?;
    let legal_move = uci_move.to_move(&pos).ok()?;
    Some(San::from_move(&pos, legal_move).to_string())
}

#[derive(Debug, Clone)]
struct PvLine {
    score: Score,
    first_move: String,
}

/// Folds the report stream of one search into a [`PositionAnalysis`].
#[derive(Debug)]
pub struct SearchAccumulator {
    fen: String,
    side_to_move: Side,
    depth: u32,
    score: Option<Score>,
    lines: Vec<Option<PvLine>>,
    best_move: Option<String>,
    finished: bool,
}

impl SearchAccumulator {
    pub fn new(fen: &str, multipv: u32) -> Self {
        Self {
            fen: fen.to_string(),
            side_to_move: side_to_move(fen),
            depth: 0,
            score: None,
            lines: vec![None; multipv.clamp(1, 3) as usize],
            best_move: None,
            finished: false,
        }
    }

    /// Feed one report. Returns true once the terminal report has arrived.
    pub fn feed(&mut self, report: EngineReport) -> bool {
        match report {
            EngineReport::Info(info) => {
                // Only scored reports count; "info string" and currmove chatter are skipped
                let Some(score) = info.score else {
                    return self.finished;
                };
                if let Some(depth) = info.depth {
                    self.depth = self.depth.max(depth);
                }
                let index = info.multipv.unwrap_or(1).max(1) as usize - 1;
                if index == 0 {
                    self.score = Some(score);
                }
                if let (Some(slot), Some(first)) = (self.lines.get_mut(index), info.pv.first()) {
                    *slot = Some(PvLine {
                        score,
                        first_move: first.clone(),
                    });
                }
            }
            EngineReport::BestMove(best) => {
                self.best_move = best;
                self.finished = true;
            }
            EngineReport::Other => {}
        }
        self.finished
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_score(&self) -> bool {
        self.score.is_some()
    }

    /// Finalize with whatever has been collected so far.
    pub fn finish(self) -> Result<PositionAnalysis, AnalysisError> {
        let score = self.score.ok_or(AnalysisError::NoScore)?;
        let evaluation = score.white_pawns(self.side_to_move);

        let mut variations: Vec<Variation> = self
            .lines
            .iter()
            .flatten()
            .map(|line| Variation {
                uci: line.first_move.clone(),
                evaluation: line.score.white_pawns(self.side_to_move),
                line: uci_to_san(&self.fen, &line.first_move)
                    .unwrap_or_else(|| line.first_move.clone()),
            })
            .collect();

        if variations.is_empty() {
            if let Some(best) = &self.best_move {
                variations.push(Variation {
                    uci: best.clone(),
                    evaluation,
                    line: uci_to_san(&self.fen, best).unwrap_or_else(|| best.clone()),
                });
            }
        }

        Ok(PositionAnalysis {
            fen: self.fen,
            evaluation,
            mate: score.mate(),
            best_move: self.best_move,
            depth: self.depth.max(1),
            variations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

    #[test]
    fn test_parse_info_line() {
        let line = "info depth 20 seldepth 25 multipv 1 score cp 35 nodes 100000 pv e2e4 e7e5 g1f3";
        let EngineReport::Info(info) = parse_line(line) else {
            panic!("expected info");
        };
        assert_eq!(info.depth, Some(20));
        assert_eq!(info.multipv, Some(1));
        assert_eq!(info.score, Some(Score::Cp(35)));
        assert_eq!(info.pv, vec!["e2e4", "e7e5", "g1f3"]);
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        let EngineReport::Info(info) = parse_line("info string NNUE evaluation enabled") else {
            panic!("expected info");
        };
        assert_eq!(info, InfoReport::default());

        let EngineReport::Info(info) = parse_line("info depth x score mate") else {
            panic!("expected info");
        };
        assert_eq!(info.depth, None);
        assert_eq!(info.score, None);
    }

    #[test]
    fn test_parse_bestmove() {
        assert_eq!(
            parse_line("bestmove e7e8q ponder a2a3"),
            EngineReport::BestMove(Some("e7e8q".to_string()))
        );
        assert_eq!(parse_line("bestmove (none)"), EngineReport::BestMove(None));
        assert_eq!(parse_line("readyok"), EngineReport::Other);
    }

    #[test]
    fn test_mate_mapping() {
        assert!((Score::Mate(3).to_pawns() - 19.7).abs() < 1e-9);
        assert!((Score::Mate(-2).to_pawns() + 19.8).abs() < 1e-9);
        assert!((Score::Mate(0).to_pawns() + 20.0).abs() < 1e-9);
        assert!((Score::Mate(3).white_pawns(Side::Black) + 19.7).abs() < 1e-9);
    }

    #[test]
    fn test_accumulator_flips_for_black_to_move() {
        let mut acc = SearchAccumulator::new(AFTER_E4, 1);
        assert!(!acc.feed(parse_line("info depth 5 score cp 30 pv e7e5")));
        assert!(!acc.feed(parse_line("info depth 9 score cp -25 pv c7c5 g1f3")));
        assert!(acc.feed(parse_line("bestmove c7c5 ponder g1f3")));

        let analysis = acc.finish().unwrap();
        assert!((analysis.evaluation - 0.25).abs() < 1e-9);
        assert_eq!(analysis.depth, 9);
        assert_eq!(analysis.best_move.as_deref(), Some("c7c5"));
        assert_eq!(analysis.mate, None);
        assert_eq!(analysis.variations.len(), 1);
        assert_eq!(analysis.variations[0].line, "c5");
    }

    #[test]
    fn test_accumulator_ranks_multipv_lines() {
        let mut acc = SearchAccumulator::new(crate::types::START_FEN, 3);
        acc.feed(parse_line("info depth 10 multipv 1 score cp 40 pv e2e4"));
        acc.feed(parse_line("info depth 10 multipv 2 score cp 30 pv d2d4"));
        acc.feed(parse_line("info depth 10 multipv 3 score cp 20 pv g1f3"));
        acc.feed(parse_line("bestmove e2e4"));

        let analysis = acc.finish().unwrap();
        // main score comes from the first line, not the last one reported
        assert!((analysis.evaluation - 0.4).abs() < 1e-9);
        let lines: Vec<&str> = analysis.variations.iter().map(|v| v.line.as_str()).collect();
        assert_eq!(lines, vec!["e4", "d4", "Nf3"]);
    }

    #[test]
    fn test_accumulator_keeps_raw_mate() {
        let mut acc = SearchAccumulator::new(AFTER_E4, 1);
        acc.feed(parse_line("info depth 12 score mate -4 pv d8h4"));
        let analysis = acc.finish().unwrap();
        assert_eq!(analysis.mate, Some(-4));
        // Black to move is getting mated: good for White
        assert!((analysis.evaluation - 19.6).abs() < 1e-9);
        // partial result without bestmove
        assert_eq!(analysis.best_move, None);
    }

    #[test]
    fn test_accumulator_without_score_fails() {
        let mut acc = SearchAccumulator::new(crate::types::START_FEN, 1);
        acc.feed(parse_line("info depth 1 currmove e2e4"));
        acc.feed(parse_line("bestmove e2e4"));
        assert!(matches!(acc.finish(), Err(AnalysisError::NoScore)));
    }

    #[test]
    fn test_bestmove_becomes_candidate_without_pv() {
        let mut acc = SearchAccumulator::new(crate::types::START_FEN, 3);
        acc.feed(parse_line("info depth 3 score cp 12"));
        acc.feed(parse_line("bestmove g1f3"));
        let analysis = acc.finish().unwrap();
        assert_eq!(analysis.variations.len(), 1);
        assert_eq!(analysis.variations[0].uci, "g1f3");
        assert_eq!(analysis.variations[0].line, "Nf3");
    }
}

//! Game analysis pipeline: engine evaluation of every position, per-side
//! style profiling and nearest-grandmaster matching.

pub mod analysis;
pub mod analyzer;
pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fallback;
pub mod matcher;
pub mod openings;
pub mod oracle;
pub mod playstyle;
pub mod stockfish;
pub mod types;
pub mod uci;

pub use analyzer::{Analyzer, EngineStatus};
pub use config::{AnalyzerConfig, EngineConfig, SearchLimits};
pub use error::AnalysisError;
pub use matcher::{find_match, MatchResult};
pub use oracle::{NoOracle, Oracle, OracleLauncher};
pub use playstyle::calculate_playstyle;
pub use stockfish::StockfishLauncher;
pub use types::{AnalysisResult, PositionAnalysis, StyleVector, TraitScores};

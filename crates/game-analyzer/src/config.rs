//! Analyzer configuration from environment variables

use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::AnalysisError;

/// Depth and wall-clock budget for one position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: u32,
    pub movetime: Duration,
}

impl SearchLimits {
    /// Quick pass: depth 12, 3 s per position
    pub fn shallow() -> Self {
        Self {
            depth: 12,
            movetime: Duration::from_millis(3_000),
        }
    }

    /// Deep pass: depth 20, 10 s per position
    pub fn deep() -> Self {
        Self {
            depth: 20,
            movetime: Duration::from_millis(10_000),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Bound on the uci/isready handshake
    pub init_timeout: Duration,

    /// How long to wait for `bestmove` after sending `stop`
    pub stop_grace: Duration,

    pub threads: u32,
    pub hash_mb: u32,

    /// Candidate continuations per position (1..=3)
    pub multipv: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stockfish_path: "/usr/local/bin/stockfish".to_string(),
            init_timeout: Duration::from_millis(5_000),
            stop_grace: Duration::from_millis(1_000),
            threads: 1,
            hash_mb: 64,
            multipv: 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    pub engine: EngineConfig,
    pub limits: SearchLimits,
}

impl AnalyzerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, AnalysisError> {
        let defaults = EngineConfig::default();

        let stockfish_path = env::var("STOCKFISH_PATH").unwrap_or(defaults.stockfish_path);

        let mut limits = match env::var("ANALYSIS_MODE").ok().as_deref() {
            None | Some("shallow") => SearchLimits::shallow(),
            Some("deep") => SearchLimits::deep(),
            Some(_) => return Err(AnalysisError::Config("ANALYSIS_MODE must be shallow or deep")),
        };
        if let Some(depth) = parse_var("ANALYSIS_DEPTH", "ANALYSIS_DEPTH must be a positive integer")? {
            limits.depth = depth;
        }
        if let Some(ms) = parse_var("ANALYSIS_TIMEOUT_MS", "ANALYSIS_TIMEOUT_MS must be a positive integer")? {
            limits.movetime = Duration::from_millis(ms as u64);
        }

        let init_timeout = parse_var("ENGINE_INIT_TIMEOUT_MS", "ENGINE_INIT_TIMEOUT_MS must be a positive integer")?
            .map(|ms| Duration::from_millis(ms as u64))
            .unwrap_or(defaults.init_timeout);

        let stop_grace = parse_var("ENGINE_STOP_GRACE_MS", "ENGINE_STOP_GRACE_MS must be a positive integer")?
            .map(|ms| Duration::from_millis(ms as u64))
            .unwrap_or(defaults.stop_grace);

        let threads = parse_var("ENGINE_THREADS", "ENGINE_THREADS must be a positive integer")?
            .unwrap_or(defaults.threads);

        let hash_mb = parse_var("ENGINE_HASH_MB", "ENGINE_HASH_MB must be a positive integer")?
            .unwrap_or(defaults.hash_mb);

        let multipv = parse_var("ENGINE_MULTIPV", "ENGINE_MULTIPV must be a positive integer")?
            .unwrap_or(defaults.multipv)
            .clamp(1, 3);

        info!(
            stockfish_path = %stockfish_path,
            depth = limits.depth,
            movetime_ms = limits.movetime.as_millis() as u64,
            "Analyzer config loaded"
        );

        Ok(Self {
            engine: EngineConfig {
                stockfish_path,
                init_timeout,
                stop_grace,
                threads,
                hash_mb,
                multipv,
            },
            limits,
        })
    }
}

/// Read an optional positive integer variable.
fn parse_var(name: &str, message: &'static str) -> Result<Option<u32>, AnalysisError> {
    match env::var(name) {
        Err(_) => Ok(None),
        Ok(raw) => match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => Err(AnalysisError::Config(message)),
        },
    }
}

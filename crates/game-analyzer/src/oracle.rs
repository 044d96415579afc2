//! Evaluation oracle contract.
//!
//! The analyzer owns one oracle at a time and never issues two requests to it
//! concurrently: every method takes `&mut self`.

use crate::config::SearchLimits;
use crate::error::AnalysisError;
use crate::types::PositionAnalysis;

/// A position evaluator reached through request/response.
#[allow(async_fn_in_trait)]
pub trait Oracle {
    /// Evaluate `fen` within `limits`. Evaluations are from White's perspective.
    async fn evaluate(
        &mut self,
        fen: &str,
        limits: SearchLimits,
    ) -> Result<PositionAnalysis, AnalysisError>;

    /// Tear the oracle down. Must leave no process behind.
    async fn shutdown(&mut self);
}

/// Creates oracles on demand.
#[allow(async_fn_in_trait)]
pub trait OracleLauncher {
    type Oracle: Oracle;

    /// Start and initialize a new oracle; `EngineUnavailable` when it cannot be.
    async fn launch(&self) -> Result<Self::Oracle, AnalysisError>;
}

/// Launcher that never produces an oracle; forces the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOracle;

/// Oracle type of [`NoOracle`]; cannot be constructed.
#[derive(Debug)]
pub enum Unreachable {}

impl Oracle for Unreachable {
    async fn evaluate(
        &mut self,
        _fen: &str,
        _limits: SearchLimits,
    ) -> Result<PositionAnalysis, AnalysisError> {
        match *self {}
    }

    async fn shutdown(&mut self) {
        match *self {}
    }
}

impl OracleLauncher for NoOracle {
    type Oracle = Unreachable;

    async fn launch(&self) -> Result<Self::Oracle, AnalysisError> {
        Err(AnalysisError::EngineUnavailable("engine disabled".to_string()))
    }
}

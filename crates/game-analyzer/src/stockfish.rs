//! Stockfish engine wrapper using UCI protocol (async I/O)

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::{timeout, timeout_at, Instant};

use tracing::{debug, info, warn};

use crate::config::{EngineConfig, SearchLimits};
use crate::error::AnalysisError;
use crate::oracle::{Oracle, OracleLauncher};
use crate::types::PositionAnalysis;
use crate::uci::{parse_line, EngineReport, SearchAccumulator};

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    config: EngineConfig,
    /// A stopped search whose `bestmove` has not been read yet
    pending_bestmove: bool,
    /// Set once the engine ignored `stop`; every later request fails fast
    wedged: bool,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(config: &EngineConfig) -> Result<Self, AnalysisError> {
        let mut process = Command::new(&config.stockfish_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AnalysisError::EngineUnavailable(format!("Failed to spawn Stockfish: {e}"))
            })?;

        let stdin = process.stdin.take().ok_or_else(|| {
            AnalysisError::EngineUnavailable("Stockfish stdin unavailable".to_string())
        })?;
        let stdout = process.stdout.take().ok_or_else(|| {
            AnalysisError::EngineUnavailable("Stockfish stdout unavailable".to_string())
        })?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            config: config.clone(),
            pending_bestmove: false,
            wedged: false,
        };

        match timeout(config.init_timeout, engine.handshake()).await {
            Ok(Ok(())) => {
                info!(path = %config.stockfish_path, "Stockfish ready");
                Ok(engine)
            }
            Ok(Err(e)) => {
                engine.quit().await;
                Err(AnalysisError::EngineUnavailable(e.to_string()))
            }
            Err(_) => {
                engine.quit().await;
                Err(AnalysisError::EngineUnavailable(
                    "Stockfish initialization timed out".to_string(),
                ))
            }
        }
    }

    async fn handshake(&mut self) -> Result<(), AnalysisError> {
        self.send("uci").await?;
        self.wait_for("uciok").await?;

        // Configure for analysis
        self.send("setoption name UCI_Chess960 value false").await?;
        self.send("setoption name UCI_AnalyseMode value true").await?;
        self.send("setoption name UCI_LimitStrength value false").await?;
        self.send(&format!("setoption name Threads value {}", self.config.threads))
            .await?;
        self.send(&format!("setoption name Hash value {}", self.config.hash_mb))
            .await?;
        self.send(&format!("setoption name MultiPV value {}", self.config.multipv))
            .await?;
        self.send("isready").await?;
        self.wait_for("readyok").await
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), AnalysisError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| AnalysisError::Engine(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AnalysisError::Engine(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Read the next line; cancel-safe so it can sit under a timeout
    async fn read_line(&mut self) -> Result<String, AnalysisError> {
        let line = self
            .stdout
            .next_line()
            .await
            .map_err(|e| AnalysisError::Engine(format!("Failed to read from Stockfish: {e}")))?
            .ok_or_else(|| AnalysisError::Engine("Stockfish closed its output".to_string()))?;
        debug!(line = line.trim(), "SF >");
        Ok(line)
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), AnalysisError> {
        loop {
            let line = self.read_line().await?;
            if line.trim() == expected {
                return Ok(());
            }
        }
    }

    /// Discard output until the `bestmove` of an earlier stopped search.
    async fn drain_pending(&mut self) -> Result<(), AnalysisError> {
        let deadline = Instant::now() + self.config.stop_grace;
        loop {
            match timeout_at(deadline, self.read_line()).await {
                Ok(line) => {
                    if let EngineReport::BestMove(_) = parse_line(&line?) {
                        self.pending_bestmove = false;
                        return Ok(());
                    }
                }
                Err(_) => {
                    warn!("Stockfish never answered stop, killing it");
                    self.wedged = true;
                    let _ = self.process.start_kill();
                    return Err(AnalysisError::Engine(
                        "Stockfish did not answer stop".to_string(),
                    ));
                }
            }
        }
    }

    /// Evaluate a position; on timeout stop the search and keep the partial result
    pub async fn search(
        &mut self,
        fen: &str,
        limits: SearchLimits,
    ) -> Result<PositionAnalysis, AnalysisError> {
        if self.wedged {
            return Err(AnalysisError::Engine("Stockfish is unresponsive".to_string()));
        }
        if self.pending_bestmove {
            self.drain_pending().await?;
        }

        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!(
            "go depth {} movetime {}",
            limits.depth,
            limits.movetime.as_millis()
        ))
        .await?;

        let mut acc = SearchAccumulator::new(fen, self.config.multipv);

        let deadline = Instant::now() + limits.movetime;
        loop {
            match timeout_at(deadline, self.read_line()).await {
                Ok(line) => {
                    if acc.feed(parse_line(&line?)) {
                        return acc.finish();
                    }
                }
                Err(_) => break,
            }
        }

        warn!(fen, "Analysis timed out, stopping engine");
        self.send("stop").await?;

        let grace = Instant::now() + self.config.stop_grace;
        loop {
            match timeout_at(grace, self.read_line()).await {
                Ok(line) => {
                    if acc.feed(parse_line(&line?)) {
                        break;
                    }
                }
                Err(_) => {
                    self.pending_bestmove = true;
                    break;
                }
            }
        }

        acc.finish()
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        if timeout(self.config.stop_grace, self.process.wait()).await.is_err() {
            let _ = self.process.kill().await;
        }
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

impl Oracle for StockfishEngine {
    async fn evaluate(
        &mut self,
        fen: &str,
        limits: SearchLimits,
    ) -> Result<PositionAnalysis, AnalysisError> {
        self.search(fen, limits).await
    }

    async fn shutdown(&mut self) {
        self.quit().await;
    }
}

/// Spawns a fresh [`StockfishEngine`] per launch
#[derive(Debug, Clone)]
pub struct StockfishLauncher {
    pub config: EngineConfig,
}

impl StockfishLauncher {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl OracleLauncher for StockfishLauncher {
    type Oracle = StockfishEngine;

    async fn launch(&self) -> Result<StockfishEngine, AnalysisError> {
        StockfishEngine::new(&self.config).await
    }
}

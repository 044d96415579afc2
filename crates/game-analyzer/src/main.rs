//! analyze-game: run one PGN through the engine, profile a side and match it
//! against the grandmaster catalog.
//!
//! Usage: analyze-game <game.pgn> [--side white|black] [--deep] [--fallback]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use chess_core::{pgn::parse_pgn, Move, Side};
use serde_json::json;
use tracing::{info, warn};

use game_analyzer::catalog::GRANDMASTERS;
use game_analyzer::playstyle::profile_side;
use game_analyzer::{
    find_match, AnalysisError, AnalysisResult, Analyzer, AnalyzerConfig, NoOracle,
    OracleLauncher, SearchLimits, StockfishLauncher,
};

struct CliArgs {
    pgn_path: String,
    side: Side,
    deep: bool,
    fallback: bool,
}

/// Parse positional path plus --side/--deep/--fallback
fn parse_args() -> anyhow::Result<CliArgs> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut pgn_path = None;
    let mut side = Side::White;
    let mut deep = false;
    let mut fallback = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--side" => {
                let value = args.get(i + 1).context("--side needs white or black")?;
                side = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid side: {value}"))?;
                i += 1;
            }
            "--deep" => deep = true,
            "--fallback" => fallback = true,
            other if other.starts_with("--") => bail!("unknown flag: {other}"),
            other => pgn_path = Some(other.to_string()),
        }
        i += 1;
    }

    let Some(pgn_path) = pgn_path else {
        bail!("usage: analyze-game <game.pgn> [--side white|black] [--deep] [--fallback]");
    };

    Ok(CliArgs {
        pgn_path,
        side,
        deep,
        fallback,
    })
}

async fn run_analysis<L: OracleLauncher>(
    mut analyzer: Analyzer<L>,
    moves: &[Move],
    limits: SearchLimits,
    cancelled: Arc<AtomicBool>,
) -> Result<AnalysisResult, AnalysisError> {
    let mut last_decile = None;
    let result = analyzer
        .analyze_game(
            moves,
            limits,
            |percent| {
                let decile = (percent / 10.0) as u32;
                if last_decile != Some(decile) {
                    last_decile = Some(decile);
                    info!(percent = percent.round() as u32, "Analyzing");
                }
            },
            || cancelled.load(Ordering::Relaxed),
        )
        .await;
    analyzer.shutdown().await;
    result
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv();

    let args = parse_args()?;
    let config = AnalyzerConfig::load()?;
    let limits = if args.deep {
        SearchLimits::deep()
    } else {
        config.limits
    };

    let pgn = std::fs::read_to_string(&args.pgn_path)
        .with_context(|| format!("reading {}", args.pgn_path))?;
    let game = parse_pgn(&pgn)?;
    info!(
        white = %game.metadata.white,
        black = %game.metadata.black,
        plies = game.moves.len(),
        "Game loaded"
    );

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = cancelled.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling analysis");
                cancelled.store(true, Ordering::Relaxed);
            }
        });
    }

    let result = if args.fallback {
        run_analysis(Analyzer::new(NoOracle), &game.moves, limits, cancelled).await
    } else {
        let launcher = StockfishLauncher::new(config.engine.clone());
        run_analysis(Analyzer::new(launcher), &game.moves, limits, cancelled).await
    };

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(e) if e.is_cancelled() => {
            eprintln!("Analysis cancelled");
            std::process::exit(130);
        }
        Err(e) => return Err(e.into()),
    };

    let report = profile_side(&game.moves, &analysis, args.side)?;
    let matched = find_match(&report.style, &GRANDMASTERS)?;
    info!(
        side = %args.side,
        archetype = report.archetype.name(),
        grandmaster = %matched.name,
        similarity = matched.similarity,
        "Playstyle matched"
    );

    let output = json!({
        "game": game.metadata,
        "side": args.side,
        "analysis": analysis,
        "playstyle": report.style,
        "archetype": report.archetype,
        "match": matched,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

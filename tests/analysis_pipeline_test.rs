//! Integration tests: the full walker -> profiler -> matcher pipeline against
//! a scripted engine.

mod common;

use std::sync::atomic::Ordering;

use chess_core::Side;
use game_analyzer::catalog::GRANDMASTERS;
use game_analyzer::fallback::analyze_without_engine;
use game_analyzer::types::{AnalysisSource, ENDGAME_NOT_REACHED, START_FEN};
use game_analyzer::{
    calculate_playstyle, find_match, AnalysisError, Analyzer, EngineStatus, NoOracle,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use common::{assert_result_invariants, limits, moves, ScriptedLauncher, OPERA_GAME};

#[tokio::test]
async fn test_short_game_end_to_end() {
    let game = moves(&["e4", "e5", "Nf3", "Nc6"]);
    let launcher = ScriptedLauncher::new();
    let state = launcher.state.clone();
    let mut analyzer = Analyzer::new(launcher);

    let mut progress = Vec::new();
    let result = analyzer
        .analyze_game(&game, limits(), |p| progress.push(p), || false)
        .await
        .unwrap();

    assert_eq!(result.positions.len(), 5);
    assert_eq!(result.source, AnalysisSource::Engine);
    assert_eq!(result.positions[0].fen, START_FEN);
    assert_eq!(result.positions[0].evaluation, 0.0);
    assert_eq!(result.positions[0].depth, 0);
    assert_eq!(result.evaluations(), vec![0.0, -0.1, 0.2, -0.1, 0.2]);
    assert_eq!(result.positions[1].depth, 12);

    for side in [Side::White, Side::Black] {
        assert_eq!(result.mistakes.get(side), 0);
        assert_eq!(result.blunders.get(side), 0);
    }
    assert_eq!(progress, vec![0.0, 25.0, 50.0, 75.0]);
    assert_eq!(state.evaluations(), 4);
    assert_result_invariants(&result, &game);

    let style = calculate_playstyle(&game, &result, Side::White).unwrap();
    assert_eq!(style.traits.endgame, ENDGAME_NOT_REACHED);
    let matched = find_match(&style, &GRANDMASTERS).unwrap();
    assert!(GRANDMASTERS.iter().any(|gm| gm.id == matched.id));

    // The engine stays up between games
    assert!(state.is_running());
    analyzer.shutdown().await;
    assert!(!state.is_running());
}

#[tokio::test]
async fn test_cancellation_stops_and_tears_down_engine() {
    let game = moves(&OPERA_GAME);
    let launcher = ScriptedLauncher::new();
    let state = launcher.state.clone();
    let mut analyzer = Analyzer::new(launcher);

    let cancel_after = 5;
    let result = analyzer
        .analyze_game(
            &game,
            limits(),
            |_| {},
            || state.evaluations() >= cancel_after,
        )
        .await;

    assert!(matches!(result, Err(AnalysisError::Cancelled)));
    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(state.evaluations(), cancel_after);
    assert!(!state.is_running());
    assert_eq!(state.shutdowns.load(Ordering::SeqCst), 1);
    assert!(!analyzer.is_ready());
}

#[tokio::test]
async fn test_engine_fault_is_substituted_and_engine_relaunched() {
    let game = moves(&["e4", "d5", "exd5", "Qxd5"]);
    let launcher = ScriptedLauncher::failing_at(2);
    let state = launcher.state.clone();
    let mut analyzer = Analyzer::new(launcher);

    let result = analyzer
        .analyze_game(&game, limits(), |_| {}, || false)
        .await
        .unwrap();

    assert_result_invariants(&result, &game);
    // exd5 wins a pawn: material balance stands in for the failed search
    assert_eq!(result.positions[3].evaluation, 1.0);
    assert_eq!(result.positions[3].depth, 1);
    assert!(result.positions[3].best_move.is_none());
    assert_eq!(result.positions[4].evaluation, 0.2);
    assert!(!state.is_running());

    analyzer
        .analyze_game(&game, limits(), |_| {}, || false)
        .await
        .unwrap();
    assert_eq!(state.launches(), 2);
}

#[tokio::test]
async fn test_illegal_move_rejected_before_engine_starts() {
    let mut game = moves(&["e4", "e5", "Nf3"]);
    game[2].to = "f6".to_string();
    let launcher = ScriptedLauncher::new();
    let state = launcher.state.clone();
    let mut analyzer = Analyzer::new(launcher);

    let result = analyzer.analyze_game(&game, limits(), |_| {}, || false).await;
    assert!(matches!(result, Err(AnalysisError::IllegalMove { index: 2, .. })));

    let result = analyzer.analyze_game(&[], limits(), |_| {}, || false).await;
    assert!(matches!(result, Err(AnalysisError::EmptyGame)));
    assert_eq!(state.launches(), 0);
}

#[tokio::test]
async fn test_full_game_profiles_both_sides() {
    let game = moves(&OPERA_GAME);
    let mut analyzer = Analyzer::new(ScriptedLauncher::new());
    let result = analyzer
        .analyze_game(&game, limits(), |_| {}, || false)
        .await
        .unwrap();
    assert_result_invariants(&result, &game);

    for side in [Side::White, Side::Black] {
        let first = calculate_playstyle(&game, &result, side).unwrap();
        let second = calculate_playstyle(&game, &result, side).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.traits.endgame, ENDGAME_NOT_REACHED);
        for value in &first.traits.as_array()[..5] {
            assert!(*value >= 0.1);
        }
        assert_eq!(
            find_match(&first, &GRANDMASTERS).unwrap(),
            find_match(&second, &GRANDMASTERS).unwrap()
        );
    }
}

#[tokio::test]
async fn test_shared_analyzer_serializes_requests() {
    let game = moves(&["d4", "d5", "c4"]);
    let launcher = ScriptedLauncher::new();
    let state = launcher.state.clone();
    let analyzer = Mutex::new(Analyzer::new(launcher));
    let (analyzer, game) = (&analyzer, &game);

    let run = || async move {
        let mut analyzer = analyzer.lock().await;
        analyzer.analyze_game(game, limits(), |_| {}, || false).await
    };
    let (first, second) = tokio::join!(run(), run());

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(state.launches(), 1);
    assert_eq!(state.evaluations(), 6);
}

#[tokio::test]
async fn test_unavailable_engine_uses_fallback() {
    let game = moves(&OPERA_GAME);
    let mut analyzer = Analyzer::new(NoOracle);
    assert_eq!(analyzer.init_engine().await, EngineStatus::Unavailable);

    let result = analyzer
        .analyze_game(&game, limits(), |_| {}, || false)
        .await
        .unwrap();
    assert_eq!(result.source, AnalysisSource::Fallback);
    assert_result_invariants(&result, &game);
    // Rd8# saturates in White's favour
    assert_eq!(result.positions.last().unwrap().evaluation, 20.0);
}

#[test]
fn test_seeded_fallback_is_reproducible() {
    let game = moves(&OPERA_GAME);
    let first = analyze_without_engine(&game, |_| {}, || false, &mut StdRng::seed_from_u64(42))
        .unwrap();
    let second = analyze_without_engine(&game, |_| {}, || false, &mut StdRng::seed_from_u64(42))
        .unwrap();
    assert_eq!(first, second);
    assert_result_invariants(&first, &game);
    assert!(first.positions[1..].iter().all(|p| p.depth == 8));
}

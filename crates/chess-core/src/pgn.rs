//! PGN parsing utilities: lightweight regex-based parser.

use regex::Regex;

use crate::error::GameError;
use crate::game_data::{GameData, GameMetadata};
use crate::moves::replay_san;

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a PGN string into a GameData struct with replayed move records.
pub fn parse_pgn(pgn: &str) -> Result<GameData, GameError> {
    let header_re = Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("valid header regex");

    let mut metadata = GameMetadata {
        white: "Unknown".to_string(),
        black: "Unknown".to_string(),
        result: "*".to_string(),
        ..GameMetadata::default()
    };
    let mut setup = None;
    let mut fen = None;

    for cap in header_re.captures_iter(pgn) {
        let key = &cap[1];
        let value = cap[2].to_string();
        match key {
            "White" => metadata.white = value,
            "Black" => metadata.black = value,
            "Result" => metadata.result = value,
            "Date" => metadata.date = Some(value),
            "TimeControl" => metadata.time_control = Some(value),
            "ECO" => metadata.eco = Some(value),
            "Event" => metadata.event = Some(value),
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    // Only games from the standard start can be replayed
    if setup.as_deref() == Some("1") {
        if let Some(ref f) = fen {
            if f != STANDARD_START_FEN {
                return Err(GameError::NonStandardStart);
            }
        }
    }

    let san_moves = extract_moves(pgn);
    if san_moves.is_empty() {
        return Err(GameError::NoMoves);
    }

    let moves = replay_san(&san_moves)?;

    Ok(GameData {
        metadata,
        moves,
        pgn: pgn.to_string(),
    })
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
pub fn extract_moves(pgn: &str) -> Vec<String> {
    let header_re = Regex::new(r"\[[^\]]*\]").expect("valid regex");
    let no_headers = header_re.replace_all(pgn, "");

    let comment_re = Regex::new(r"\{[^}]*\}").expect("valid regex");
    let no_comments = comment_re.replace_all(&no_headers, "");

    let variation_re = Regex::new(r"\([^)]*\)").expect("valid regex");
    let no_variations = variation_re.replace_all(&no_comments, "");

    let move_re =
        Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O[+#]?|O-O[+#]?")
            .expect("valid regex");

    move_re
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

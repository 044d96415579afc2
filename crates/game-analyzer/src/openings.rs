//! Opening repertoire labels from the first plies of a game.

use chess_core::{Move, Side};

/// Plies of movetext scanned for a known opening
pub const OPENING_PLIES: usize = 12;

const WHITE_OPENINGS: &[(&str, &[&str])] = &[
    ("e4 e5", &["Open Game", "Italian Game", "Ruy Lopez"]),
    ("e4 c5", &["Sicilian Defense (as White)"]),
    ("d4 d5", &["Queen's Gambit", "Closed Games"]),
    ("d4 Nf6", &["Indian Defense Systems (as White)"]),
    ("c4", &["English Opening"]),
    ("Nf3", &["Reti Opening", "Flexible Systems"]),
];

const BLACK_OPENINGS: &[(&str, &[&str])] = &[
    ("e4 e5", &["Open Game (as Black)", "Two Knights Defense"]),
    ("e4 c5", &["Sicilian Defense"]),
    ("e4 e6", &["French Defense"]),
    ("e4 c6", &["Caro-Kann Defense"]),
    ("d4 d5", &["Queen's Gambit Declined", "Slav Defense"]),
    ("d4 Nf6", &["Indian Defense", "King's Indian", "Nimzo-Indian"]),
];

const WHITE_DEFAULT: &str = "Flexible Opening Repertoire";
const BLACK_DEFAULT: &str = "Flexible Defense Repertoire";

/// Label the repertoire `side` played in this game.
///
/// First substring hit in table order wins.
pub fn detect_openings(moves: &[Move], side: Side) -> Vec<String> {
    let text = moves
        .iter()
        .take(OPENING_PLIES)
        .map(|m| m.san.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let (table, default) = match side {
        Side::White => (WHITE_OPENINGS, WHITE_DEFAULT),
        Side::Black => (BLACK_OPENINGS, BLACK_DEFAULT),
    };

    table
        .iter()
        .find(|(pattern, _)| text.contains(pattern))
        .map(|(_, names)| names.iter().map(|n| n.to_string()).collect())
        .unwrap_or_else(|| vec![default.to_string()])
}

use serde::{Deserialize, Serialize};

use crate::moves::Move;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub date: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub event: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub metadata: GameMetadata,
    pub moves: Vec<Move>,
    pub pgn: String,
}

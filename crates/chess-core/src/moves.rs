//! Move records produced by replaying SAN through shakmaty.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::{san::San, Chess, Color, File, Move as ShakMove, Position, Role, Square};

use crate::error::GameError;

/// Side to move. White is the fixed reference side for every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Side::White),
            "black" | "b" => Ok(Side::Black),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase UCI promotion letter.
    pub fn uci_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

impl From<Role> for PieceKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// One ply of a validated game. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// 0-based ply index
    pub index: usize,
    pub side: Side,
    pub piece: PieceKind,
    /// Origin square, e.g. "g1"
    pub from: String,
    /// Destination square; the king's destination for castling
    pub to: String,
    pub captured: Option<PieceKind>,
    pub en_passant: bool,
    pub promotion: Option<PieceKind>,
    /// Gives check without mating
    pub check: bool,
    pub checkmate: bool,
    pub castle: Option<CastleSide>,
    /// SAN including the `+` / `#` suffix
    pub san: String,
}

impl Move {
    /// 1-based full-move number.
    pub fn move_number(&self) -> usize {
        self.index / 2 + 1
    }

    /// UCI notation (king-to-destination castling), e.g. "e1g1", "e7e8q".
    pub fn uci(&self) -> String {
        let mut uci = format!("{}{}", self.from, self.to);
        if let Some(promo) = self.promotion {
            uci.push(promo.uci_char());
        }
        uci
    }
}

/// Replay SAN moves from the standard starting position into move records.
///
/// Results tokens ("1-0", "*", ...) and empty strings are skipped.
pub fn replay_san<S: AsRef<str>>(san_moves: &[S]) -> Result<Vec<Move>, GameError> {
    let mut pos = Chess::default();
    let mut moves = Vec::with_capacity(san_moves.len());

    for san_str in san_moves {
        let san_str = san_str.as_ref().trim();
        if san_str.is_empty() || matches!(san_str, "1-0" | "0-1" | "1/2-1/2" | "*") {
            continue;
        }
        let ply = moves.len();

        let san: San = san_str.parse().map_err(|e| GameError::InvalidSan {
            ply,
            san: san_str.to_string(),
            reason: format!("{e}"),
        })?;

        let mv = san.to_move(&pos).map_err(|e| GameError::IllegalMove {
            ply,
            san: san_str.to_string(),
            reason: format!("{e}"),
        })?;

        let side = Side::from(pos.turn());
        let canonical = San::from_move(&pos, mv.clone()).to_string();
        let mut record = describe_move(&mv, ply, side).ok_or(GameError::UnsupportedMove(ply))?;

        pos.play_unchecked(mv);

        record.checkmate = pos.is_checkmate();
        record.check = !record.checkmate && pos.is_check();
        record.san = if record.checkmate {
            format!("{canonical}#")
        } else if record.check {
            format!("{canonical}+")
        } else {
            canonical
        };

        moves.push(record);
    }

    Ok(moves)
}

fn describe_move(mv: &ShakMove, index: usize, side: Side) -> Option<Move> {
    let blank = |piece: PieceKind, from: Square, to: Square| Move {
        index,
        side,
        piece,
        from: from.to_string(),
        to: to.to_string(),
        captured: None,
        en_passant: false,
        promotion: None,
        check: false,
        checkmate: false,
        castle: None,
        san: String::new(),
    };

    match mv {
        ShakMove::Normal {
            role,
            from,
            capture,
            to,
            promotion,
        } => {
            let mut record = blank(PieceKind::from(*role), *from, *to);
            record.captured = capture.map(PieceKind::from);
            record.promotion = promotion.map(PieceKind::from);
            Some(record)
        }
        ShakMove::EnPassant { from, to } => {
            let mut record = blank(PieceKind::Pawn, *from, *to);
            record.captured = Some(PieceKind::Pawn);
            record.en_passant = true;
            Some(record)
        }
        ShakMove::Castle { king, rook } => {
            // shakmaty encodes castling as king-takes-rook
            let (file, castle) = if rook.file() > king.file() {
                (File::G, CastleSide::Kingside)
            } else {
                (File::C, CastleSide::Queenside)
            };
            let mut record = blank(
                PieceKind::King,
                *king,
                Square::from_coords(file, king.rank()),
            );
            record.castle = Some(castle);
            Some(record)
        }
        _ => None,
    }
}

//! Style profiling: turns an analyzed game into a six-trait style vector
//! for one side.
//!
//! Every trait starts at 1.0 and loses `1 / moves_by_side` for each move that
//! ceded evaluation, depending on the move's context. The raw vector is then
//! scaled by one of eight archetypes picked from a signature of the game, so
//! the result is deterministic for a given game, trace and side.

use chess_core::{Move, PieceKind, Side};
use serde::Serialize;
use tracing::debug;

use crate::analysis::mover_delta;
use crate::error::AnalysisError;
use crate::openings::detect_openings;
use crate::types::{AnalysisResult, StyleVector, TraitScores, ENDGAME_NOT_REACHED};

/// Half-moves the whole game must last for the endgame trait to count
pub const ENDGAME_PLIES: usize = 60;

/// Move numbers before this count as opening play for the positional trait
const OPENING_MOVE_NUMBER: usize = 15;
/// Move numbers after this count as endgame play
const ENDGAME_MOVE_NUMBER: usize = 30;
/// Ceding more than this also costs risk-taking
const RISKY_SWING: f64 = 0.8;
/// Material sacrifice: a drop worse than this...
const SACRIFICE_DROP: f64 = 1.0;
/// ...answered on the next ply by a gain better than this
const SACRIFICE_RECOVERY: f64 = 0.5;
/// Smallest non-sentinel trait value reported
const TRAIT_FLOOR: f64 = 0.1;

const CENTER_SQUARES: [&str; 4] = ["e4", "d4", "e5", "d5"];

/// Multiplier sets applied to the raw traits, selected by game signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    AggressiveAttacker,
    Positional,
    Universal,
    Tactical,
    DefensiveSpecialist,
    Classical,
    Dynamic,
    SolidTechnical,
}

impl Archetype {
    /// Signature order: `signature % 8` indexes this table
    pub const ALL: [Archetype; 8] = [
        Archetype::AggressiveAttacker,
        Archetype::Positional,
        Archetype::Universal,
        Archetype::Tactical,
        Archetype::DefensiveSpecialist,
        Archetype::Classical,
        Archetype::Dynamic,
        Archetype::SolidTechnical,
    ];

    pub fn from_signature(signature: u64) -> Self {
        Self::ALL[(signature % Self::ALL.len() as u64) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::AggressiveAttacker => "Aggressive Attacker",
            Archetype::Positional => "Positional Player",
            Archetype::Universal => "Universal Player",
            Archetype::Tactical => "Tactical Genius",
            Archetype::DefensiveSpecialist => "Defensive Specialist",
            Archetype::Classical => "Classical Player",
            Archetype::Dynamic => "Dynamic Player",
            Archetype::SolidTechnical => "Solid Technical Player",
        }
    }

    /// Per-trait multipliers, in trait order
    pub fn multipliers(self) -> TraitScores {
        match self {
            Archetype::AggressiveAttacker => TraitScores::new(1.2, 0.9, 1.1, 0.8, 1.3, 0.9),
            Archetype::Positional => TraitScores::new(0.8, 1.2, 0.9, 1.2, 0.7, 1.1),
            Archetype::Universal => TraitScores::new(0.95, 1.1, 1.05, 1.1, 0.9, 1.2),
            Archetype::Tactical => TraitScores::new(1.05, 1.05, 1.2, 0.95, 1.0, 1.1),
            Archetype::DefensiveSpecialist => TraitScores::new(0.8, 1.1, 0.9, 1.3, 0.7, 1.05),
            Archetype::Classical => TraitScores::new(0.8, 1.2, 0.95, 1.1, 0.7, 1.2),
            Archetype::Dynamic => TraitScores::new(1.1, 1.05, 1.1, 0.9, 1.1, 0.95),
            Archetype::SolidTechnical => TraitScores::new(0.85, 1.1, 1.05, 1.1, 0.8, 1.1),
        }
    }

    /// Scale raw traits element-wise; the endgame sentinel passes through.
    pub fn apply(self, raw: TraitScores) -> TraitScores {
        let factors = self.multipliers().as_array();
        let mut values = raw.as_array();
        for (value, factor) in values.iter_mut().zip(factors) {
            *value *= factor;
        }
        let mut scaled = TraitScores::from_array(values);
        if !raw.endgame_reached() {
            scaled.endgame = ENDGAME_NOT_REACHED;
        }
        scaled
    }
}

/// Features of one side's moves that pick the archetype and steer penalties
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleCounters {
    pub moves: u32,
    pub captures: u32,
    pub checks: u32,
    /// Indexed by piece: pawn, knight, bishop, rook, queen, king
    pub piece_moves: [u32; 6],
    pub center_control: u32,
    pub castled: bool,
    pub developed_pieces: u32,
    pub attacking_moves: u32,
    pub defensive_moves: u32,
    pub material_sacrifices: u32,
}

impl StyleCounters {
    pub fn signature(&self) -> u64 {
        u64::from(self.moves) * 13
            + u64::from(self.captures) * 17
            + u64::from(self.checks) * 19
            + if self.castled { 23 } else { 0 }
            + u64::from(self.developed_pieces) * 29
            + u64::from(self.material_sacrifices) * 31
    }

    fn record(&mut self, mv: &Move) {
        self.moves += 1;
        self.piece_moves[piece_index(mv.piece)] += 1;

        if develops_minor_piece(mv) {
            self.developed_pieces += 1;
        }
        if mv.captured.is_some() {
            self.captures += 1;
        }
        if mv.check {
            self.checks += 1;
        }
        if is_plain_castle(mv) {
            self.castled = true;
        }
        if CENTER_SQUARES.contains(&mv.to.as_str()) {
            self.center_control += 1;
        }

        if mv.captured.is_some() || mv.check || mv.checkmate {
            self.attacking_moves += 1;
        } else if is_plain_castle(mv) || mv.piece == PieceKind::King {
            self.defensive_moves += 1;
        }
    }
}

/// Style vector plus the intermediate data that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleReport {
    pub style: StyleVector,
    pub archetype: Archetype,
    pub counters: StyleCounters,
}

/// Compute the style vector of `side` in this game.
pub fn calculate_playstyle(
    moves: &[Move],
    analysis: &AnalysisResult,
    side: Side,
) -> Result<StyleVector, AnalysisError> {
    profile_side(moves, analysis, side).map(|report| report.style)
}

/// Like [`calculate_playstyle`], keeping the archetype and counters.
pub fn profile_side(
    moves: &[Move],
    analysis: &AnalysisResult,
    side: Side,
) -> Result<StyleReport, AnalysisError> {
    let side_moves = moves.iter().filter(|m| m.side == side).count();
    if side_moves == 0 {
        return Err(AnalysisError::NoMovesForSide(side));
    }
    let penalty = 1.0 / side_moves as f64;

    let positions = &analysis.positions;
    let mut raw = TraitScores::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
    let mut counters = StyleCounters::default();
    let mut prev_eval = positions.first().map_or(0.0, |p| p.evaluation);

    for (i, mv) in moves.iter().enumerate() {
        if mv.side != side {
            continue;
        }
        let move_number = mv.move_number();

        if let Some(current) = positions.get(i + 1).map(|p| p.evaluation) {
            let change = mover_delta(current - prev_eval, side);

            if change < -SACRIFICE_DROP {
                if let Some(next) = positions.get(i + 2) {
                    if mover_delta(next.evaluation - current, side) > SACRIFICE_RECOVERY {
                        counters.material_sacrifices += 1;
                    }
                }
            }

            if change < 0.0 {
                raw.tactical -= penalty;
                if mv.piece == PieceKind::Pawn
                    || counters.center_control > 0
                    || move_number < OPENING_MOVE_NUMBER
                {
                    raw.positional -= penalty;
                }
                let plain_capture = mv.captured.is_some() && !mv.en_passant;
                if mv.check || plain_capture || counters.defensive_moves > 0 {
                    raw.defensive -= penalty;
                }
                if counters.attacking_moves > 0 || mv.captured.is_some() {
                    raw.aggression -= penalty;
                }
                if change.abs() > RISKY_SWING {
                    raw.risk_taking -= penalty;
                }
                if move_number > ENDGAME_MOVE_NUMBER {
                    raw.endgame -= penalty;
                }
            }

            prev_eval = current;
        }

        counters.record(mv);
    }

    if moves.len() < ENDGAME_PLIES {
        raw.endgame = ENDGAME_NOT_REACHED;
    }

    let archetype = Archetype::from_signature(counters.signature());
    let traits = floor_traits(archetype.apply(raw));
    debug!(%side, ?archetype, ?counters, ?raw, "Playstyle computed");

    Ok(StyleReport {
        style: StyleVector {
            traits,
            opening_repertoire: detect_openings(moves, side),
        },
        archetype,
        counters,
    })
}

/// Lift low traits to the floor; the endgame sentinel is left alone.
fn floor_traits(traits: TraitScores) -> TraitScores {
    let reached = traits.endgame_reached();
    let mut floored = TraitScores::from_array(traits.as_array().map(|v| v.max(TRAIT_FLOOR)));
    if !reached {
        floored.endgame = ENDGAME_NOT_REACHED;
    }
    floored
}

fn piece_index(piece: PieceKind) -> usize {
    match piece {
        PieceKind::Pawn => 0,
        PieceKind::Knight => 1,
        PieceKind::Bishop => 2,
        PieceKind::Rook => 3,
        PieceKind::Queen => 4,
        PieceKind::King => 5,
    }
}

/// Knight or bishop leaving its home square
fn develops_minor_piece(mv: &Move) -> bool {
    let home_rank = match mv.side {
        Side::White => '1',
        Side::Black => '8',
    };
    let mut from = mv.from.chars();
    let (Some(file), Some(rank)) = (from.next(), from.next()) else {
        return false;
    };
    if rank != home_rank {
        return false;
    }
    match mv.piece {
        PieceKind::Knight => matches!(file, 'b' | 'g'),
        PieceKind::Bishop => matches!(file, 'c' | 'f'),
        _ => false,
    }
}

/// Castling that did not also give check
fn is_plain_castle(mv: &Move) -> bool {
    mv.castle.is_some() && !mv.check && !mv.checkmate
}

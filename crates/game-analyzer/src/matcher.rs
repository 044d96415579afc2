//! Nearest reference profile by weighted Manhattan distance.
//!
//! Selection is fully deterministic: near-ties are broken by a selector
//! derived from the query vector itself.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{ReferenceProfile, AVOID_WHEN_TIED};
use crate::error::AnalysisError;
use crate::types::{StyleVector, TraitScores};

/// aggression, positional, tactical, defensive, risk-taking, endgame
const TRAIT_WEIGHTS: [f64; 6] = [1.5, 1.5, 1.5, 1.2, 1.5, 1.3];

/// Entries scoring at least this share of the best similarity are candidates
const CANDIDATE_RATIO: f64 = 0.85;

/// Tie-break selector weights, in trait order
const SELECTOR_WEIGHTS: [f64; 6] = [10.0, 7.0, 5.0, 3.0, 11.0, 2.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileScore {
    pub id: String,
    pub name: String,
    /// `1 / (1 + distance)`, 1.0 for an exact match
    pub similarity: f64,
    /// Absolute per-trait difference to the query
    pub differences: TraitScores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: String,
    pub name: String,
    pub similarity: f64,
    /// Ids that were within reach of the best score, in rank order
    pub candidates: Vec<String>,
}

/// Weighted Manhattan distance. The endgame sentinel takes part as a number.
pub fn weighted_distance(a: &TraitScores, b: &TraitScores) -> f64 {
    a.as_array()
        .iter()
        .zip(b.as_array())
        .zip(TRAIT_WEIGHTS)
        .map(|((x, y), w)| w * (x - y).abs())
        .sum()
}

/// Score every catalog entry, best first. Equal scores keep catalog order.
pub fn rank_profiles(style: &StyleVector, catalog: &[ReferenceProfile]) -> Vec<ProfileScore> {
    let query = style.traits.as_array();
    let mut scores: Vec<ProfileScore> = catalog
        .iter()
        .map(|gm| {
            let distance = weighted_distance(&style.traits, &gm.style);
            let reference = gm.style.as_array();
            ProfileScore {
                id: gm.id.to_string(),
                name: gm.name.to_string(),
                similarity: 1.0 / (1.0 + distance),
                differences: TraitScores::from_array(std::array::from_fn(|i| {
                    (query[i] - reference[i]).abs()
                })),
            }
        })
        .collect();

    scores.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scores
}

/// Pick the catalog entry closest to `style`.
pub fn find_match(
    style: &StyleVector,
    catalog: &[ReferenceProfile],
) -> Result<MatchResult, AnalysisError> {
    let scores = rank_profiles(style, catalog);
    let best = scores.first().ok_or(AnalysisError::EmptyCatalog)?;

    let threshold = best.similarity * CANDIDATE_RATIO;
    let candidates: Vec<&ProfileScore> = scores
        .iter()
        .filter(|s| s.similarity >= threshold)
        .collect();

    let chosen = if candidates.len() > 1 {
        let fraction = selector_fraction(&style.traits);
        let picked = candidates[pick_index(fraction, candidates.len())];
        let others: Vec<&ProfileScore> = candidates
            .iter()
            .copied()
            .filter(|c| c.id != AVOID_WHEN_TIED)
            .collect();
        if picked.id == AVOID_WHEN_TIED && !others.is_empty() {
            others[pick_index(fraction, others.len())]
        } else {
            picked
        }
    } else {
        best
    };

    debug!(
        id = %chosen.id,
        similarity = chosen.similarity,
        candidates = candidates.len(),
        "Reference profile matched"
    );

    Ok(MatchResult {
        id: chosen.id.clone(),
        name: chosen.name.clone(),
        similarity: chosen.similarity,
        candidates: candidates.iter().map(|c| c.id.clone()).collect(),
    })
}

/// Fractional part of the weighted trait sum, in [0, 1)
fn selector_fraction(traits: &TraitScores) -> f64 {
    let sum: f64 = traits
        .as_array()
        .iter()
        .zip(SELECTOR_WEIGHTS)
        .map(|(v, w)| v * w)
        .sum();
    sum.rem_euclid(1.0)
}

fn pick_index(fraction: f64, len: usize) -> usize {
    ((fraction * len as f64).floor() as usize).min(len - 1)
}

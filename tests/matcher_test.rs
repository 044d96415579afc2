//! Integration tests: matching style vectors against reference catalogs.

use game_analyzer::catalog::{find_profile, ReferenceProfile, AVOID_WHEN_TIED, GRANDMASTERS};
use game_analyzer::matcher::rank_profiles;
use game_analyzer::{find_match, StyleVector, TraitScores};

fn style(traits: TraitScores) -> StyleVector {
    StyleVector {
        traits,
        opening_repertoire: vec!["Flexible Opening Repertoire".to_string()],
    }
}

fn fixture(id: &'static str, traits: TraitScores) -> ReferenceProfile {
    ReferenceProfile {
        id,
        name: id,
        years: "",
        description: "",
        style: traits,
        opening_repertoire: &[],
        achievements: &[],
        famous_game: "",
    }
}

/// Profiles spread far enough apart that an exact hit never ties
fn spread_catalog() -> Vec<ReferenceProfile> {
    vec![
        fixture("attacker", TraitScores::new(0.95, 0.3, 0.9, 0.2, 0.95, 0.4)),
        fixture("squeezer", TraitScores::new(0.2, 0.95, 0.4, 0.9, 0.1, 0.95)),
        fixture("balanced", TraitScores::new(0.6, 0.6, 0.6, 0.6, 0.6, 0.6)),
    ]
}

#[test]
fn test_exact_profile_matches_with_full_similarity() {
    let catalog = spread_catalog();
    for entry in &catalog {
        let result = find_match(&style(entry.style), &catalog).unwrap();
        assert_eq!(result.id, entry.id);
        assert_eq!(result.similarity, 1.0);
        assert_eq!(result.candidates, vec![entry.id.to_string()]);
    }
}

#[test]
fn test_every_grandmaster_is_reachable_or_tied() {
    for gm in &GRANDMASTERS {
        let result = find_match(&style(gm.style), &GRANDMASTERS).unwrap();
        assert!(result.candidates.contains(&gm.id.to_string()), "{}", gm.id);
        if result.candidates.len() == 1 {
            assert_eq!(result.id, gm.id);
        }
    }
}

#[test]
fn test_avoided_id_only_wins_alone() {
    let anand = find_profile(AVOID_WHEN_TIED).unwrap();
    let result = find_match(&style(anand.style), &GRANDMASTERS).unwrap();
    if result.candidates.len() > 1 {
        assert_ne!(result.id, AVOID_WHEN_TIED);
    }
}

#[test]
fn test_short_game_sentinel_still_matches() {
    let query = style(TraitScores::new(0.9, 0.6, 0.9, 0.5, 0.9, -1.0));
    let first = find_match(&query, &GRANDMASTERS).unwrap();
    let second = find_match(&query, &GRANDMASTERS).unwrap();
    assert_eq!(first, second);

    let ranked = rank_profiles(&query, &GRANDMASTERS);
    assert_eq!(ranked[0].id, first.candidates[0]);
    // The sentinel sits well below every reference endgame score
    assert!(ranked.iter().all(|s| s.differences.endgame > 1.69));
}

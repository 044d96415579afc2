//! Reference grandmaster profiles the matcher compares against.

use serde::Serialize;

use crate::types::TraitScores;

/// Id picked only when no other candidate is close enough
pub const AVOID_WHEN_TIED: &str = "anand";

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub years: &'static str,
    pub description: &'static str,
    pub style: TraitScores,
    pub opening_repertoire: &'static [&'static str],
    pub achievements: &'static [&'static str],
    pub famous_game: &'static str,
}

pub static GRANDMASTERS: [ReferenceProfile; 8] = [
    ReferenceProfile {
        id: "kasparov",
        name: "Garry Kasparov",
        years: "1963 - present",
        description: "Dynamic, aggressive player who dominated for two decades, \
            pairing deep strategy with relentless attacking play.",
        style: TraitScores::new(0.9, 0.8, 0.95, 0.7, 0.85, 0.8),
        opening_repertoire: &["Sicilian Defense", "King's Indian Defense", "Queen's Gambit"],
        achievements: &[
            "World Chess Champion (1985-2000)",
            "Peak rating of 2851",
            "Winner of 11 Chess Oscars",
        ],
        famous_game: "Kasparov vs. Topalov, Wijk aan Zee 1999",
    },
    ReferenceProfile {
        id: "carlsen",
        name: "Magnus Carlsen",
        years: "1990 - present",
        description: "Universal player at home in every phase, famous for grinding \
            small advantages into won endgames.",
        style: TraitScores::new(0.6, 0.95, 0.85, 0.9, 0.5, 0.98),
        opening_repertoire: &["Ruy Lopez", "Queen's Gambit", "English Opening"],
        achievements: &[
            "World Chess Champion (2013-2023)",
            "Highest classical rating in history (2882)",
            "Multiple-time World Rapid and Blitz Champion",
        ],
        famous_game: "Carlsen vs. Karjakin, World Championship 2016, Game 10",
    },
    ReferenceProfile {
        id: "tal",
        name: "Mikhail Tal",
        years: "1936 - 1992",
        description: "The Magician from Riga. Sacrificed material for the initiative \
            and thrived in the complications that followed.",
        style: TraitScores::new(0.98, 0.6, 0.98, 0.5, 0.98, 0.7),
        opening_repertoire: &["Sicilian Defense", "King's Indian Defense", "Nimzo-Indian Defense"],
        achievements: &[
            "World Chess Champion (1960-1961)",
            "Eight-time Soviet Champion",
            "Winner of many international tournaments",
        ],
        famous_game: "Tal vs. Botvinnik, World Championship 1960, Game 6",
    },
    ReferenceProfile {
        id: "capablanca",
        name: "José Raúl Capablanca",
        years: "1888 - 1942",
        description: "Clean positional style and flawless endgame technique; \
            rarely made a tactical error.",
        style: TraitScores::new(0.4, 0.98, 0.8, 0.95, 0.25, 0.98),
        opening_repertoire: &["Queen's Gambit", "Ruy Lopez", "Nimzo-Indian Defense"],
        achievements: &[
            "World Chess Champion (1921-1927)",
            "Unbeaten from 1916 to 1924",
            "One of the finest endgame players of all time",
        ],
        famous_game: "Capablanca vs. Marshall, New York 1918",
    },
    ReferenceProfile {
        id: "fischer",
        name: "Bobby Fischer",
        years: "1943 - 2008",
        description: "Precise and uncompromising, combining sharp tactics with deep \
            strategic understanding and opening innovation.",
        style: TraitScores::new(0.75, 0.9, 0.95, 0.85, 0.65, 0.95),
        opening_repertoire: &["Sicilian Defense", "Ruy Lopez", "King's Indian Defense"],
        achievements: &[
            "World Chess Champion (1972-1975)",
            "Won the Match of the Century against Boris Spassky",
            "6-0 Candidates match score against Taimanov",
        ],
        famous_game: "Fischer vs. Spassky, World Championship 1972, Game 6",
    },
    ReferenceProfile {
        id: "karpov",
        name: "Anatoly Karpov",
        years: "1951 - present",
        description: "Boa constrictor chess: accumulated small advantages and \
            denied any counterplay.",
        style: TraitScores::new(0.35, 0.98, 0.8, 0.95, 0.25, 0.95),
        opening_repertoire: &["Ruy Lopez", "Queen's Gambit", "Caro-Kann Defense"],
        achievements: &[
            "World Chess Champion (1975-1985)",
            "Over 160 first-place tournament finishes",
            "Five World Championship matches against Kasparov",
        ],
        famous_game: "Karpov vs. Kasparov, World Championship 1985, Game 16",
    },
    ReferenceProfile {
        id: "anand",
        name: "Viswanathan Anand",
        years: "1969 - present",
        description: "The Lightning Kid. A fast, balanced universal player known \
            for tactical sharpness and opening preparation.",
        style: TraitScores::new(0.45, 0.75, 0.95, 0.65, 0.4, 0.7),
        opening_repertoire: &["Sicilian Defense", "Queen's Gambit", "Ruy Lopez"],
        achievements: &[
            "World Chess Champion (2000-2002, 2007-2013)",
            "First Asian World Champion",
            "World Champion in tournament, match and knockout formats",
        ],
        famous_game: "Anand vs. Kramnik, World Championship 2008, Game 3",
    },
    ReferenceProfile {
        id: "kramnik",
        name: "Vladimir Kramnik",
        years: "1975 - present",
        description: "Solid and technical, with strong positional play, stubborn \
            defence and precise calculation.",
        style: TraitScores::new(0.45, 0.95, 0.85, 0.95, 0.4, 0.9),
        opening_repertoire: &["Berlin Defense", "Catalan Opening", "Queen's Gambit"],
        achievements: &[
            "World Chess Champion (2000-2007)",
            "Defeated Kasparov in the 2000 World Championship",
            "Unified the world title in 2006",
        ],
        famous_game: "Kramnik vs. Kasparov, World Championship 2000, Game 2",
    },
];

pub fn find_profile(id: &str) -> Option<&'static ReferenceProfile> {
    GRANDMASTERS.iter().find(|gm| gm.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = GRANDMASTERS.iter().map(|gm| gm.id).collect();
        assert_eq!(ids.len(), GRANDMASTERS.len());
        assert!(find_profile(AVOID_WHEN_TIED).is_some());
    }

    #[test]
    fn test_profiles_are_complete() {
        for gm in &GRANDMASTERS {
            assert!(gm.style.endgame_reached(), "{}", gm.id);
            assert!(gm.style.as_array().iter().all(|v| (0.0..=1.0).contains(v)));
            assert_eq!(gm.achievements.len(), 3);
            assert!(!gm.opening_repertoire.is_empty());
        }
        assert_eq!(find_profile("tal").map(|gm| gm.name), Some("Mikhail Tal"));
        assert!(find_profile("morphy").is_none());
    }
}

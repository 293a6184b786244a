//! Hoisted flag variants and the modifiers each one applies to a trip.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    JOLLY_ROGER_MULTIPLIER, MERMAID_CONSUMPTION_CHANCE, PARLEY_CATCH_OFFSET,
    PATRON_CONSUMPTION_CHANCE, SHARKS_FIN_BONUS_MS,
};

/// Flag hoisted on the trawler for a trip. Exactly one is active per voyage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlagVariant {
    None,
    Parley,
    JollyRoger,
    GamblersCrest,
    MermaidsBlessing,
    PatronSaint,
    SharksFin,
    Worldly,
    /// Missing or unreadable persisted data; applies no modifiers.
    #[default]
    Unknown,
}

impl FlagVariant {
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::Parley,
        Self::JollyRoger,
        Self::GamblersCrest,
        Self::MermaidsBlessing,
        Self::PatronSaint,
        Self::SharksFin,
        Self::Worldly,
        Self::Unknown,
    ];

    /// Stable string key used when persisting the hoisted flag.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Parley => "Parley",
            Self::JollyRoger => "JollyRoger",
            Self::GamblersCrest => "GamblersCrest",
            Self::MermaidsBlessing => "MermaidsBlessing",
            Self::PatronSaint => "PatronSaint",
            Self::SharksFin => "SharksFin",
            Self::Worldly => "Worldly",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a persisted key, falling back to [`FlagVariant::Unknown`].
    #[must_use]
    pub fn from_key_or_unknown(key: &str) -> Self {
        key.parse().unwrap_or(Self::Unknown)
    }

    /// Look up the modifiers this flag applies.
    #[must_use]
    pub const fn modifiers(self) -> FlagModifiers {
        FLAG_MODIFIERS[self as usize]
    }
}

impl fmt::Display for FlagVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string does not name a flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flag key `{0}`")]
pub struct ParseFlagError(pub String);

impl FromStr for FlagVariant {
    type Err = ParseFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|flag| flag.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseFlagError(trimmed.to_string()))
    }
}

/// Plain modifier set consumed by the hazard zones, the catch and the rewards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlagModifiers {
    /// Hull leaks can be generated at all.
    pub leaks_enabled: bool,
    /// A single new hull leak escalates into every hole leaking.
    pub weak_hull: bool,
    /// Fish hauled per working net section on each catch update.
    pub catch_multiplier: u32,
    /// Extra trip time granted at launch.
    pub bonus_time_ms: u32,
    /// Subtracted from the chance that a reward roll lands a fish.
    pub fish_catch_chance_offset: f64,
    /// Chance that each landed fish is consumed before payout.
    pub consumption_chance: f64,
    /// Experience is not reduced by consumption.
    pub full_xp: bool,
    /// Payout is subject to the double-or-nothing transform.
    pub gambling: bool,
    /// Payout includes a fishing chest.
    pub mermaids_blessing: bool,
    /// Payout may include non-ocean fish.
    pub worldly: bool,
}

impl FlagModifiers {
    /// Modifiers for a trip with no flag effects.
    pub const NEUTRAL: Self = Self {
        leaks_enabled: true,
        weak_hull: false,
        catch_multiplier: 1,
        bonus_time_ms: 0,
        fish_catch_chance_offset: 0.0,
        consumption_chance: 0.0,
        full_xp: false,
        gambling: false,
        mermaids_blessing: false,
        worldly: false,
    };
}

impl Default for FlagModifiers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

// Indexed by `FlagVariant` discriminant; order must match the enum.
const FLAG_MODIFIERS: [FlagModifiers; FlagVariant::ALL.len()] = [
    // None
    FlagModifiers::NEUTRAL,
    // Parley
    FlagModifiers {
        leaks_enabled: false,
        fish_catch_chance_offset: PARLEY_CATCH_OFFSET,
        ..FlagModifiers::NEUTRAL
    },
    // JollyRoger
    FlagModifiers {
        weak_hull: true,
        catch_multiplier: JOLLY_ROGER_MULTIPLIER,
        ..FlagModifiers::NEUTRAL
    },
    // GamblersCrest
    FlagModifiers {
        gambling: true,
        ..FlagModifiers::NEUTRAL
    },
    // MermaidsBlessing
    FlagModifiers {
        consumption_chance: MERMAID_CONSUMPTION_CHANCE,
        mermaids_blessing: true,
        ..FlagModifiers::NEUTRAL
    },
    // PatronSaint
    FlagModifiers {
        consumption_chance: PATRON_CONSUMPTION_CHANCE,
        full_xp: true,
        ..FlagModifiers::NEUTRAL
    },
    // SharksFin
    FlagModifiers {
        bonus_time_ms: SHARKS_FIN_BONUS_MS,
        ..FlagModifiers::NEUTRAL
    },
    // Worldly
    FlagModifiers {
        worldly: true,
        ..FlagModifiers::NEUTRAL
    },
    // Unknown
    FlagModifiers::NEUTRAL,
];

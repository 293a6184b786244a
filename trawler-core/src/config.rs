//! Tunable trip configuration with serde defaults and validation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BASE_CATCH, BASE_FISH_CHANCE, CATCH_PER_REWARD_ROLL, CATCH_UPDATE_INTERVAL_SECS,
    COARSE_TICK_MS, EVENT_INTERVAL_MAX_UNITS, EVENT_INTERVAL_MIN_UNITS, EVENT_INTERVAL_UNIT_SECS,
    FISH_CHANCE_PER_LEVEL, FLOOD_CATCH_DIVISOR, GAMBLE_DOUBLE_CHANCE, GAMBLE_LOSE_CHANCE,
    HULL_SLOTS, INITIAL_EVENT_DELAY_SECS, LEAK_CUE_INTERVAL_TICKS, MAX_EVENT_SLOTS, NET_RIP_CHANCE,
    NET_SLOTS, PIPE_LEAK_CHANCE, PIPE_SLOTS, SEA_FAVORS_CHANCE, SLOT_SKIP_BASE, SLOT_SKIP_STEP,
    TRIP_DURATION_MS, WATER_PER_ACTIVE_HOLE, WATER_RECALC_INTERVAL_TICKS, XP_LEVEL_BONUS,
    XP_PER_FISH, ZONE_SLOTS_MAX,
};

/// Full configuration for a trawler trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrawlerConfig {
    #[serde(default)]
    pub trip: TripConfig,
    #[serde(default)]
    pub zones: ZoneConfig,
    #[serde(default)]
    pub events: EventConfig,
    #[serde(default)]
    pub rewards: RewardConfig,
}

impl TrawlerConfig {
    /// Parse a configuration document, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and any validation error
    /// for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.trip.validate()?;
        self.zones.validate()?;
        self.events.validate()?;
        self.rewards.validate()?;
        Ok(())
    }
}

/// Clock, cadence and catch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripConfig {
    #[serde(default = "TripConfig::default_duration_ms")]
    pub duration_ms: u32,
    #[serde(default = "TripConfig::default_coarse_tick_ms")]
    pub coarse_tick_ms: u32,
    #[serde(default = "TripConfig::default_base_catch")]
    pub base_catch: u32,
    #[serde(default = "TripConfig::default_flood_catch_divisor")]
    pub flood_catch_divisor: u32,
    #[serde(default = "TripConfig::default_leak_cue_interval_ticks")]
    pub leak_cue_interval_ticks: u32,
    #[serde(default = "TripConfig::default_water_recalc_interval_ticks")]
    pub water_recalc_interval_ticks: u32,
    #[serde(default = "TripConfig::default_catch_update_interval_secs")]
    pub catch_update_interval_secs: u32,
}

impl TripConfig {
    const fn default_duration_ms() -> u32 {
        TRIP_DURATION_MS
    }

    const fn default_coarse_tick_ms() -> u32 {
        COARSE_TICK_MS
    }

    const fn default_base_catch() -> u32 {
        BASE_CATCH
    }

    const fn default_flood_catch_divisor() -> u32 {
        FLOOD_CATCH_DIVISOR
    }

    const fn default_leak_cue_interval_ticks() -> u32 {
        LEAK_CUE_INTERVAL_TICKS
    }

    const fn default_water_recalc_interval_ticks() -> u32 {
        WATER_RECALC_INTERVAL_TICKS
    }

    const fn default_catch_update_interval_secs() -> u32 {
        CATCH_UPDATE_INTERVAL_SECS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("trip.duration_ms", self.duration_ms),
            ("trip.coarse_tick_ms", self.coarse_tick_ms),
            ("trip.flood_catch_divisor", self.flood_catch_divisor),
            ("trip.leak_cue_interval_ticks", self.leak_cue_interval_ticks),
            (
                "trip.water_recalc_interval_ticks",
                self.water_recalc_interval_ticks,
            ),
            (
                "trip.catch_update_interval_secs",
                self.catch_update_interval_secs,
            ),
        ] {
            require_positive(field, value)?;
        }
        Ok(())
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            duration_ms: Self::default_duration_ms(),
            coarse_tick_ms: Self::default_coarse_tick_ms(),
            base_catch: Self::default_base_catch(),
            flood_catch_divisor: Self::default_flood_catch_divisor(),
            leak_cue_interval_ticks: Self::default_leak_cue_interval_ticks(),
            water_recalc_interval_ticks: Self::default_water_recalc_interval_ticks(),
            catch_update_interval_secs: Self::default_catch_update_interval_secs(),
        }
    }
}

/// Slot counts per hazard category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    #[serde(default = "ZoneConfig::default_hull_slots")]
    pub hull_slots: u8,
    #[serde(default = "ZoneConfig::default_net_slots")]
    pub net_slots: u8,
    #[serde(default = "ZoneConfig::default_pipe_slots")]
    pub pipe_slots: u8,
    #[serde(default = "ZoneConfig::default_water_per_active_hole")]
    pub water_per_active_hole: u8,
}

impl ZoneConfig {
    const fn default_hull_slots() -> u8 {
        HULL_SLOTS
    }

    const fn default_net_slots() -> u8 {
        NET_SLOTS
    }

    const fn default_pipe_slots() -> u8 {
        PIPE_SLOTS
    }

    const fn default_water_per_active_hole() -> u8 {
        WATER_PER_ACTIVE_HOLE
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("zones.hull_slots", self.hull_slots),
            ("zones.net_slots", self.net_slots),
            ("zones.pipe_slots", self.pipe_slots),
        ] {
            if value == 0 || value > ZONE_SLOTS_MAX {
                return Err(ConfigError::SlotCount {
                    field,
                    max: ZONE_SLOTS_MAX,
                    value,
                });
            }
        }
        require_positive(
            "zones.water_per_active_hole",
            u32::from(self.water_per_active_hole),
        )
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            hull_slots: Self::default_hull_slots(),
            net_slots: Self::default_net_slots(),
            pipe_slots: Self::default_pipe_slots(),
            water_per_active_hole: Self::default_water_per_active_hole(),
        }
    }
}

/// Hazard event scheduling knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default = "EventConfig::default_initial_delay_secs")]
    pub initial_delay_secs: u32,
    #[serde(default = "EventConfig::default_interval_unit_secs")]
    pub interval_unit_secs: u32,
    #[serde(default = "EventConfig::default_interval_min_units")]
    pub interval_min_units: u32,
    #[serde(default = "EventConfig::default_interval_max_units")]
    pub interval_max_units: u32,
    #[serde(default = "EventConfig::default_sea_favors_chance")]
    pub sea_favors_chance: f64,
    #[serde(default = "EventConfig::default_max_slots")]
    pub max_slots: u8,
    #[serde(default = "EventConfig::default_slot_skip_base")]
    pub slot_skip_base: f64,
    #[serde(default = "EventConfig::default_slot_skip_step")]
    pub slot_skip_step: f64,
    #[serde(default = "EventConfig::default_net_rip_chance")]
    pub net_rip_chance: f64,
    #[serde(default = "EventConfig::default_pipe_leak_chance")]
    pub pipe_leak_chance: f64,
}

impl EventConfig {
    const fn default_initial_delay_secs() -> u32 {
        INITIAL_EVENT_DELAY_SECS
    }

    const fn default_interval_unit_secs() -> u32 {
        EVENT_INTERVAL_UNIT_SECS
    }

    const fn default_interval_min_units() -> u32 {
        EVENT_INTERVAL_MIN_UNITS
    }

    const fn default_interval_max_units() -> u32 {
        EVENT_INTERVAL_MAX_UNITS
    }

    const fn default_sea_favors_chance() -> f64 {
        SEA_FAVORS_CHANCE
    }

    const fn default_max_slots() -> u8 {
        MAX_EVENT_SLOTS
    }

    const fn default_slot_skip_base() -> f64 {
        SLOT_SKIP_BASE
    }

    const fn default_slot_skip_step() -> f64 {
        SLOT_SKIP_STEP
    }

    const fn default_net_rip_chance() -> f64 {
        NET_RIP_CHANCE
    }

    const fn default_pipe_leak_chance() -> f64 {
        PIPE_LEAK_CHANCE
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("events.interval_unit_secs", self.interval_unit_secs)?;
        require_positive("events.interval_min_units", self.interval_min_units)?;
        if self.interval_min_units > self.interval_max_units {
            return Err(ConfigError::IntervalBounds {
                min: self.interval_min_units,
                max: self.interval_max_units,
            });
        }
        for (field, value) in [
            ("events.sea_favors_chance", self.sea_favors_chance),
            ("events.slot_skip_base", self.slot_skip_base),
            ("events.slot_skip_step", self.slot_skip_step),
            ("events.net_rip_chance", self.net_rip_chance),
            ("events.pipe_leak_chance", self.pipe_leak_chance),
        ] {
            require_probability(field, value)?;
        }
        Ok(())
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: Self::default_initial_delay_secs(),
            interval_unit_secs: Self::default_interval_unit_secs(),
            interval_min_units: Self::default_interval_min_units(),
            interval_max_units: Self::default_interval_max_units(),
            sea_favors_chance: Self::default_sea_favors_chance(),
            max_slots: Self::default_max_slots(),
            slot_skip_base: Self::default_slot_skip_base(),
            slot_skip_step: Self::default_slot_skip_step(),
            net_rip_chance: Self::default_net_rip_chance(),
            pipe_leak_chance: Self::default_pipe_leak_chance(),
        }
    }
}

/// Reward payout tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default = "RewardConfig::default_catch_per_roll")]
    pub catch_per_roll: u32,
    #[serde(default = "RewardConfig::default_base_fish_chance")]
    pub base_fish_chance: f64,
    #[serde(default = "RewardConfig::default_fish_chance_per_level")]
    pub fish_chance_per_level: f64,
    #[serde(default = "RewardConfig::default_gamble_lose_chance")]
    pub gamble_lose_chance: f64,
    #[serde(default = "RewardConfig::default_gamble_double_chance")]
    pub gamble_double_chance: f64,
    #[serde(default = "RewardConfig::default_xp_per_fish")]
    pub xp_per_fish: f64,
    #[serde(default = "RewardConfig::default_xp_level_bonus")]
    pub xp_level_bonus: f64,
}

impl RewardConfig {
    const fn default_catch_per_roll() -> u32 {
        CATCH_PER_REWARD_ROLL
    }

    const fn default_base_fish_chance() -> f64 {
        BASE_FISH_CHANCE
    }

    const fn default_fish_chance_per_level() -> f64 {
        FISH_CHANCE_PER_LEVEL
    }

    const fn default_gamble_lose_chance() -> f64 {
        GAMBLE_LOSE_CHANCE
    }

    const fn default_gamble_double_chance() -> f64 {
        GAMBLE_DOUBLE_CHANCE
    }

    const fn default_xp_per_fish() -> f64 {
        XP_PER_FISH
    }

    const fn default_xp_level_bonus() -> f64 {
        XP_LEVEL_BONUS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("rewards.catch_per_roll", self.catch_per_roll)?;
        for (field, value) in [
            ("rewards.base_fish_chance", self.base_fish_chance),
            ("rewards.fish_chance_per_level", self.fish_chance_per_level),
            ("rewards.gamble_lose_chance", self.gamble_lose_chance),
            ("rewards.gamble_double_chance", self.gamble_double_chance),
        ] {
            require_probability(field, value)?;
        }
        let gamble_total = self.gamble_lose_chance + self.gamble_double_chance;
        if gamble_total > 1.0 {
            return Err(ConfigError::GambleOdds {
                lose: self.gamble_lose_chance,
                double: self.gamble_double_chance,
            });
        }
        if !self.xp_per_fish.is_finite() || self.xp_per_fish < 0.0 {
            return Err(ConfigError::RangeViolation {
                field: "rewards.xp_per_fish",
                min: 0.0,
                max: f64::MAX,
                value: self.xp_per_fish,
            });
        }
        if !self.xp_level_bonus.is_finite() || self.xp_level_bonus < 0.0 {
            return Err(ConfigError::RangeViolation {
                field: "rewards.xp_level_bonus",
                min: 0.0,
                max: f64::MAX,
                value: self.xp_level_bonus,
            });
        }
        Ok(())
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            catch_per_roll: Self::default_catch_per_roll(),
            base_fish_chance: Self::default_base_fish_chance(),
            fish_chance_per_level: Self::default_fish_chance_per_level(),
            gamble_lose_chance: Self::default_gamble_lose_chance(),
            gamble_double_chance: Self::default_gamble_double_chance(),
            xp_per_fish: Self::default_xp_per_fish(),
            xp_level_bonus: Self::default_xp_level_bonus(),
        }
    }
}

/// Errors raised when trip configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("configuration is not valid JSON: {0}")]
    Parse(String),
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must hold between 1 and {max} slots (got {value})")]
    SlotCount {
        field: &'static str,
        max: u8,
        value: u8,
    },
    #[error("event interval bounds invalid (min {min} > max {max})")]
    IntervalBounds { min: u32, max: u32 },
    #[error("gamble odds exceed certainty: lose {lose:.2} + double {double:.2}")]
    GambleOdds { lose: f64, double: f64 },
}

fn require_positive(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::MinViolation {
            field,
            min: 1,
            value,
        });
    }
    Ok(())
}

fn require_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        });
    }
    Ok(())
}

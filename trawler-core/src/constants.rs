//! Centralized balance and tuning constants for the trawler simulation.
//!
//! These are the defaults behind [`crate::config::TrawlerConfig`]; any value a
//! host wants to tune goes through the config, everything else stays here.

// Notification text --------------------------------------------------------
pub(crate) const MSG_EVERYTHING_FAILING: &str = "This ship is falling apart!";
pub(crate) const MSG_LOSING_FISH: &str = "We're losing fish!";
pub(crate) const MSG_MAX_LEAKS: &str = "We're taking on water!";
pub(crate) const MSG_MULTI_PROBLEMS: &str = "We've got lots of problems!";
pub(crate) const MSG_ENGINE_PROBLEM: &str = "The engine is failing!";
pub(crate) const MSG_NET_PROBLEM: &str = "The nets are torn!";
pub(crate) const MSG_LEAK_PROBLEM: &str = "We've got a leak!";
pub(crate) const MSG_SEA_FAVORS: &str = "The sea favors us today!";
pub(crate) const MSG_NO_EVENTS: &str = "Yoba be praised!";
pub(crate) const MSG_CALM: &str = "Ah the smell of the sea...";
pub(crate) const HUD_FLOODED: &str =
    "The ship has taken on too much water! The captain turns back before it can sink.";
pub(crate) const HUD_TRIP_COMPLETE: &str = "The trip was a success! Heading back to port.";

// Message severities -------------------------------------------------------
pub(crate) const SEVERITY_EVERYTHING_FAILING: u32 = 10;
pub(crate) const SEVERITY_LOSING_FISH: u32 = 9;
pub(crate) const SEVERITY_MAX_LEAKS: u32 = 8;
pub(crate) const SEVERITY_MULTI_PROBLEMS: u32 = 7;
pub(crate) const SEVERITY_ENGINE_PROBLEM: u32 = 7;
pub(crate) const SEVERITY_NET_PROBLEM: u32 = 6;
pub(crate) const SEVERITY_LEAK_PROBLEM: u32 = 5;

// Zone layout --------------------------------------------------------------
pub(crate) const HULL_SLOTS: u8 = 4;
pub(crate) const NET_SLOTS: u8 = 3;
pub(crate) const PIPE_SLOTS: u8 = 3;
pub(crate) const ZONE_SLOTS_MAX: u8 = 8;
pub(crate) const WATER_LEVEL_MAX: u8 = 100;
pub(crate) const WATER_PER_ACTIVE_HOLE: u8 = 1;

// Trip clock ---------------------------------------------------------------
pub(crate) const TRIP_DURATION_MS: u32 = 60_000;
pub(crate) const COARSE_TICK_MS: u32 = 1_000;
pub(crate) const LEAK_CUE_INTERVAL_TICKS: u32 = 15;
pub(crate) const WATER_RECALC_INTERVAL_TICKS: u32 = 150;
pub(crate) const CATCH_UPDATE_INTERVAL_SECS: u32 = 5;
pub(crate) const FLOOD_DEPARTURE_DELAY_MS: u32 = 2_500;
pub(crate) const TIMEOUT_DEPARTURE_DELAY_MS: u32 = 2_000;
pub(crate) const SHARKS_FIN_BONUS_MS: u32 = 60_000;

// Catch --------------------------------------------------------------------
pub(crate) const BASE_CATCH: u32 = 100;
pub(crate) const FLOOD_CATCH_DIVISOR: u32 = 4;
pub(crate) const JOLLY_ROGER_MULTIPLIER: u32 = 4;

// Event scheduling ---------------------------------------------------------
pub(crate) const INITIAL_EVENT_DELAY_SECS: u32 = 10;
pub(crate) const EVENT_INTERVAL_UNIT_SECS: u32 = 1;
pub(crate) const EVENT_INTERVAL_MIN_UNITS: u32 = 1;
pub(crate) const EVENT_INTERVAL_MAX_UNITS: u32 = 4;
pub(crate) const SEA_FAVORS_CHANCE: f64 = 0.05;
pub(crate) const MAX_EVENT_SLOTS: u8 = 4;
pub(crate) const SLOT_SKIP_BASE: f64 = 0.1;
pub(crate) const SLOT_SKIP_STEP: f64 = 0.1;
pub(crate) const NET_RIP_CHANCE: f64 = 0.35;
pub(crate) const PIPE_LEAK_CHANCE: f64 = 0.25;

// Notification banner ------------------------------------------------------
pub(crate) const BANNER_FADE_STEP: f32 = 0.1;

// Rewards ------------------------------------------------------------------
pub(crate) const CATCH_PER_REWARD_ROLL: u32 = 10;
pub(crate) const BASE_FISH_CHANCE: f64 = 0.7;
pub(crate) const FISH_CHANCE_PER_LEVEL: f64 = 0.02;
pub(crate) const PARLEY_CATCH_OFFSET: f64 = 0.25;
pub(crate) const MERMAID_CONSUMPTION_CHANCE: f64 = 0.10;
pub(crate) const PATRON_CONSUMPTION_CHANCE: f64 = 0.25;
pub(crate) const GAMBLE_LOSE_CHANCE: f64 = 0.25;
pub(crate) const GAMBLE_DOUBLE_CHANCE: f64 = 0.50;
pub(crate) const XP_PER_FISH: f64 = 0.5;
pub(crate) const XP_LEVEL_BONUS: f64 = 0.1;
pub(crate) const FISHING_LEVEL_MAX: u8 = 10;
pub(crate) const QUALITY_IRIDIUM_PER_LEVEL: f64 = 0.005;
pub(crate) const QUALITY_GOLD_PER_LEVEL: f64 = 0.02;
pub(crate) const QUALITY_SILVER_BASE: f64 = 0.15;
pub(crate) const QUALITY_SILVER_PER_LEVEL: f64 = 0.04;

// Ledger -------------------------------------------------------------------
pub(crate) const KEY_HOISTED_FLAG: &str = "trawler.hoisted_flag";
pub(crate) const KEY_GREETED_TODAY: &str = "trawler.greeted_today";
pub(crate) const KEY_SAILED_TODAY: &str = "trawler.sailed_today";
pub(crate) const KEY_TRIP_SUCCESSFUL: &str = "trawler.trip_successful";
pub(crate) const KEY_FINISHED_TALKING: &str = "trawler.finished_talking";
pub(crate) const KEY_HAS_SEEN_FLAG: &str = "trawler.has_seen_flag";

// Calendar -----------------------------------------------------------------
pub(crate) const DEPARTURE_DAYS: [chrono::Weekday; 2] =
    [chrono::Weekday::Wed, chrono::Weekday::Sun];

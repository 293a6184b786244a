//! Persisted per-player trawler data.
//!
//! Storage is external and string-keyed; this module only knows which keys
//! exist, their defaults, and when they renew.
use chrono::Weekday;
use std::collections::HashMap;
use std::convert::Infallible;

use crate::constants::{
    DEPARTURE_DAYS, KEY_FINISHED_TALKING, KEY_GREETED_TODAY, KEY_HAS_SEEN_FLAG, KEY_HOISTED_FLAG,
    KEY_SAILED_TODAY, KEY_TRIP_SUCCESSFUL,
};
use crate::flags::FlagVariant;
use crate::trip::EndCause;

/// Trait for abstracting per-player key/value persistence.
/// Platform-specific implementations should provide this
pub trait PlayerDataStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PlayerDataStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Whether the trawler sails on `weekday`.
#[must_use]
pub fn is_departure_day(weekday: Weekday) -> bool {
    DEPARTURE_DAYS.contains(&weekday)
}

/// Whether the captain is at the dock offering trips.
#[must_use]
pub fn boat_departs(weekday: Weekday, introduced: bool, getting_dark: bool) -> bool {
    introduced && !getting_dark && is_departure_day(weekday)
}

#[derive(Debug, Clone, Default)]
pub struct PlayerLedger<S: PlayerDataStore> {
    store: S,
}

impl<S: PlayerDataStore> PlayerLedger<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Seed missing keys and apply the daily and weekly renewals.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn establish(&mut self, weekday: Weekday) -> Result<(), S::Error> {
        if self.store.get(KEY_HOISTED_FLAG)?.is_none() {
            self.set_hoisted_flag(FlagVariant::Unknown)?;
        }

        self.set_bool(KEY_GREETED_TODAY, false)?;

        let first_visit = self.store.get(KEY_SAILED_TODAY)?.is_none();
        if first_visit || is_departure_day(weekday) {
            for key in [KEY_SAILED_TODAY, KEY_TRIP_SUCCESSFUL, KEY_FINISHED_TALKING] {
                self.set_bool(key, false)?;
            }
        }

        // one-time, never renewed
        if self.store.get(KEY_HAS_SEEN_FLAG)?.is_none() {
            self.set_bool(KEY_HAS_SEEN_FLAG, false)?;
        }
        Ok(())
    }

    /// Hoisted flag; missing or unreadable values resolve to `Unknown`.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn hoisted_flag(&self) -> Result<FlagVariant, S::Error> {
        Ok(self
            .store
            .get(KEY_HOISTED_FLAG)?
            .map_or(FlagVariant::Unknown, |key| {
                FlagVariant::from_key_or_unknown(&key)
            }))
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn set_hoisted_flag(&mut self, flag: FlagVariant) -> Result<(), S::Error> {
        self.store.set(KEY_HOISTED_FLAG, flag.key())
    }

    /// Persist how a trip ended.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn record_outcome(&mut self, cause: EndCause) -> Result<(), S::Error> {
        self.set_bool(KEY_SAILED_TODAY, true)?;
        self.set_bool(KEY_TRIP_SUCCESSFUL, cause.is_success())
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn greeted_today(&self) -> Result<bool, S::Error> {
        self.get_bool(KEY_GREETED_TODAY)
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn mark_greeted(&mut self) -> Result<(), S::Error> {
        self.set_bool(KEY_GREETED_TODAY, true)
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn sailed_today(&self) -> Result<bool, S::Error> {
        self.get_bool(KEY_SAILED_TODAY)
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn trip_successful(&self) -> Result<bool, S::Error> {
        self.get_bool(KEY_TRIP_SUCCESSFUL)
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn finished_talking(&self) -> Result<bool, S::Error> {
        self.get_bool(KEY_FINISHED_TALKING)
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn mark_finished_talking(&mut self) -> Result<(), S::Error> {
        self.set_bool(KEY_FINISHED_TALKING, true)
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn has_seen_flag(&self) -> Result<bool, S::Error> {
        self.get_bool(KEY_HAS_SEEN_FLAG)
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn mark_seen_flag(&mut self) -> Result<(), S::Error> {
        self.set_bool(KEY_HAS_SEEN_FLAG, true)
    }

    fn get_bool(&self, key: &str) -> Result<bool, S::Error> {
        Ok(self
            .store
            .get(key)?
            .is_some_and(|value| value.eq_ignore_ascii_case("true")))
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), S::Error> {
        self.store.set(key, if value { "true" } else { "false" })
    }
}

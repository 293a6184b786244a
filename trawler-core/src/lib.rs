//! Trawler Trip Engine
//!
//! Platform-agnostic core logic for a timed, cooperative fishing-trawler trip.
//! This crate provides hazard generation, the trip clock and reward math
//! without rendering, input mapping or storage backends.

pub mod catch;
pub mod config;
pub mod constants;
pub mod events;
pub mod flags;
pub mod hazard;
pub mod ledger;
pub mod notification;
pub mod numbers;
pub mod rewards;
pub mod rng;
pub mod session;
pub mod trip;
pub mod vessel;

#[cfg(test)]
pub(crate) mod test_support;

use anyhow::Context;
use chrono::Weekday;
use log::{debug, info};

// Re-export commonly used types
pub use catch::Catch;
pub use config::{ConfigError, EventConfig, RewardConfig, TrawlerConfig, TripConfig, ZoneConfig};
pub use events::{
    EventRound, EventScheduler, HazardAttempt, MessageCandidate, RoundKind, TripMessage,
    select_message,
};
pub use flags::{FlagModifiers, FlagVariant, ParseFlagError};
pub use hazard::{ActorId, HazardCategory, HazardSlot, HazardZone, ZoneSpec};
pub use ledger::{MemoryStore, PlayerDataStore, PlayerLedger, boat_departs, is_departure_day};
pub use notification::{Directive, Notification, NotificationBanner};
pub use rewards::{
    Deckhand, FishPool, GambleOutcome, PayoutItem, PayoutKind, Quality, RewardCalculator,
    RewardError, RewardResult,
};
pub use rng::{CountingRng, RngBundle};
pub use session::{
    DeckhandXp, NullObserver, SessionError, TripObserver, TripSession, TripSettlement,
};
pub use trip::{
    EndCause, SecondOutcome, SoundCue, TickOutcome, Trip, TripError, TripMachine, TripPhase,
    TripReport,
};
pub use vessel::Vessel;

/// Trait for abstracting where finished payouts are delivered.
/// Platform-specific implementations should provide this
pub trait RewardSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store a trip's payout.
    ///
    /// # Errors
    ///
    /// Returns an error if the payout cannot be stored.
    fn deposit(&mut self, reward: &RewardResult) -> Result<(), Self::Error>;
}

/// Sink used when the host has nowhere to put rewards.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RewardSink for NullSink {
    type Error = std::convert::Infallible;

    fn deposit(&mut self, _reward: &RewardResult) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Main engine wiring persisted player data and the reward sink around trips
pub struct TrawlerEngine<S, R>
where
    S: PlayerDataStore,
    R: RewardSink,
{
    config: TrawlerConfig,
    ledger: PlayerLedger<S>,
    sink: R,
}

impl<S, R> TrawlerEngine<S, R>
where
    S: PlayerDataStore,
    R: RewardSink,
{
    /// Create an engine from a configuration, a player store and a reward sink
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: TrawlerConfig, store: S, sink: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ledger: PlayerLedger::new(store),
            sink,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &TrawlerConfig {
        &self.config
    }

    #[must_use]
    pub const fn ledger(&self) -> &PlayerLedger<S> {
        &self.ledger
    }

    pub const fn ledger_mut(&mut self) -> &mut PlayerLedger<S> {
        &mut self.ledger
    }

    #[must_use]
    pub const fn sink(&self) -> &R {
        &self.sink
    }

    /// Refresh persisted player data at the start of a day
    ///
    /// # Errors
    ///
    /// Returns an error if the player store fails.
    pub fn start_day(&mut self, weekday: Weekday) -> Result<(), S::Error> {
        self.ledger.establish(weekday)
    }

    /// Launch a trip with the player's hoisted flag
    ///
    /// # Errors
    ///
    /// Returns an error if the flag cannot be read or the session refuses to launch.
    pub fn launch<O: TripObserver>(
        &self,
        crew: Vec<Deckhand>,
        seed: u64,
        observer: O,
    ) -> anyhow::Result<TripSession<O>> {
        let flag = self
            .ledger
            .hoisted_flag()
            .context("reading hoisted flag")?;
        let session = TripSession::launch(self.config.clone(), flag, crew, seed, observer)?;
        info!("launched trip with seed {seed} under {flag}");
        Ok(session)
    }

    /// Persist how a trip ended as soon as it starts ending, before the
    /// departure delay runs out. Hosts call this from their departure hook.
    ///
    /// # Errors
    ///
    /// Returns an error if the player store fails.
    pub fn record_departure(&mut self, cause: EndCause) -> anyhow::Result<()> {
        self.ledger
            .record_outcome(cause)
            .context("recording trip outcome")?;
        debug!("recorded {cause:?} departure");
        Ok(())
    }

    /// Persist a finished trip's outcome and deposit its payout
    ///
    /// # Errors
    ///
    /// Returns an error if the player store or the reward sink fails.
    pub fn settle(&mut self, settlement: &TripSettlement) -> anyhow::Result<()> {
        if let Some(report) = &settlement.report {
            self.ledger
                .record_outcome(report.cause)
                .context("recording trip outcome")?;
        }
        if let Some(reward) = &settlement.reward {
            self.sink.deposit(reward).context("depositing trip rewards")?;
        }
        Ok(())
    }
}

//! Trip lifecycle state machine.
//!
//! `TripMachine` owns the vessel, the catch, the event scheduler and the
//! banner for one voyage at a time. Two cadences drive it: [`TripMachine::advance`]
//! once per fine tick (cues, water, fading) and [`TripMachine::advance_second`]
//! once per coarse tick (timer, catch, hazard rounds).
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

use crate::catch::Catch;
use crate::config::{TrawlerConfig, TripConfig};
use crate::constants::{
    FLOOD_DEPARTURE_DELAY_MS, HUD_FLOODED, HUD_TRIP_COMPLETE, TIMEOUT_DEPARTURE_DELAY_MS,
};
use crate::events::{EventRound, EventScheduler};
use crate::flags::{FlagModifiers, FlagVariant};
use crate::hazard::{ActorId, HazardCategory};
use crate::notification::{Notification, NotificationBanner};
use crate::vessel::Vessel;

/// Why a trip stopped fishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCause {
    Flooded,
    TimedOut,
}

impl EndCause {
    /// Real-time delay before the crew is put ashore.
    #[must_use]
    pub const fn departure_delay_ms(self) -> u32 {
        match self {
            Self::Flooded => FLOOD_DEPARTURE_DELAY_MS,
            Self::TimedOut => TIMEOUT_DEPARTURE_DELAY_MS,
        }
    }

    #[must_use]
    pub const fn cue(self) -> SoundCue {
        match self {
            Self::Flooded => SoundCue::Flooded,
            Self::TimedOut => SoundCue::TripComplete,
        }
    }

    #[must_use]
    pub const fn hud_message(self) -> &'static str {
        match self {
            Self::Flooded => HUD_FLOODED,
            Self::TimedOut => HUD_TRIP_COMPLETE,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Audio cue requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Leak { pitch: u16 },
    Flooded,
    TripComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TripPhase {
    #[default]
    NotStarted,
    Active,
    Ending(EndCause),
    Reset,
}

impl fmt::Display for TripPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::Active => f.write_str("active"),
            Self::Ending(EndCause::Flooded) => f.write_str("ending (flooded)"),
            Self::Ending(EndCause::TimedOut) => f.write_str("ending (timed out)"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TripError {
    #[error("cannot start a trip while {0}")]
    AlreadyUnderway(TripPhase),
    #[error("cannot finish a trip while {0}")]
    NotEnding(TripPhase),
    #[error("cannot abandon a trip while {0}")]
    NotActive(TripPhase),
}

/// Per-voyage aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    flag: FlagVariant,
    modifiers: FlagModifiers,
    remaining_time_ms: u32,
    catch: Catch,
    is_ending: bool,
    deckhand_count: u32,
}

impl Trip {
    fn launch(cfg: &TripConfig, flag: FlagVariant, deckhand_count: u32) -> Self {
        let modifiers = flag.modifiers();
        Self {
            flag,
            modifiers,
            remaining_time_ms: cfg.duration_ms.saturating_add(modifiers.bonus_time_ms),
            catch: Catch::new(cfg.base_catch, modifiers.catch_multiplier),
            is_ending: false,
            deckhand_count: deckhand_count.max(1),
        }
    }

    fn idle(cfg: &TripConfig) -> Self {
        Self::launch(cfg, FlagVariant::Unknown, 1)
    }

    #[must_use]
    pub const fn flag(&self) -> FlagVariant {
        self.flag
    }

    #[must_use]
    pub const fn modifiers(&self) -> &FlagModifiers {
        &self.modifiers
    }

    #[must_use]
    pub const fn remaining_time_ms(&self) -> u32 {
        self.remaining_time_ms
    }

    #[must_use]
    pub const fn catch(&self) -> &Catch {
        &self.catch
    }

    #[must_use]
    pub const fn catch_quantity(&self) -> u32 {
        self.catch.quantity()
    }

    #[must_use]
    pub const fn is_ending(&self) -> bool {
        self.is_ending
    }

    #[must_use]
    pub const fn deckhand_count(&self) -> u32 {
        self.deckhand_count
    }
}

/// Snapshot handed out when a trip is torn down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripReport {
    pub flag: FlagVariant,
    pub cause: EndCause,
    pub catch_quantity: u32,
    pub deckhand_count: u32,
    pub seconds_elapsed: u32,
    pub remaining_time_ms: u32,
    pub water_level: u8,
    pub rounds_fired: u32,
    pub hazards_active: u32,
}

/// Result of one fine tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub cues: SmallVec<[SoundCue; 2]>,
    pub notifications: SmallVec<[Notification; 2]>,
    pub water_level: Option<u8>,
    pub ended: Option<EndCause>,
}

/// Result of one coarse tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondOutcome {
    pub round: Option<EventRound>,
    pub notification: Option<Notification>,
    pub catch_delta: Option<i64>,
    pub ended: Option<EndCause>,
}

#[derive(Debug, Clone)]
pub struct TripMachine {
    cfg: TrawlerConfig,
    phase: TripPhase,
    trip: Trip,
    vessel: Vessel,
    scheduler: EventScheduler,
    banner: NotificationBanner,
    fine_ticks: u64,
    seconds: u32,
    elapsed_ms: u64,
    paused: bool,
}

impl TripMachine {
    #[must_use]
    pub fn new(cfg: TrawlerConfig) -> Self {
        Self {
            phase: TripPhase::NotStarted,
            trip: Trip::idle(&cfg.trip),
            vessel: Vessel::new(&cfg.zones),
            scheduler: EventScheduler::new(cfg.events.clone()),
            banner: NotificationBanner::default(),
            fine_ticks: 0,
            seconds: 0,
            elapsed_ms: 0,
            paused: false,
            cfg,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TrawlerConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn phase(&self) -> TripPhase {
        self.phase
    }

    #[must_use]
    pub const fn trip(&self) -> &Trip {
        &self.trip
    }

    #[must_use]
    pub const fn vessel(&self) -> &Vessel {
        &self.vessel
    }

    /// Direct vessel access for hosts replaying state; regular play goes through [`Self::repair`].
    pub const fn vessel_mut(&mut self) -> &mut Vessel {
        &mut self.vessel
    }

    #[must_use]
    pub const fn banner(&self) -> &NotificationBanner {
        &self.banner
    }

    #[must_use]
    pub const fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    #[must_use]
    pub const fn seconds_elapsed(&self) -> u32 {
        self.seconds
    }

    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Launch a voyage.
    ///
    /// # Errors
    ///
    /// Returns `TripError::AlreadyUnderway` unless the machine is idle.
    pub fn start(&mut self, flag: FlagVariant, deckhand_count: u32) -> Result<(), TripError> {
        if !matches!(self.phase, TripPhase::NotStarted | TripPhase::Reset) {
            return Err(TripError::AlreadyUnderway(self.phase));
        }
        self.trip = Trip::launch(&self.cfg.trip, flag, deckhand_count);
        self.vessel.reset();
        self.vessel.configure(self.trip.modifiers());
        self.scheduler.reset();
        self.banner.clear();
        self.fine_ticks = 0;
        self.seconds = 0;
        self.elapsed_ms = 0;
        self.paused = false;
        self.phase = TripPhase::Active;
        info!(
            "trip launched: flag {}, {} deckhand(s), {} ms on the clock",
            flag,
            self.trip.deckhand_count(),
            self.trip.remaining_time_ms()
        );
        Ok(())
    }

    /// Submit a repair. Always allowed; idle zones simply have nothing to fix.
    pub fn repair(&mut self, category: HazardCategory, slot: usize, actor: ActorId) -> bool {
        self.vessel.repair(category, slot, actor)
    }

    /// Fine tick: leak cues, water recalculation, flood check and banner fading.
    ///
    /// # Panics
    ///
    /// Panics if the machine is not running a trip.
    pub fn advance<R: Rng + ?Sized>(&mut self, delta_ms: u32, ambience: &mut R) -> TickOutcome {
        self.assert_running("advance");
        let mut outcome = TickOutcome::default();
        if self.paused {
            return outcome;
        }
        self.fine_ticks += 1;
        self.elapsed_ms += u64::from(delta_ms);

        if let Some(notification) = self.banner.step() {
            outcome.notifications.push(notification);
        }
        if self.trip.is_ending {
            return outcome;
        }

        let cfg = &self.cfg.trip;
        if self.fine_ticks % u64::from(cfg.leak_cue_interval_ticks) == 0
            && self.vessel.hull.has_active()
        {
            let pitch = ambience.gen_range(1..=4u16) * 100;
            outcome.cues.push(SoundCue::Leak { pitch });
        }

        if self.fine_ticks % u64::from(cfg.water_recalc_interval_ticks) == 0 {
            if let Some(notification) = self.banner.start_fade() {
                outcome.notifications.push(notification);
            }
            let level = self.vessel.hull.recalculate_water_level();
            outcome.water_level = Some(level);
            if self.vessel.hull.is_flooded() {
                self.begin_ending(EndCause::Flooded);
                outcome.ended = Some(EndCause::Flooded);
            }
        }
        outcome
    }

    /// Coarse tick: timer, catch recalculation, hazard rounds and timeout check.
    ///
    /// # Panics
    ///
    /// Panics if the machine is not running a trip.
    pub fn advance_second<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SecondOutcome {
        self.assert_running("advance_second");
        let mut outcome = SecondOutcome::default();
        if self.paused || self.trip.is_ending {
            return outcome;
        }
        self.seconds += 1;
        self.trip.remaining_time_ms = self
            .trip
            .remaining_time_ms
            .saturating_sub(self.cfg.trip.coarse_tick_ms);
        if self.trip.remaining_time_ms == 0 {
            self.begin_ending(EndCause::TimedOut);
            outcome.ended = Some(EndCause::TimedOut);
            return outcome;
        }

        if self.seconds % self.cfg.trip.catch_update_interval_secs == 0 {
            let delta = self
                .trip
                .catch
                .recalculate(&self.vessel.net, self.vessel.engine_failing());
            outcome.catch_delta = Some(delta);
        }

        if let Some(round) = self.scheduler.tick_second(&mut self.vessel, rng) {
            outcome.notification = self.banner.post(round.message.text());
            outcome.round = Some(round);
        }
        outcome
    }

    fn begin_ending(&mut self, cause: EndCause) {
        self.trip.is_ending = true;
        if cause == EndCause::Flooded {
            self.trip.catch.apply_flood_penalty(self.cfg.trip.flood_catch_divisor);
        }
        self.phase = TripPhase::Ending(cause);
        info!(
            "trip ending ({:?}) after {}s with catch {}",
            cause,
            self.seconds,
            self.trip.catch_quantity()
        );
    }

    /// Tear down an ending trip and report how it went.
    ///
    /// # Errors
    ///
    /// Returns `TripError::NotEnding` unless an end condition has fired.
    pub fn finish(&mut self) -> Result<TripReport, TripError> {
        let TripPhase::Ending(cause) = self.phase else {
            return Err(TripError::NotEnding(self.phase));
        };
        let report = TripReport {
            flag: self.trip.flag,
            cause,
            catch_quantity: self.trip.catch_quantity(),
            deckhand_count: self.trip.deckhand_count,
            seconds_elapsed: self.seconds,
            remaining_time_ms: self.trip.remaining_time_ms,
            water_level: self.vessel.hull.water_level(),
            rounds_fired: self.scheduler.rounds_fired(),
            hazards_active: self.vessel.total_active(),
        };
        self.teardown();
        debug!("trip finished: {report:?}");
        Ok(report)
    }

    /// Leave an active trip early. No report, no reward.
    ///
    /// # Errors
    ///
    /// Returns `TripError::NotActive` unless the trip is still fishing.
    pub fn abandon(&mut self) -> Result<(), TripError> {
        if self.phase != TripPhase::Active {
            return Err(TripError::NotActive(self.phase));
        }
        info!("trip abandoned after {}s", self.seconds);
        self.teardown();
        Ok(())
    }

    fn teardown(&mut self) {
        self.vessel.reset();
        self.scheduler.reset();
        self.banner.clear();
        self.trip = Trip::idle(&self.cfg.trip);
        self.paused = false;
        self.phase = TripPhase::Reset;
    }

    fn assert_running(&self, op: &str) {
        assert!(
            matches!(self.phase, TripPhase::Active | TripPhase::Ending(_)),
            "{op} called while trip is {}",
            self.phase
        );
    }
}

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, TrawlerConfig};
use crate::flags::FlagVariant;
use crate::hazard::{ActorId, HazardCategory};
use crate::notification::Notification;
use crate::rewards::{Deckhand, RewardCalculator, RewardError, RewardResult};
use crate::rng::RngBundle;
use crate::trip::{EndCause, SoundCue, Trip, TripError, TripMachine, TripPhase, TripReport};
use crate::vessel::Vessel;

/// Presentation hooks for a running trip. Every method defaults to a no-op.
pub trait TripObserver {
    fn on_notification(&mut self, _notification: &Notification) {}
    fn on_cue(&mut self, _cue: SoundCue) {}
    /// Fired exactly once per trip, when an end condition is reached.
    fn on_departure(&mut self, _cause: EndCause) {}
    fn on_hud_message(&mut self, _message: &str) {}
}

/// Observer that ignores every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TripObserver for NullObserver {}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("a trip needs at least one deckhand")]
    NoCrew,
    #[error(transparent)]
    Trip(#[from] TripError),
    #[error(transparent)]
    Reward(#[from] RewardError),
}

/// Experience granted to one deckhand on leaving the vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckhandXp {
    pub id: ActorId,
    pub experience: u32,
}

/// Everything a finished or abandoned trip hands back to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSettlement {
    pub report: Option<TripReport>,
    pub reward: Option<RewardResult>,
    pub experience: Vec<DeckhandXp>,
}

impl TripSettlement {
    #[must_use]
    pub fn cause(&self) -> Option<EndCause> {
        self.report.as_ref().map(|report| report.cause)
    }
}

/// High-level session binding a trip machine, its rewards and its RNG streams
/// to one crew for one voyage.
#[derive(Debug)]
pub struct TripSession<O: TripObserver> {
    machine: TripMachine,
    rewards: RewardCalculator,
    rng: RngBundle,
    crew: Vec<Deckhand>,
    observer: O,
    departure_announced: bool,
    menu_open: bool,
}

impl<O: TripObserver> TripSession<O> {
    /// Put a crew aboard and cast off. The first deckhand leads the trip.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for an invalid configuration and
    /// `SessionError::NoCrew` for an empty crew.
    pub fn launch(
        cfg: TrawlerConfig,
        flag: FlagVariant,
        crew: Vec<Deckhand>,
        seed: u64,
        observer: O,
    ) -> Result<Self, SessionError> {
        cfg.validate()?;
        let Some(lead) = crew.first().copied() else {
            return Err(SessionError::NoCrew);
        };
        let mut rewards = RewardCalculator::new(cfg.rewards.clone());
        rewards.reset(&lead, &flag.modifiers());

        let mut machine = TripMachine::new(cfg);
        let deckhands = u32::try_from(crew.len()).unwrap_or(u32::MAX);
        machine.start(flag, deckhands)?;

        Ok(Self {
            machine,
            rewards,
            rng: RngBundle::from_user_seed(seed),
            crew,
            observer,
            departure_announced: false,
            menu_open: false,
        })
    }

    #[must_use]
    pub const fn phase(&self) -> TripPhase {
        self.machine.phase()
    }

    #[must_use]
    pub const fn trip(&self) -> &Trip {
        self.machine.trip()
    }

    #[must_use]
    pub const fn vessel(&self) -> &Vessel {
        self.machine.vessel()
    }

    #[must_use]
    pub const fn machine(&self) -> &TripMachine {
        &self.machine
    }

    #[must_use]
    pub const fn rewards(&self) -> &RewardCalculator {
        &self.rewards
    }

    #[must_use]
    pub fn crew(&self) -> &[Deckhand] {
        &self.crew
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    pub const fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Draw counts for the event, reward and ambience streams.
    #[must_use]
    pub const fn rng_draws(&self) -> [u64; 3] {
        self.rng.draws()
    }

    /// Fine tick. Returns the end cause if the trip started ending this tick.
    ///
    /// # Panics
    ///
    /// Panics if called after the trip has been torn down.
    pub fn tick(&mut self, delta_ms: u32) -> Option<EndCause> {
        let outcome = self.machine.advance(delta_ms, self.rng.ambience());
        for notification in &outcome.notifications {
            self.observer.on_notification(notification);
        }
        for cue in outcome.cues {
            self.observer.on_cue(cue);
        }
        if let Some(cause) = outcome.ended {
            self.announce_departure(cause);
        }
        outcome.ended
    }

    /// Coarse tick. Returns the end cause if the trip started ending this tick.
    ///
    /// # Panics
    ///
    /// Panics if called after the trip has been torn down.
    pub fn tick_second(&mut self) -> Option<EndCause> {
        let outcome = self.machine.advance_second(self.rng.events());
        if let Some(notification) = &outcome.notification {
            self.observer.on_notification(notification);
        }
        if let Some(cause) = outcome.ended {
            self.announce_departure(cause);
        }
        outcome.ended
    }

    /// Apply a repair request from any crew member.
    pub fn repair(&mut self, category: HazardCategory, slot: usize, actor: ActorId) -> bool {
        let repaired = self.machine.repair(category, slot, actor);
        if repaired {
            debug!("{actor} repaired {} {slot}", category.label());
        }
        repaired
    }

    /// An open menu pauses a solo trip; crewed trips keep running.
    pub fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
        self.machine.set_paused(open && self.crew.len() == 1);
    }

    #[must_use]
    pub const fn menu_open(&self) -> bool {
        self.menu_open
    }

    fn announce_departure(&mut self, cause: EndCause) {
        if self.departure_announced {
            warn!("departure already announced; ignoring {cause:?}");
            return;
        }
        self.departure_announced = true;
        self.observer.on_cue(cause.cue());
        self.observer.on_hud_message(cause.hud_message());
        self.observer.on_departure(cause);
    }

    /// Called once the departure delay has elapsed: tears the trip down, rolls
    /// the payout and grants experience.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Trip` if no end condition has fired yet and
    /// `SessionError::Reward` if rewards were already rolled.
    pub fn complete_departure(&mut self) -> Result<TripSettlement, SessionError> {
        let report = self.machine.finish()?;
        let reward = self
            .rewards
            .compute_and_populate(report.deckhand_count, report.catch_quantity, self.rng.rewards())?
            .clone();
        Ok(TripSettlement {
            report: Some(report),
            reward: Some(reward),
            experience: self.experience(),
        })
    }

    /// Leave before an end condition fires. Experience is still granted; no payout.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Trip` unless the trip is still active.
    pub fn abandon(&mut self) -> Result<TripSettlement, SessionError> {
        let catch = self.machine.trip().catch_quantity();
        self.machine.abandon()?;
        self.rewards.note_catch(catch);
        Ok(TripSettlement {
            report: None,
            reward: None,
            experience: self.experience(),
        })
    }

    fn experience(&self) -> Vec<DeckhandXp> {
        self.crew
            .iter()
            .map(|deckhand| DeckhandXp {
                id: deckhand.id,
                experience: self.rewards.fishing_xp(deckhand),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        notifications: Vec<Notification>,
        cues: Vec<SoundCue>,
        departures: Vec<EndCause>,
        hud: Vec<String>,
    }

    impl TripObserver for Recorder {
        fn on_notification(&mut self, notification: &Notification) {
            self.notifications.push(notification.clone());
        }

        fn on_cue(&mut self, cue: SoundCue) {
            self.cues.push(cue);
        }

        fn on_departure(&mut self, cause: EndCause) {
            self.departures.push(cause);
        }

        fn on_hud_message(&mut self, message: &str) {
            self.hud.push(message.to_string());
        }
    }

    fn crew(count: u64) -> Vec<Deckhand> {
        (1..=count).map(|id| Deckhand::new(id, 5)).collect()
    }

    fn session(flag: FlagVariant, count: u64) -> TripSession<Recorder> {
        TripSession::launch(
            TrawlerConfig::default(),
            flag,
            crew(count),
            42,
            Recorder::default(),
        )
        .expect("valid launch")
    }

    fn run_to_timeout(session: &mut TripSession<Recorder>) -> EndCause {
        loop {
            if let Some(cause) = session.tick_second() {
                return cause;
            }
        }
    }

    #[test]
    fn launch_rejects_empty_crew_and_bad_config() {
        let empty = TripSession::launch(
            TrawlerConfig::default(),
            FlagVariant::None,
            Vec::new(),
            1,
            NullObserver,
        );
        assert!(matches!(empty, Err(SessionError::NoCrew)));

        let mut cfg = TrawlerConfig::default();
        cfg.trip.duration_ms = 0;
        let invalid = TripSession::launch(cfg, FlagVariant::None, crew(1), 1, NullObserver);
        assert!(matches!(invalid, Err(SessionError::Config(_))));
    }

    #[test]
    fn departure_hook_fires_once_and_rewards_roll_once() {
        let mut session = session(FlagVariant::None, 2);
        assert_eq!(run_to_timeout(&mut session), EndCause::TimedOut);
        for _ in 0..10 {
            session.tick_second();
            session.tick(16);
        }
        assert_eq!(session.observer().departures, vec![EndCause::TimedOut]);
        assert!(session.observer().cues.contains(&SoundCue::TripComplete));
        assert_eq!(
            session.observer().hud,
            vec![EndCause::TimedOut.hud_message().to_string()]
        );

        let settlement = session.complete_departure().expect("ending trip settles");
        assert_eq!(settlement.cause(), Some(EndCause::TimedOut));
        assert!(settlement.reward.is_some());
        assert_eq!(settlement.experience.len(), 2);
        assert!(matches!(
            session.complete_departure(),
            Err(SessionError::Trip(TripError::NotEnding(TripPhase::Reset)))
        ));
    }

    #[test]
    fn settling_before_an_end_condition_is_refused() {
        let mut session = session(FlagVariant::None, 1);
        assert!(matches!(
            session.complete_departure(),
            Err(SessionError::Trip(TripError::NotEnding(TripPhase::Active)))
        ));
    }

    #[test]
    fn abandoning_grants_xp_without_payout() {
        let mut session = session(FlagVariant::None, 1);
        for _ in 0..12 {
            session.tick_second();
        }
        let catch = session.trip().catch_quantity();
        let settlement = session.abandon().expect("active trip abandons");
        assert!(settlement.report.is_none());
        assert!(settlement.reward.is_none());
        assert_eq!(session.rewards().catch_noted(), catch);
        assert!(settlement.experience[0].experience > 0);
        assert!(session.rewards().result().is_none());
        assert_eq!(session.phase(), TripPhase::Reset);
    }

    #[test]
    fn solo_menu_pauses_but_crewed_trip_sails_on() {
        let mut solo = session(FlagVariant::None, 1);
        solo.set_menu_open(true);
        solo.tick_second();
        assert_eq!(solo.trip().remaining_time_ms(), 60_000);
        solo.set_menu_open(false);
        solo.tick_second();
        assert_eq!(solo.trip().remaining_time_ms(), 59_000);

        let mut crewed = session(FlagVariant::None, 2);
        crewed.set_menu_open(true);
        crewed.tick_second();
        assert_eq!(crewed.trip().remaining_time_ms(), 59_000);
        assert!(crewed.menu_open());
    }

    #[test]
    fn rounds_reach_the_observer() {
        let mut session = session(FlagVariant::None, 1);
        for _ in 0..30 {
            session.tick_second();
        }
        assert!(!session.observer().notifications.is_empty());
        assert!(session.rng_draws()[0] > 0);
    }

    #[test]
    fn repairs_route_through_the_session() {
        let mut session = session(FlagVariant::None, 1);
        for _ in 0..50 {
            if session.vessel().total_active() > 0 {
                break;
            }
            session.tick_second();
        }
        let (category, slot) = HazardCategory::ALL
            .into_iter()
            .find_map(|category| {
                session
                    .vessel()
                    .zone(category)
                    .active_indices()
                    .next()
                    .map(|slot| (category, usize::from(slot)))
            })
            .expect("an active hazard");
        assert!(session.repair(category, slot, 1));
        assert!(!session.repair(category, slot, 1));
    }
}

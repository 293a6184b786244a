//! Hazard event scheduling and notification selection.
//!
//! The scheduler fires on a re-rolled interval of coarse ticks. Each firing is
//! a *round*: a handful of event slots survive an increasingly likely skip
//! roll, each surviving slot tries to break one thing (nets before pipes before
//! the hull), and the round's candidate messages are reduced to one line of
//! text by weighted frequency.
use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::EventConfig;
use crate::constants::{
    MSG_CALM, MSG_ENGINE_PROBLEM, MSG_EVERYTHING_FAILING, MSG_LEAK_PROBLEM, MSG_LOSING_FISH,
    MSG_MAX_LEAKS, MSG_MULTI_PROBLEMS, MSG_NET_PROBLEM, MSG_NO_EVENTS, MSG_SEA_FAVORS,
    SEVERITY_ENGINE_PROBLEM, SEVERITY_EVERYTHING_FAILING, SEVERITY_LEAK_PROBLEM,
    SEVERITY_LOSING_FISH, SEVERITY_MAX_LEAKS, SEVERITY_MULTI_PROBLEMS, SEVERITY_NET_PROBLEM,
};
use crate::hazard::HazardCategory;
use crate::vessel::Vessel;

/// Crew-facing message produced by a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripMessage {
    EverythingFailing,
    LosingFish,
    MaxLeaks,
    MultipleProblems,
    EngineProblem,
    NetProblem,
    LeakProblem,
    SeaFavors,
    NoEvents,
    Calm,
}

impl TripMessage {
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::EverythingFailing => MSG_EVERYTHING_FAILING,
            Self::LosingFish => MSG_LOSING_FISH,
            Self::MaxLeaks => MSG_MAX_LEAKS,
            Self::MultipleProblems => MSG_MULTI_PROBLEMS,
            Self::EngineProblem => MSG_ENGINE_PROBLEM,
            Self::NetProblem => MSG_NET_PROBLEM,
            Self::LeakProblem => MSG_LEAK_PROBLEM,
            Self::SeaFavors => MSG_SEA_FAVORS,
            Self::NoEvents => MSG_NO_EVENTS,
            Self::Calm => MSG_CALM,
        }
    }

    /// Base severity used when weighting candidates; calm lines never compete.
    #[must_use]
    pub const fn severity(self) -> u32 {
        match self {
            Self::EverythingFailing => SEVERITY_EVERYTHING_FAILING,
            Self::LosingFish => SEVERITY_LOSING_FISH,
            Self::MaxLeaks => SEVERITY_MAX_LEAKS,
            Self::MultipleProblems => SEVERITY_MULTI_PROBLEMS,
            Self::EngineProblem => SEVERITY_ENGINE_PROBLEM,
            Self::NetProblem => SEVERITY_NET_PROBLEM,
            Self::LeakProblem => SEVERITY_LEAK_PROBLEM,
            Self::SeaFavors | Self::NoEvents | Self::Calm => 0,
        }
    }
}

/// Message candidate carrying its base severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCandidate {
    pub message: TripMessage,
    pub severity: u32,
}

impl From<TripMessage> for MessageCandidate {
    fn from(message: TripMessage) -> Self {
        Self {
            message,
            severity: message.severity(),
        }
    }
}

pub type CandidateSet = SmallVec<[MessageCandidate; 8]>;

/// Pick the candidate maximizing `severity × (candidates sharing its text)`.
/// Ties keep the earliest candidate.
#[must_use]
pub fn select_message(candidates: &[MessageCandidate]) -> Option<TripMessage> {
    let mut best: Option<(u32, TripMessage)> = None;
    for candidate in candidates {
        let text = candidate.message.text();
        let frequency = candidates
            .iter()
            .filter(|other| other.message.text() == text)
            .count();
        let score = candidate
            .severity
            .saturating_mul(u32::try_from(frequency).unwrap_or(u32::MAX));
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, candidate.message));
        }
    }
    best.map(|(_, message)| message)
}

/// One hazard creation attempt made by a surviving event slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardAttempt {
    pub category: HazardCategory,
    pub created: bool,
    pub cascaded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    /// The sea skipped this round entirely.
    SeaFavors,
    /// Every event slot was skipped.
    Quiet,
    /// At least one slot ran.
    Hazards,
}

/// Everything a round decided, in decision order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRound {
    pub kind: RoundKind,
    pub slots: u8,
    pub attempts: SmallVec<[HazardAttempt; 4]>,
    pub candidates: CandidateSet,
    pub message: TripMessage,
}

impl EventRound {
    #[must_use]
    pub fn created(&self) -> usize {
        self.attempts.iter().filter(|attempt| attempt.created).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventScheduler {
    cfg: EventConfig,
    countdown_secs: u32,
    rounds_fired: u32,
}

impl EventScheduler {
    #[must_use]
    pub const fn new(cfg: EventConfig) -> Self {
        let countdown_secs = cfg.initial_delay_secs;
        Self {
            cfg,
            countdown_secs,
            rounds_fired: 0,
        }
    }

    /// Coarse ticks left before the next round.
    #[must_use]
    pub const fn countdown(&self) -> u32 {
        self.countdown_secs
    }

    #[must_use]
    pub const fn rounds_fired(&self) -> u32 {
        self.rounds_fired
    }

    pub const fn reset(&mut self) {
        self.countdown_secs = self.cfg.initial_delay_secs;
        self.rounds_fired = 0;
    }

    /// Count down one coarse tick, running a round when the interval elapses.
    pub fn tick_second<R: Rng + ?Sized>(
        &mut self,
        vessel: &mut Vessel,
        rng: &mut R,
    ) -> Option<EventRound> {
        self.countdown_secs = self.countdown_secs.saturating_sub(1);
        if self.countdown_secs > 0 {
            return None;
        }
        let round = self.run_round(vessel, rng);
        self.rounds_fired += 1;
        self.countdown_secs = self.reroll_interval(rng);
        debug!(
            "event round {} -> {:?} ({} created), next in {}s",
            self.rounds_fired,
            round.message,
            round.created(),
            self.countdown_secs
        );
        Some(round)
    }

    fn reroll_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let units = rng.gen_range(self.cfg.interval_min_units..=self.cfg.interval_max_units);
        units.saturating_mul(self.cfg.interval_unit_secs).max(1)
    }

    /// Run a single round against the vessel. Selection is a pure function of
    /// the round's draws and the vessel state it finds.
    pub fn run_round<R: Rng + ?Sized>(&self, vessel: &mut Vessel, rng: &mut R) -> EventRound {
        let mut round = EventRound {
            kind: RoundKind::Hazards,
            slots: 0,
            attempts: SmallVec::new(),
            candidates: CandidateSet::new(),
            message: TripMessage::Calm,
        };

        if rng.r#gen::<f64>() < self.cfg.sea_favors_chance {
            round.kind = RoundKind::SeaFavors;
            round.message = TripMessage::SeaFavors;
            return round;
        }

        for slot in 0..self.cfg.max_slots {
            let skip_chance = self.cfg.slot_skip_base + self.cfg.slot_skip_step * f64::from(slot);
            if rng.r#gen::<f64>() < skip_chance {
                continue;
            }
            round.slots += 1;
        }
        if round.slots == 0 {
            round.kind = RoundKind::Quiet;
            round.message = TripMessage::NoEvents;
            return round;
        }

        for _ in 0..round.slots {
            let Some(attempt) = self.attempt_one(vessel, rng) else {
                continue;
            };
            trace!("slot attempt {attempt:?}");
            round.attempts.push(attempt);
            if attempt.created {
                round
                    .candidates
                    .push(Self::attempt_message(attempt.category, vessel).into());
            }
        }

        if vessel.everything_failing() {
            round
                .candidates
                .push(TripMessage::EverythingFailing.into());
        }
        if round.created() > 1 {
            round.candidates.push(TripMessage::MultipleProblems.into());
        }

        round.message = select_message(&round.candidates).unwrap_or(TripMessage::Calm);
        round
    }

    fn attempt_one<R: Rng + ?Sized>(
        &self,
        vessel: &mut Vessel,
        rng: &mut R,
    ) -> Option<HazardAttempt> {
        if !vessel.net.all_active() && rng.r#gen::<f64>() < self.cfg.net_rip_chance {
            return Some(HazardAttempt {
                category: HazardCategory::Net,
                created: vessel.net.attempt_create(),
                cascaded: false,
            });
        }

        if !vessel.pipe.all_active() && rng.r#gen::<f64>() < self.cfg.pipe_leak_chance {
            return Some(HazardAttempt {
                category: HazardCategory::Pipe,
                created: vessel.pipe.attempt_create(),
                cascaded: false,
            });
        }

        if vessel.hull.leaks_enabled() && !vessel.hull.all_active() {
            let created = vessel.hull.attempt_create();
            let cascaded = created && vessel.hull.cascades();
            if cascaded {
                vessel.hull.force_all_active();
            }
            return Some(HazardAttempt {
                category: HazardCategory::Hull,
                created,
                cascaded,
            });
        }

        None
    }

    fn attempt_message(category: HazardCategory, vessel: &Vessel) -> TripMessage {
        match category {
            HazardCategory::Net if vessel.losing_fish() => TripMessage::LosingFish,
            HazardCategory::Net => TripMessage::NetProblem,
            HazardCategory::Pipe if vessel.losing_fish() => TripMessage::LosingFish,
            HazardCategory::Pipe => TripMessage::EngineProblem,
            HazardCategory::Hull if vessel.hull.all_active() => TripMessage::MaxLeaks,
            HazardCategory::Hull => TripMessage::LeakProblem,
        }
    }
}

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use trawler_core::{
    ActorId, Deckhand, Directive, EndCause, HazardCategory, Notification, SoundCue, TripObserver,
    TripSession,
};

/// Crew stand-in that walks the deck once per second and patches what it finds.
#[derive(Debug)]
pub struct ScriptedCrew {
    rng: SmallRng,
    repair_rate: f64,
    hands: Vec<ActorId>,
}

impl ScriptedCrew {
    #[must_use]
    pub fn new(seed: u64, repair_rate: f64, crew: &[Deckhand]) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            repair_rate: repair_rate.clamp(0.0, 1.0),
            hands: crew.iter().map(|hand| hand.id).collect(),
        }
    }

    /// One second of work: each active hazard is repaired with `repair_rate`
    /// probability by a randomly chosen hand. Returns the repairs made.
    pub fn work<O: TripObserver>(&mut self, session: &mut TripSession<O>) -> u32 {
        if self.hands.is_empty() {
            return 0;
        }
        let mut repaired = 0;
        for category in HazardCategory::ALL {
            let active: Vec<u8> = session.vessel().zone(category).active_indices().collect();
            for slot in active {
                if self.rng.r#gen::<f64>() >= self.repair_rate {
                    continue;
                }
                let actor = self.hands[self.rng.gen_range(0..self.hands.len())];
                if session.repair(category, usize::from(slot), actor) {
                    repaired += 1;
                }
            }
        }
        repaired
    }
}

/// Observer that only counts what the host would have shown or played.
#[derive(Debug, Clone, Default)]
pub struct TallyObserver {
    pub messages_shown: u32,
    pub leak_cues: u32,
    pub departures: u32,
}

impl TripObserver for TallyObserver {
    fn on_notification(&mut self, notification: &Notification) {
        if notification.directive == Directive::Show {
            self.messages_shown += 1;
        }
    }

    fn on_cue(&mut self, cue: SoundCue) {
        if matches!(cue, SoundCue::Leak { .. }) {
            self.leak_cues += 1;
        }
    }

    fn on_departure(&mut self, _cause: EndCause) {
        self.departures += 1;
    }
}

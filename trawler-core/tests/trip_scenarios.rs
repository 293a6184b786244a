use rand::rngs::mock::StepRng;
use trawler_core::{
    Deckhand, Directive, EndCause, EventConfig, EventScheduler, FlagVariant, HazardCategory,
    Notification, NullObserver, RngBundle, SoundCue, TrawlerConfig, TripMachine, TripMessage,
    TripObserver, TripPhase, TripSession, Vessel, ZoneConfig,
};

#[derive(Debug, Default)]
struct Log {
    shown: Vec<String>,
    directives: Vec<Directive>,
    cues: Vec<SoundCue>,
    departures: Vec<EndCause>,
}

impl TripObserver for Log {
    fn on_notification(&mut self, notification: &Notification) {
        if notification.directive == Directive::Show {
            self.shown.push(notification.text.clone());
        }
        self.directives.push(notification.directive);
    }

    fn on_cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    fn on_departure(&mut self, cause: EndCause) {
        self.departures.push(cause);
    }
}

fn launch(flag: FlagVariant, seed: u64, crew: u64) -> TripSession<Log> {
    let crew = (1..=crew).map(|id| Deckhand::new(id, 4)).collect();
    TripSession::launch(TrawlerConfig::default(), flag, crew, seed, Log::default())
        .expect("default config launches")
}

/// One host frame: sixty fine ticks and one coarse tick.
fn frame(session: &mut TripSession<Log>) -> Option<EndCause> {
    let mut ended = None;
    for _ in 0..60 {
        ended = ended.or(session.tick(16));
    }
    ended.or(session.tick_second())
}

#[test]
fn unattended_trip_ends_and_settles_once() {
    let mut session = launch(FlagVariant::None, 2024, 1);
    let mut cause = None;
    for _ in 0..60 {
        cause = frame(&mut session);
        if cause.is_some() {
            break;
        }
    }
    let cause = cause.expect("trip ends within its minute");
    assert_eq!(session.phase(), TripPhase::Ending(cause));
    assert_eq!(session.observer().departures, vec![cause]);

    let settlement = session.complete_departure().expect("settles");
    assert_eq!(settlement.cause(), Some(cause));
    assert!(session.complete_departure().is_err());
    assert_eq!(session.vessel().total_active(), 0);
}

#[test]
fn diligent_crew_never_floods() {
    let mut session = launch(FlagVariant::None, 7, 2);
    let cause = loop {
        let ended = frame(&mut session);
        for category in HazardCategory::ALL {
            let active: Vec<u8> = session.vessel().zone(category).active_indices().collect();
            for slot in active {
                assert!(session.repair(category, usize::from(slot), 2));
            }
        }
        if let Some(cause) = ended {
            break cause;
        }
    };
    assert_eq!(cause, EndCause::TimedOut);
    let report = session
        .complete_departure()
        .expect("settles")
        .report
        .expect("finished trips report");
    assert!(report.catch_quantity > 100);
    assert_eq!(report.seconds_elapsed, 60);
}

#[test]
fn same_seed_same_story() {
    let story = |seed: u64| {
        let mut session = launch(FlagVariant::JollyRoger, seed, 1);
        while frame(&mut session).is_none() {}
        let settlement = session.complete_departure().expect("settles");
        (session.observer().shown.clone(), settlement)
    };
    assert_eq!(story(31), story(31));
}

#[test]
fn parley_trips_never_leak() {
    let mut session = launch(FlagVariant::Parley, 12, 1);
    while frame(&mut session).is_none() {
        assert_eq!(session.vessel().hull.active_count(), 0);
        assert_eq!(session.vessel().hull.water_level(), 0);
    }
    assert_eq!(session.phase(), TripPhase::Ending(EndCause::TimedOut));
    assert!(
        !session
            .observer()
            .cues
            .iter()
            .any(|cue| matches!(cue, SoundCue::Leak { .. }))
    );
}

#[test]
fn shown_messages_fade_and_expire() {
    let mut session = launch(FlagVariant::None, 3, 1);
    while frame(&mut session).is_none() {}
    let directives = &session.observer().directives;
    assert!(directives.contains(&Directive::Show));
    assert!(directives.contains(&Directive::Fade));
    assert!(directives.contains(&Directive::Expire));
}

#[test]
fn weak_hull_cascades_on_first_leak() {
    let mut vessel = Vessel::new(&ZoneConfig::default());
    vessel.configure(&FlagVariant::JollyRoger.modifiers());
    let scheduler = EventScheduler::new(EventConfig {
        net_rip_chance: 0.0,
        pipe_leak_chance: 0.0,
        sea_favors_chance: 0.0,
        slot_skip_base: 0.0,
        slot_skip_step: 0.0,
        ..EventConfig::default()
    });
    // every draw lands at zero: no favor, all slots kept, hull always tried
    let mut rng = StepRng::new(0, 0);
    let round = scheduler.run_round(&mut vessel, &mut rng);
    assert_eq!(vessel.hull.active_count(), 4);
    assert!(round.attempts[0].cascaded);
    assert_eq!(round.message, TripMessage::MaxLeaks);
}

#[test]
fn round_selection_is_a_function_of_the_draws() {
    let run = || {
        let mut bundle = RngBundle::from_user_seed(0xDEC0DE);
        let mut vessel = Vessel::new(&ZoneConfig::default());
        let scheduler = EventScheduler::new(EventConfig::default());
        (0..25)
            .map(|_| scheduler.run_round(&mut vessel, bundle.events()).message)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn machine_rejects_ticks_outside_a_trip() {
    let result = std::panic::catch_unwind(|| {
        let mut machine = TripMachine::new(TrawlerConfig::default());
        let mut bundle = RngBundle::from_user_seed(0);
        machine.advance(16, bundle.ambience());
    });
    assert!(result.is_err());
}

#[test]
fn xp_is_granted_whether_or_not_the_trip_succeeds() {
    let mut cfg = TrawlerConfig::default();
    cfg.trip.water_recalc_interval_ticks = 1;
    cfg.events = EventConfig {
        net_rip_chance: 0.0,
        pipe_leak_chance: 0.0,
        sea_favors_chance: 0.0,
        slot_skip_base: 0.0,
        slot_skip_step: 0.0,
        ..EventConfig::default()
    };
    let mut sinking = TripSession::launch(
        cfg,
        FlagVariant::JollyRoger,
        vec![Deckhand::new(1, 4)],
        5,
        NullObserver,
    )
    .expect("launches");
    let cause = loop {
        let ended = sinking
            .tick_second()
            .or_else(|| (0..30).find_map(|_| sinking.tick(16)));
        if let Some(cause) = ended {
            break cause;
        }
    };
    assert_eq!(cause, EndCause::Flooded);
    let failure = sinking.complete_departure().expect("settles");
    // two hauls of 12 before the first round at ten seconds, then quartered
    assert_eq!(failure.report.as_ref().map(|r| r.catch_quantity), Some(31));
    assert!(failure.experience[0].experience > 0);

    let mut timed_out = launch(FlagVariant::None, 5, 1);
    while frame(&mut timed_out).is_none() {}
    let success = timed_out.complete_departure().expect("settles");
    assert!(success.experience[0].experience > 0);

    let mut abandoned = launch(FlagVariant::None, 5, 1);
    let early = abandoned.abandon().expect("abandons");
    assert!(early.experience[0].experience > 0);
    assert!(early.reward.is_none());
}

use anyhow::{Context, Result, bail};
use chrono::Weekday;
use log::{debug, info};
use serde::Serialize;
use std::convert::Infallible;
use trawler_core::{
    Deckhand, EndCause, FlagVariant, GambleOutcome, MemoryStore, RewardResult, RewardSink,
    TrawlerConfig, TrawlerEngine, TripSession,
};

use super::crew::{ScriptedCrew, TallyObserver};

const FINE_TICK_MS: u32 = 16;
const FINE_TICKS_PER_FRAME: u32 = 60;
/// Generous upper bound; the longest flag runs two minutes.
const MAX_FRAMES: u32 = 600;

/// What to run: every seed against every flag with the same crew.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub seeds: Vec<u64>,
    pub flags: Vec<FlagVariant>,
    pub crew_size: u64,
    pub fishing_level: u8,
    pub repair_rate: f64,
}

impl SimulationPlan {
    fn crew(&self) -> Vec<Deckhand> {
        (1..=self.crew_size.max(1))
            .map(|id| Deckhand::new(id, self.fishing_level))
            .collect()
    }
}

/// Outcome of one (seed, flag) trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRun {
    pub seed: u64,
    pub flag: FlagVariant,
    pub cause: EndCause,
    pub seconds_elapsed: u32,
    pub catch_quantity: u32,
    pub water_level: u8,
    pub rounds_fired: u32,
    pub repairs: u32,
    pub messages_shown: u32,
    pub leak_cues: u32,
    pub total_items: u32,
    pub total_fish: u32,
    pub gamble: GambleOutcome,
    pub experience: u32,
    pub recorded_success: bool,
}

/// Per-flag rollup of many runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagSummary {
    pub flag: FlagVariant,
    pub trips: usize,
    pub floods: usize,
    pub average_catch: f64,
    pub average_fish: f64,
    pub total_experience: u64,
}

impl FlagSummary {
    #[must_use]
    pub fn flood_rate(&self) -> f64 {
        if self.trips == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.floods as f64 / self.trips as f64;
        rate
    }
}

/// Sink that keeps every payout it is handed.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub deposits: Vec<RewardResult>,
}

impl RewardSink for CollectingSink {
    type Error = Infallible;

    fn deposit(&mut self, reward: &RewardResult) -> Result<(), Self::Error> {
        self.deposits.push(reward.clone());
        Ok(())
    }
}

/// Run every (seed, flag) pair in the plan.
///
/// # Errors
///
/// Returns an error if any trip fails to launch, settle, or end in time.
pub fn run_plan(config: &TrawlerConfig, plan: &SimulationPlan) -> Result<Vec<TripRun>> {
    let mut runs = Vec::with_capacity(plan.seeds.len() * plan.flags.len());
    for &seed in &plan.seeds {
        for &flag in &plan.flags {
            let run = run_trip(config, plan, seed, flag)
                .with_context(|| format!("trip with seed {seed} under {flag}"))?;
            runs.push(run);
        }
    }
    info!("ran {} trips", runs.len());
    Ok(runs)
}

/// Sail one trip to its end and settle it.
///
/// # Errors
///
/// Returns an error if the engine refuses the trip or it never ends.
pub fn run_trip(
    config: &TrawlerConfig,
    plan: &SimulationPlan,
    seed: u64,
    flag: FlagVariant,
) -> Result<TripRun> {
    let mut engine = TrawlerEngine::new(
        config.clone(),
        MemoryStore::default(),
        CollectingSink::default(),
    )?;
    engine.start_day(Weekday::Wed)?;
    engine.ledger_mut().set_hoisted_flag(flag)?;

    let crew = plan.crew();
    let mut hands = ScriptedCrew::new(seed ^ flag as u64, plan.repair_rate, &crew);
    let mut session = engine.launch(crew, seed, TallyObserver::default())?;

    let mut repairs = 0;
    let mut ended = None;
    for _ in 0..MAX_FRAMES {
        ended = frame(&mut session);
        if ended.is_some() {
            break;
        }
        repairs += hands.work(&mut session);
    }
    let Some(cause) = ended else {
        bail!("trip did not end within {MAX_FRAMES} frames");
    };
    debug!("seed {seed} under {flag} ended: {cause:?}");
    engine.record_departure(cause)?;

    let settlement = session.complete_departure()?;
    engine.settle(&settlement)?;
    debug!("{} payout(s) deposited", engine.sink().deposits.len());

    let report = settlement.report.context("finished trip has no report")?;
    let reward = settlement.reward.context("finished trip has no payout")?;
    let tally = session.observer();
    if tally.departures != 1 {
        bail!("departure announced {} times", tally.departures);
    }
    Ok(TripRun {
        seed,
        flag,
        cause,
        seconds_elapsed: report.seconds_elapsed,
        catch_quantity: report.catch_quantity,
        water_level: report.water_level,
        rounds_fired: report.rounds_fired,
        repairs,
        messages_shown: tally.messages_shown,
        leak_cues: tally.leak_cues,
        total_items: reward.total_items(),
        total_fish: reward.total_fish(),
        gamble: reward.gamble,
        experience: settlement.experience.iter().map(|xp| xp.experience).sum(),
        recorded_success: engine.ledger().trip_successful()?,
    })
}

/// One host frame: a second of fine ticks, then the coarse tick.
fn frame(session: &mut TripSession<TallyObserver>) -> Option<EndCause> {
    let mut ended = None;
    for _ in 0..FINE_TICKS_PER_FRAME {
        ended = ended.or(session.tick(FINE_TICK_MS));
    }
    ended.or_else(|| session.tick_second())
}

/// Group runs by flag, in first-seen order.
#[must_use]
pub fn summarize(runs: &[TripRun]) -> Vec<FlagSummary> {
    let mut flags: Vec<FlagVariant> = Vec::new();
    for run in runs {
        if !flags.contains(&run.flag) {
            flags.push(run.flag);
        }
    }

    flags
        .into_iter()
        .map(|flag| {
            let group: Vec<&TripRun> = runs.iter().filter(|run| run.flag == flag).collect();
            let trips = group.len();
            #[allow(clippy::cast_precision_loss)]
            let average = |value: fn(&TripRun) -> u32| {
                group.iter().map(|run| f64::from(value(run))).sum::<f64>() / trips as f64
            };
            FlagSummary {
                flag,
                trips,
                floods: group
                    .iter()
                    .filter(|run| run.cause == EndCause::Flooded)
                    .count(),
                average_catch: average(|run| run.catch_quantity),
                average_fish: average(|run| run.total_fish),
                total_experience: group.iter().map(|run| u64::from(run.experience)).sum(),
            }
        })
        .collect()
}

pub mod crew;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use seeds::{resolve_flags, resolve_seeds};
pub use simulation::{FlagSummary, SimulationPlan, TripRun, run_plan, summarize};

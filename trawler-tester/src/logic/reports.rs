use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use trawler_core::EndCause;

use super::simulation::{FlagSummary, TripRun};

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a [FlagSummary],
    runs: &'a [TripRun],
}

const fn cause_label(cause: EndCause) -> &'static str {
    match cause {
        EndCause::Flooded => "flooded",
        EndCause::TimedOut => "timed out",
    }
}

pub fn generate_console_report<W: Write>(
    writer: &mut W,
    runs: &[TripRun],
    summary: &[FlagSummary],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Trawler Trip Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "=======================".cyan())?;

    let floods = runs
        .iter()
        .filter(|run| run.cause == EndCause::Flooded)
        .count();
    writeln!(writer, "Trips sailed: {}", runs.len())?;
    writeln!(writer, "Returned: {}", (runs.len() - floods).to_string().green())?;
    writeln!(writer, "Flooded: {}", floods.to_string().red())?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for flag in summary {
        let rate = format!("{:.0}% flooded", flag.flood_rate() * 100.0);
        let rate = if flag.floods == 0 {
            rate.green()
        } else {
            rate.yellow()
        };
        writeln!(writer, "{} ({} trips, {rate})", flag.flag.to_string().bold(), flag.trips)?;
        writeln!(writer, "   Average catch: {:.1}", flag.average_catch)?;
        writeln!(writer, "   Average fish paid: {:.1}", flag.average_fish)?;
        writeln!(writer, "   Experience granted: {}", flag.total_experience)?;
    }

    if runs.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "{}", "🎣 Individual Trips".bright_yellow().bold())?;
    writeln!(writer, "{}", "===================".yellow())?;
    for run in runs {
        let status = match run.cause {
            EndCause::TimedOut => "⚓ BACK".green(),
            EndCause::Flooded => "🌊 SUNK".red(),
        };
        writeln!(
            writer,
            "{status} seed {} {}: catch {} after {}s, {} items ({} fish), gamble {:?}, {} xp",
            run.seed,
            run.flag,
            run.catch_quantity,
            run.seconds_elapsed,
            run.total_items,
            run.total_fish,
            run.gamble,
            run.experience
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write>(
    writer: &mut W,
    runs: &[TripRun],
    summary: &[FlagSummary],
) -> Result<()> {
    let report = JsonReport { summary, runs };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write>(
    writer: &mut W,
    runs: &[TripRun],
    summary: &[FlagSummary],
) -> Result<()> {
    writeln!(writer, "# Trawler Trip Results\n")?;

    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "| Flag | Trips | Flooded | Avg catch | Avg fish | XP |")?;
    writeln!(writer, "|------|------:|--------:|----------:|---------:|---:|")?;
    for flag in summary {
        writeln!(
            writer,
            "| {} | {} | {} | {:.1} | {:.1} | {} |",
            flag.flag,
            flag.trips,
            flag.floods,
            flag.average_catch,
            flag.average_fish,
            flag.total_experience
        )?;
    }

    writeln!(writer, "\n## Trips\n")?;
    writeln!(writer, "| Seed | Flag | Ended | Seconds | Catch | Items | Repairs |")?;
    writeln!(writer, "|-----:|------|-------|--------:|------:|------:|--------:|")?;
    for run in runs {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} | {} | {} |",
            run.seed,
            run.flag,
            cause_label(run.cause),
            run.seconds_elapsed,
            run.catch_quantity,
            run.total_items,
            run.repairs
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::simulation::summarize;
    use trawler_core::{FlagVariant, GambleOutcome};

    fn run(flag: FlagVariant, cause: EndCause) -> TripRun {
        TripRun {
            seed: 9,
            flag,
            cause,
            seconds_elapsed: 60,
            catch_quantity: 240,
            water_level: 0,
            rounds_fired: 12,
            repairs: 5,
            messages_shown: 8,
            leak_cues: 0,
            total_items: 40,
            total_fish: 30,
            gamble: GambleOutcome::NotPlayed,
            experience: 77,
            recorded_success: cause == EndCause::TimedOut,
        }
    }

    fn sample() -> Vec<TripRun> {
        vec![
            run(FlagVariant::Parley, EndCause::TimedOut),
            run(FlagVariant::JollyRoger, EndCause::Flooded),
        ]
    }

    #[test]
    fn json_report_carries_summary_and_runs() {
        let runs = sample();
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &runs, &summarize(&runs)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["runs"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["summary"][1]["flag"], "JollyRoger");
        assert_eq!(value["runs"][1]["cause"], "flooded");
    }

    #[test]
    fn markdown_report_has_a_row_per_trip() {
        let runs = sample();
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &runs, &summarize(&runs)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# Trawler Trip Results"));
        assert!(text.contains("| 9 | Parley | timed out | 60 | 240 | 40 | 5 |"));
        assert!(text.contains("| 9 | JollyRoger | flooded |"));
    }

    #[test]
    fn console_report_counts_floods() {
        colored::control::set_override(false);
        let runs = sample();
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &runs, &summarize(&runs), Duration::from_millis(5))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Trips sailed: 2"));
        assert!(text.contains("Flooded: 1"));
        assert!(text.contains("JollyRoger (1 trips, 100% flooded)"));
    }
}

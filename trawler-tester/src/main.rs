mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;
use trawler_core::TrawlerConfig;

use logic::{
    FlagSummary, SimulationPlan, TripRun, resolve_flags, resolve_seeds, run_plan, summarize,
};
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "trawler-tester", version = "0.1.0")]
#[command(about = "Headless batch runs of trawler trips with a scripted crew")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Flags to hoist (comma-separated keys, or `all`)
    #[arg(long, default_value = "all")]
    flags: String,

    /// Number of deckhands aboard
    #[arg(long, default_value_t = 2)]
    crew: u64,

    /// Fishing level of every deckhand (0-10)
    #[arg(long, default_value_t = 4)]
    fishing_level: u8,

    /// Chance per second that the crew fixes each active hazard
    #[arg(long, default_value_t = 0.6)]
    repair_rate: f64,

    /// Optional JSON file overriding the trip configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let start_time = Instant::now();
    if args.report == "console" {
        announce_banner(&args);
    }

    let config = load_config(args.config.as_ref())?;
    let plan = build_plan(&args)?;
    let runs = run_plan(&config, &plan)?;
    let summary = summarize(&runs);

    write_reports(&args, &runs, &summary, start_time)
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn announce_banner(args: &Args) {
    println!("{}", "🚢 Trawler Trip Tester".bright_cyan().bold());
    println!("{}", "=".repeat(30).cyan());
    println!("Seeds: {}", args.seeds.yellow());
    println!("Flags: {}", args.flags.yellow());
    println!("Crew: {} (repair rate {:.2})", args.crew, args.repair_rate);
    println!();
}

fn load_config(path: Option<&PathBuf>) -> Result<TrawlerConfig> {
    let Some(path) = path else {
        return Ok(TrawlerConfig::default());
    };
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    TrawlerConfig::from_json(&raw).with_context(|| format!("invalid config in {}", path.display()))
}

fn build_plan(args: &Args) -> Result<SimulationPlan> {
    if !(0.0..=1.0).contains(&args.repair_rate) {
        bail!("repair rate must be within 0..=1, got {}", args.repair_rate);
    }
    if args.crew == 0 {
        bail!("a trip needs at least one deckhand");
    }
    Ok(SimulationPlan {
        seeds: resolve_seeds(&split_csv(&args.seeds))?,
        flags: resolve_flags(&split_csv(&args.flags))?,
        crew_size: args.crew,
        fishing_level: args.fishing_level,
        repair_rate: args.repair_rate,
    })
}

fn write_reports(
    args: &Args,
    runs: &[TripRun],
    summary: &[FlagSummary],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, runs, summary)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, runs, summary)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                runs,
                summary,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trawler_core::FlagVariant;

    fn base_args() -> Args {
        Args {
            seeds: "3,4".to_string(),
            flags: "parley".to_string(),
            crew: 2,
            fishing_level: 4,
            repair_rate: 0.6,
            config: None,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "trawler-tester-{name}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn cli_parses_defaults() {
        let args = Args::parse_from(["trawler-tester"]);
        assert_eq!(args.seeds, "1337");
        assert_eq!(args.flags, "all");
        assert_eq!(args.crew, 2);
        assert_eq!(args.report, "console");
    }

    #[test]
    fn cli_rejects_unknown_report_formats() {
        assert!(Args::try_parse_from(["trawler-tester", "--report", "csv"]).is_err());
    }

    #[test]
    fn plan_resolves_seeds_and_flags() {
        let plan = build_plan(&base_args()).unwrap();
        assert_eq!(plan.seeds, vec![3, 4]);
        assert_eq!(plan.flags, vec![FlagVariant::Parley]);
    }

    #[test]
    fn plan_rejects_out_of_range_rates_and_empty_crews() {
        let mut args = base_args();
        args.repair_rate = 1.5;
        assert!(build_plan(&args).is_err());

        let mut args = base_args();
        args.crew = 0;
        assert!(build_plan(&args).is_err());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let path = temp_path("missing.json");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let path = temp_path("config.json");
        fs::write(&path, r#"{ "trip": { "duration_ms": 30000 } }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.trip.duration_ms, 30_000);
        assert_eq!(config, {
            let mut expected = TrawlerConfig::default();
            expected.trip.duration_ms = 30_000;
            expected
        });
    }

    #[test]
    fn reports_can_be_written_to_a_file() {
        let path = temp_path("report.json");
        let mut args = base_args();
        args.output = Some(path.clone());
        let plan = build_plan(&args).unwrap();
        let runs = run_plan(&TrawlerConfig::default(), &plan).unwrap();
        write_reports(&args, &runs, &summarize(&runs), Instant::now()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["runs"].as_array().map(Vec::len), Some(2));
    }
}

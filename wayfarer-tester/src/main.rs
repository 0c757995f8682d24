mod reports;
mod runner;
mod scenarios;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use runner::{LogicTester, ScenarioResult};
use scenarios::{expand_scenarios, get_scenario, list_scenarios};
use util::{resolve_cycles, resolve_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "wayfarer-tester", version = "0.1.0")]
#[command(about = "Automated QA for the Wayfarer campaign engine using seeded random campaigns")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Content cycles to run against (comma-separated: core, loa, all)
    #[arg(long, default_value = "all")]
    cycles: String,

    /// Seeds to run (comma-separated, decimal or 0x-prefixed hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario, cycle and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Actions per randomized run
    #[arg(long, default_value_t = 200)]
    steps: usize,

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
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner(&args);

    let start_time = Instant::now();
    let scenarios = expand_scenarios(split_csv(&args.scenarios));
    let cycles = resolve_cycles(&split_csv(&args.cycles))?;
    let seeds = resolve_seeds(&split_csv(&args.seeds))?;
    log::info!(
        "running {} scenario(s) over cycles {cycles:?} and seeds {seeds:?}",
        scenarios.len()
    );

    let results = run_logic_scenarios(&args, &scenarios, &cycles, &seeds);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner(args: &Args) {
    // Keep machine-readable reports on stdout clean.
    if args.output.is_none() && args.report != "console" {
        return;
    }
    println!("{}", "🧭 Wayfarer Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    cycles: &[wayfarer_game::Cycle],
    seeds: &[u64],
) -> Vec<ScenarioResult> {
    let tester = LogicTester::new(wayfarer_game::content(), args.steps, args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(tester.run_scenario(scenario, cycles, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Wayfarer Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
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

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wayfarer-main-{label}-{}", std::process::id()))
    }

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            cycles: "all".to_string(),
            seeds: "1337".to_string(),
            iterations: 1,
            steps: 50,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    #[test]
    fn list_scenarios_is_noop_without_flag() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn list_scenarios_writes_every_key() {
        let path = temp_path("list");
        let mut args = base_args();
        args.list_scenarios = true;
        args.output = Some(path.clone());
        assert!(maybe_list_scenarios(&args).unwrap());
        let text = std::fs::read_to_string(&path).unwrap();
        for (key, _) in list_scenarios() {
            assert!(text.contains(key));
        }
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn write_reports_emits_markdown_for_empty_results() {
        let path = temp_path("markdown");
        let mut args = base_args();
        args.report = "markdown".to_string();
        args.output = Some(path.clone());
        write_reports(&args, &[], Instant::now()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("_No scenarios executed._"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unknown_scenarios_are_skipped() {
        let mut args = base_args();
        args.scenarios = "smoke,not-a-scenario".to_string();
        let scenarios = expand_scenarios(split_csv(&args.scenarios));
        let results = run_logic_scenarios(
            &args,
            &scenarios,
            &[wayfarer_game::Cycle::Core],
            &[1],
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
    }
}

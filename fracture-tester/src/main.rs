mod logic;
mod scenario;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use fracture_game::{
    BriefingConfig, BriefingEngine, BriefingPacket, CatalogLoader, ConditionEvaluator, GameState,
};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use logic::{
    BriefingTester, FileLoader, LogicTester, TesterAssets, default_data_root, load_state,
    resolve_seed_inputs,
};
use scenario::{get_scenario, list_scenarios};
use util::{parse_issued_at, split_csv};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunMode {
    /// Run QA scenarios against the shipped content
    Scenarios,
    /// Compose and print one briefing packet
    Briefing,
}

#[derive(Debug, Parser)]
#[command(name = "fracture-tester", version)]
#[command(about = "Briefing runner and QA harness for the Fracture weekly briefing")]
struct Args {
    /// Run scenarios or print a single briefing
    #[arg(long, value_enum, default_value_t = RunMode::Scenarios)]
    mode: RunMode,

    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Recommendation seeds (comma-separated; decimal, 0x hex or N..M)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Game-state snapshot to brief (JSON); defaults to a fresh campaign
    #[arg(long)]
    state: Option<PathBuf>,

    /// Party handle used when no snapshot is given
    #[arg(long, default_value = logic::DEFAULT_PARTY)]
    party: String,

    /// Directory holding catalog, archetypes and configuration files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the briefing catalog file
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override the archetypes file
    #[arg(long)]
    archetypes: Option<PathBuf>,

    /// Override the briefing configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluate one condition expression against the state and exit
    #[arg(long, value_name = "EXPR")]
    eval: Option<String>,

    /// Issue time for advisor reports (RFC 3339); defaults to now
    #[arg(long)]
    issued_at: Option<String>,

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

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let loader = build_loader(&args);

    if let Some(expression) = args.eval.as_deref() {
        return run_eval(&args, &loader, expression);
    }

    match args.mode {
        RunMode::Briefing => run_briefing(&args, loader),
        RunMode::Scenarios => {
            announce_banner();
            let start_time = Instant::now();
            let assets = TesterAssets::load(&loader, args.archetypes.as_deref())?;
            let tester = BriefingTester::new(Arc::new(assets), args.verbose);
            let scenarios = expand_scenarios(&args.scenarios);
            let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

            let results = run_logic_scenarios(&args, &scenarios, &seeds, tester);
            write_reports(&args, &results, start_time)?;

            if results.iter().any(|r| !r.passed) {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
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

fn announce_banner() {
    println!("{}", "🗳️  Fracture Briefing Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn build_loader(args: &Args) -> FileLoader {
    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_root);
    let mut loader = FileLoader::new(data_dir);
    if let Some(catalog) = &args.catalog {
        loader = loader.with_catalog(catalog);
    }
    if let Some(config) = &args.config {
        loader = loader.with_config(config);
    }
    loader
}

fn resolve_state(args: &Args, loader: &FileLoader) -> Result<GameState> {
    if let Some(path) = &args.state {
        return load_state(path).context("loading game state");
    }
    let archetypes = loader
        .load_archetypes(args.archetypes.as_deref())
        .context("loading archetypes")?;
    Ok(fracture_game::initial_state(&args.party, &archetypes)?)
}

fn run_eval(args: &Args, loader: &FileLoader, expression: &str) -> Result<()> {
    let config: BriefingConfig = loader
        .load_config(fracture_game::BRIEFING_CONFIG)
        .context("loading briefing configuration")?;
    let state = resolve_state(args, loader)?;
    let outcome = ConditionEvaluator::for_state(&state)
        .with_matching(config.operator_matching())
        .try_evaluate(expression)
        .with_context(|| format!("evaluating `{expression}`"))?;

    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target, "{outcome}")?;
    output_target.flush_inner()?;
    Ok(())
}

fn run_briefing(args: &Args, loader: FileLoader) -> Result<()> {
    let state = resolve_state(args, &loader)?;
    let seed = resolve_seed_inputs(&split_csv(&args.seeds))?
        .first()
        .copied()
        .unwrap_or(logic::seeds::DEFAULT_SEED);
    let issued_at = parse_issued_at(args.issued_at.as_deref())?;

    let engine = BriefingEngine::from_loader(loader)?;
    info!("composing week {} briefing with seed {seed}", state.week);
    let packet = engine
        .generate_seeded(&state, seed, issued_at)
        .context("loading briefing catalog")?;

    write_packet(args, &packet)
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    tester: BriefingTester,
) -> Vec<logic::ScenarioResult> {
    println!("{}", "🧠 Running Briefing Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(tester);
    let mut results: Vec<logic::ScenarioResult> = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(args: &Args, results: &[logic::ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Fracture Briefing Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            let duration = start_time.elapsed();
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(&mut output_target, results, duration)?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

fn write_packet(args: &Args, packet: &BriefingPacket) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => logic::reports::write_packet_json(&mut output_target, packet)?,
        "markdown" => logic::reports::write_packet_markdown(&mut output_target, packet)?,
        _ => logic::reports::write_packet_console(&mut output_target, packet)?,
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

use std::path::PathBuf;

use conditions::{ConditionsError, ConfigLoader, IndicatorConfig, Timeframe, load_bars, load_ticks};
use runtime::{HostRuntime, RuntimeConfig, RuntimeReport, schedule_events, synthesize_ticks};
use tracing::info;

const USAGE: &str = "usage: cargo run -q -p replay --bin replay_conditions -- <primary_csv> <symbol> <timeframe:1m|5m|15m|1h> [--daily <csv>] [--ticks <csv>] [--config <json|yaml>] [--parquet <path>]";

#[derive(Debug)]
struct Args {
    primary_csv: PathBuf,
    symbol: String,
    timeframe: Timeframe,
    daily_csv: Option<PathBuf>,
    ticks_csv: Option<PathBuf>,
    config: Option<PathBuf>,
    parquet: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, Box<dyn std::error::Error>> {
    if args.len() < 3 {
        return Err(USAGE.into());
    }

    let mut parsed = Args {
        primary_csv: PathBuf::from(&args[0]),
        symbol: args[1].clone(),
        timeframe: Timeframe::parse(&args[2])?,
        daily_csv: None,
        ticks_csv: None,
        config: None,
        parquet: None,
    };

    let mut rest = args.iter().skip(3);
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--daily" => parsed.daily_csv = Some(value),
            "--ticks" => parsed.ticks_csv = Some(value),
            "--config" => parsed.config = Some(value),
            "--parquet" => parsed.parquet = Some(value),
            _ => return Err(format!("unknown flag {flag}\n{USAGE}").into()),
        }
    }

    Ok(parsed)
}

/// Config file (or defaults) with the command-line symbol and timeframe applied.
fn resolve_config(args: &Args) -> Result<IndicatorConfig, ConditionsError> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load(path)?,
        None => IndicatorConfig::default(),
    };
    if config.instrument.is_empty() {
        config.instrument = args.symbol.clone();
    }
    config.primary_timeframe = args.timeframe;
    config.validate()?;
    Ok(config)
}

fn replay(
    args: &Args,
    config: IndicatorConfig,
    runtime_config: RuntimeConfig,
) -> Result<RuntimeReport, Box<dyn std::error::Error>> {
    let primary = load_bars(&args.primary_csv, &args.symbol, args.timeframe)?;
    let daily = match &args.daily_csv {
        Some(path) => load_bars(path, &args.symbol, Timeframe::D1)?,
        None => Vec::new(),
    };
    let ticks = match &args.ticks_csv {
        Some(path) => load_ticks(path)?,
        None => synthesize_ticks(&primary),
    };
    info!(
        primary = primary.len(),
        daily = daily.len(),
        ticks = ticks.len(),
        "replay inputs loaded"
    );

    let runtime = HostRuntime::spawn(config, runtime_config)?;
    for event in schedule_events(primary, daily, ticks) {
        runtime.send(event)?;
    }
    let report = runtime.shutdown()?;

    if let Some(path) = &args.parquet {
        report.history.write_parquet(path)?;
        info!(path = %path.display(), rows = report.history.len(), "condition history written");
    }
    Ok(report)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    conditions::init_logging();
    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.len() < 3 {
        eprintln!("{USAGE}");
        std::process::exit(2);
    }
    let args = parse_args(&raw)?;
    let config = resolve_config(&args)?;
    let report = replay(&args, config, RuntimeConfig::from_env())?;

    println!(
        "bars={} ticks={} trades={} drawn={} warming_up={}",
        report.bars, report.ticks, report.trades, report.drawn, report.warming_up
    );
    match &report.overlay {
        Some(text) => println!("{text}"),
        None => println!("no overlay drawn: not enough history for the configured periods"),
    }
    if let Some(path) = &args.parquet {
        println!("condition history written to {}", path.display());
    }

    Ok(())
}

//! signalscan CLI: scan instruments for signal occurrences.
//!
//! Commands:
//! - `scan`: fetch bars, evaluate the signal catalog, print and export events
//! - `signals`: list the catalog with required indicators and eligibility
//! - `indicators`: list registered indicators with family and warm-up

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use signalscan_core::{IndicatorRegistry, SignalCatalog};
use signalscan_runner::{
    render_table, run_scan, write_report, ScanConfig, ScanRequest, SourceKind, StderrProgress,
};

#[derive(Parser)]
#[command(
    name = "signalscan",
    about = "signalscan: technical-indicator signal scanner"
)]
struct Cli {
    /// Debug-level logging (RUST_LOG still takes precedence).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan instruments for signal occurrences.
    Scan(ScanArgs),
    /// List the signal catalog.
    Signals,
    /// List registered indicators.
    Indicators,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Yahoo,
    Csv,
    Synthetic,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Yahoo => SourceKind::Yahoo,
            SourceArg::Csv => SourceKind::Csv,
            SourceArg::Synthetic => SourceKind::Synthetic,
        }
    }
}

#[derive(clap::Args)]
struct ScanArgs {
    /// Tickers to scan (e.g., RELIANCE.NS TCS.NS).
    tickers: Vec<String>,

    /// Universe file: comma/newline ticker list or a TOML sector table.
    #[arg(long)]
    universe: Option<PathBuf>,

    /// TOML scan config. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start date (YYYY-MM-DD). Defaults to one year before the end date.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<String>,

    /// Data source.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Directory of <SYMBOL>.csv files (with --source csv).
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Restrict the scan to this signal (repeatable).
    #[arg(long = "signal")]
    signals: Vec<String>,

    /// Days of history fetched before the start date.
    #[arg(long)]
    buffer_days: Option<u32>,

    /// Worker threads for the scan.
    #[arg(long)]
    threads: Option<usize>,

    /// Scan instruments one at a time.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Write results to this file (.csv or .json).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print per-instrument progress on stderr.
    #[arg(long, default_value_t = false)]
    progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan(args) => run_scan_cmd(args),
        Commands::Signals => run_signals(),
        Commands::Indicators => run_indicators(),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(s: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid {flag} date '{s}' (expected YYYY-MM-DD)"))
}

/// Build the effective config: file values first, then flags on top.
fn build_config(args: &ScanArgs) -> Result<ScanConfig> {
    let end_flag = args.end.as_deref().map(|s| parse_date(s, "--end")).transpose()?;
    let start_flag = args
        .start
        .as_deref()
        .map(|s| parse_date(s, "--start"))
        .transpose()?;

    let mut config = match &args.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let end = end_flag.unwrap_or_else(|| Local::now().date_naive());
            ScanConfig::new(end - Duration::days(365), end)
        }
    };

    if let Some(end) = end_flag {
        config.end_date = end;
    }
    if let Some(start) = start_flag {
        config.start_date = start;
    }

    if !args.tickers.is_empty() {
        config.instruments = args.tickers.clone();
    }
    if args.universe.is_some() {
        config.universe_file = args.universe.clone();
    }
    if let Some(source) = args.source {
        config.source.kind = source.into();
    }
    if args.csv_dir.is_some() {
        config.source.csv_dir = args.csv_dir.clone();
    }
    if !args.signals.is_empty() {
        config.signals = args.signals.clone();
    }
    if let Some(days) = args.buffer_days {
        config.history_buffer_days = days;
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    if args.sequential {
        config.parallel = false;
    }

    Ok(config)
}

fn run_scan_cmd(args: ScanArgs) -> Result<()> {
    let config = build_config(&args)?;
    if config.instruments.is_empty() && config.universe_file.is_none() {
        bail!("no instruments given: pass tickers, --universe, or --config");
    }

    let request = ScanRequest::from_config(&config).context("invalid scan configuration")?;
    let catalog = config.catalog().context("selecting signals")?;
    let registry = IndicatorRegistry::standard();
    let provider = config
        .source
        .build_provider()
        .context("setting up data provider")?;

    info!(
        instruments = request.instruments.len(),
        config_hash = %request.config_hash,
        "scan configured"
    );

    let progress = StderrProgress;
    let report = run_scan(
        &request,
        provider.as_ref(),
        &catalog,
        &registry,
        args.progress.then_some(&progress as &dyn signalscan_runner::ScanProgress),
    )
    .context("signal catalog is invalid")?;

    if report.events.is_empty() {
        println!(
            "No signal events between {} and {}.",
            request.start_date, request.end_date
        );
    } else {
        print!("{}", render_table(&report.events));
    }

    if !report.warnings.is_empty() {
        eprintln!("\nSkipped {} instrument(s):", report.warnings.len());
        for w in &report.warnings {
            eprintln!("  {}: {}", w.instrument_id, w.reason);
        }
    }

    println!(
        "\n{} events across {} instruments (config {})",
        report.events.len(),
        report.instruments_scanned,
        &report.config_hash[..report.config_hash.len().min(12)]
    );

    if let Some(path) = &args.output {
        write_report(&report, path)
            .with_context(|| format!("writing results to {}", path.display()))?;
        println!("Results saved to: {}", path.display());
    }

    Ok(())
}

fn run_signals() -> Result<()> {
    let registry = IndicatorRegistry::standard();
    let catalog = SignalCatalog::standard();
    catalog.validate(&registry)?;

    println!("{:>3}  {:<70} {:>6}  Indicators", "#", "Signal", "From");
    for (i, def) in catalog.iter().enumerate() {
        let first = SignalCatalog::first_eligible_index(def, &registry)?;
        let deps: Vec<String> = def.dependencies().into_iter().collect();
        println!(
            "{:>3}  {:<70} {:>6}  {}",
            i + 1,
            def.name(),
            first,
            deps.join(", ")
        );
    }
    Ok(())
}

fn run_indicators() -> Result<()> {
    let registry = IndicatorRegistry::standard();
    let warmups = registry.warmups(registry.names())?;

    println!("{:<24} {:<14} {:>7}  Inputs", "Indicator", "Family", "Warm-up");
    for indicator in registry.iter() {
        let warmup = warmups.get(indicator.name()).copied().unwrap_or(0);
        println!(
            "{:<24} {:<14} {:>7}  {}",
            indicator.name(),
            format!("{:?}", indicator.family()),
            warmup,
            indicator.inputs().join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> ScanArgs {
        let mut argv = vec!["signalscan", "scan"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Scan(a) => a,
            _ => unreachable!(),
        }
    }

    #[test]
    fn default_period_is_one_year_to_end() {
        let cfg = build_config(&args(&["AAA", "--end", "2024-06-30"])).unwrap();
        assert_eq!(cfg.end_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(cfg.start_date, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        assert_eq!(cfg.instruments, vec!["AAA"]);
        assert!(cfg.parallel);
    }

    #[test]
    fn flags_populate_config() {
        let cfg = build_config(&args(&[
            "AAA",
            "BBB",
            "--start",
            "2024-01-01",
            "--end",
            "2024-03-01",
            "--source",
            "csv",
            "--csv-dir",
            "bars",
            "--signal",
            "SMA: Golden Cross (50 > 200)",
            "--buffer-days",
            "30",
            "--threads",
            "2",
            "--sequential",
        ]))
        .unwrap();
        assert_eq!(cfg.source.kind, SourceKind::Csv);
        assert_eq!(cfg.source.csv_dir, Some(PathBuf::from("bars")));
        assert_eq!(cfg.signals.len(), 1);
        assert_eq!(cfg.history_buffer_days, 30);
        assert_eq!(cfg.threads, Some(2));
        assert!(!cfg.parallel);
        cfg.validate().unwrap();
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(build_config(&args(&["AAA", "--start", "01/02/2024"])).is_err());
    }
}

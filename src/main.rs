use anyhow::Context;
use clap::Parser;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tokio::sync::mpsc::Receiver;
use tokio::time::{interval, Duration, MissedTickBehavior};
use trendwatch::error::FeedError;
use trendwatch::feed::{spawn_feed, MarketScenario, ReplaySource, SyntheticPriceGenerator};
use trendwatch::strategy::{Strategy, TrendFollowingStrategy};
use trendwatch::{MonitorConfig, PriceSnapshot, Result, Signal, Token, TrendMonitor, TrendReport};

const FEED_BUFFER: usize = 64;

/// Track price trends per symbol and emit trend-following signals
#[derive(Parser, Debug)]
#[command(name = "trendwatch", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay prices from a file (`-` for stdin) instead of the synthetic feed
    #[arg(long)]
    input: Option<String>,

    /// Synthetic market scenario
    #[arg(long, value_enum)]
    scenario: Option<MarketScenario>,

    /// Synthetic samples per symbol
    #[arg(long)]
    samples: Option<usize>,

    /// Comma separated symbols
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// Samples kept per symbol
    #[arg(long)]
    capacity: Option<usize>,

    /// Trend angle threshold in degrees
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Recent samples that must agree with a signal (0 = off)
    #[arg(long)]
    confirm_lookback: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Delay between samples in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print the final reports as JSON lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// CLI flags override file and environment settings
    fn apply(&self, config: &mut MonitorConfig) {
        if let Some(scenario) = self.scenario {
            config.scenario = scenario;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(symbols) = &self.symbols {
            config.symbols = symbols.clone();
        }
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(lookback) = self.confirm_lookback {
            config.confirm_lookback = lookback;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
    }
}

#[derive(Default)]
struct FeedStats {
    recorded: usize,
    rejected: usize,
    signal_changes: usize,
    last_signals: HashMap<String, Signal>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config =
        MonitorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate()?;

    setup_logging(&config.log_filter);

    tracing::info!("🚀 trendwatch starting");
    tracing::info!(
        capacity = config.capacity,
        threshold = %config.threshold,
        confirm_lookback = config.confirm_lookback,
        symbols = ?config.symbols,
        "Configuration loaded"
    );

    let monitor = TrendMonitor::new(config.capacity, config.threshold)?;
    let strategy =
        TrendFollowingStrategy::new(config.capacity).with_confirmation(config.confirm_lookback);
    let feed = open_source(&cli, &config)?;

    let mut stats = FeedStats::default();

    tokio::select! {
        result = run_feed(feed, &monitor, &strategy, config.interval_ms, &mut stats) => {
            result?;
            tracing::info!("Feed exhausted");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("⚠️  Received Ctrl+C, stopping feed...");
        }
    }

    tracing::info!(
        recorded = stats.recorded,
        rejected = stats.rejected,
        signal_changes = stats.signal_changes,
        "Feed summary"
    );

    let reports = monitor.reports()?;
    if cli.json {
        print_json(&reports)?;
    } else {
        print_summary(&reports, &stats.last_signals);
    }

    Ok(())
}

// ============================================================================
// Initialization Functions
// ============================================================================

fn setup_logging(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_source(
    cli: &Cli,
    config: &MonitorConfig,
) -> Result<Receiver<std::result::Result<PriceSnapshot, FeedError>>> {
    let default_token = config.symbols[0].clone();

    let feed = match cli.input.as_deref() {
        Some("-") => {
            tracing::info!("Replaying prices from stdin");
            spawn_feed(
                move || ReplaySource::new(std::io::stdin().lock(), &default_token),
                FEED_BUFFER,
            )?
        }
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open price file {}", path))?;
            tracing::info!(path = %path, "Replaying prices from file");
            spawn_feed(
                move || ReplaySource::new(BufReader::new(file), &default_token),
                FEED_BUFFER,
            )?
        }
        None => {
            tracing::info!(
                scenario = ?config.scenario,
                samples = config.samples,
                seed = config.seed,
                "Using synthetic price feed"
            );
            let tokens = config.symbols.iter().map(|s| Token::new(s)).collect();
            let generator = SyntheticPriceGenerator::new(
                config.seed,
                config.scenario,
                tokens,
                config.samples,
                5,
            )?;
            spawn_feed(move || generator, FEED_BUFFER)?
        }
    };

    Ok(feed)
}

// ============================================================================
// Feed Loop
// ============================================================================

async fn run_feed(
    mut feed: Receiver<std::result::Result<PriceSnapshot, FeedError>>,
    monitor: &TrendMonitor,
    strategy: &TrendFollowingStrategy,
    interval_ms: u64,
    stats: &mut FeedStats,
) -> Result<()> {
    let mut ticker = (interval_ms > 0).then(|| {
        let mut ticker = interval(Duration::from_millis(interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    while let Some(item) = feed.recv().await {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }

        let snapshot = match item {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Skipping feed entry: {}", e);
                stats.rejected += 1;
                continue;
            }
        };

        if let Err(e) = monitor.record(&snapshot) {
            tracing::warn!(token = %snapshot.token, "Failed to record sample: {}", e);
            stats.rejected += 1;
            continue;
        }
        stats.recorded += 1;

        let evaluated = monitor.with_window(&snapshot.token, |window| {
            window.is_full().then(|| {
                let trend = window.get_trend();
                tracing::debug!(
                    token = %snapshot.token,
                    slope = %trend.slope,
                    angle = %trend.angle,
                    "Trend updated"
                );
                strategy.generate_signal(window)
            })
        })?;

        match evaluated.flatten() {
            Some(Ok(signal)) => {
                let previous = stats.last_signals.insert(snapshot.token.clone(), signal);
                if previous != Some(signal) {
                    stats.signal_changes += 1;
                    tracing::info!(
                        token = %snapshot.token,
                        price = %snapshot.price,
                        signal = %signal,
                        strategy = strategy.name(),
                        "Signal changed"
                    );
                }
            }
            Some(Err(e)) => {
                tracing::warn!(token = %snapshot.token, "Failed to generate signal: {}", e);
            }
            None => {}
        }
    }

    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn print_json(reports: &[TrendReport]) -> Result<()> {
    for report in reports {
        println!("{}", serde_json::to_string(report)?);
    }
    Ok(())
}

fn print_summary(reports: &[TrendReport], signals: &HashMap<String, Signal>) {
    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║              TREND SUMMARY                            ║");
    println!("╚═══════════════════════════════════════════════════════╝\n");

    println!(
        "{:<10} {:>8} {:>12} {:>10} {:>10} {:>8} {:>8}",
        "Symbol", "Samples", "Latest", "Slope", "Angle°", "Trend", "Signal"
    );
    println!("{}", "─".repeat(72));

    for report in reports {
        let latest = report
            .latest
            .map(|p| format!("{:.4}", p))
            .unwrap_or_else(|| "-".to_string());
        let direction = report
            .direction
            .map(|d| d.to_string())
            .unwrap_or_else(|| "edge".to_string());
        let signal = signals
            .get(&report.token)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<10} {:>8} {:>12} {:>10.4} {:>10.2} {:>8} {:>8}",
            report.token, report.samples, latest, report.trend.slope, report.trend.angle, direction, signal
        );
    }

    println!();
}

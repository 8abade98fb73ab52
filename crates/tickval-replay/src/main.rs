//! Tickval Replay - tick capture replay and validator benchmarking.
//!
//! This binary replays a tick series (synthetic or captured) through the
//! validator, measures per-call latency and runs the series-level quality
//! checks.

use std::fs;
use std::io::{self, Write};
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tickval_core::{validate, Tick, TickReader, TICK_RECORD_SIZE};
use tickval_metrics::{format_latency, CycleTimer, LatencyHistogram, VerdictCounters};
use tickval_quality::{QualityChecker, QualityReport, QualityThresholds};

/// Replay a tick series through the validator and report its quality.
#[derive(Parser, Debug)]
#[command(name = "tickval-replay", version)]
struct Args {
    /// Number of synthetic ticks to generate
    #[arg(long, short = 'n', default_value_t = 100_000)]
    count: usize,

    /// Inject a crossed quote every K ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    invalid_every: usize,

    /// Inject a 120 s feed gap every K ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    gap_every: usize,

    /// Read ticks from a capture of raw 32-byte records instead of generating them
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Write the replayed series as a capture file
    #[arg(long)]
    record: Option<PathBuf>,

    /// JSON file overriding quality thresholds
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Observation time for the timeliness check, epoch seconds
    #[arg(long)]
    now: Option<f64>,

    /// Print the quality report as JSON
    #[arg(long)]
    json: bool,
}

/// Seconds between synthetic ticks.
const TICK_INTERVAL: f64 = 0.01;
/// Price of one spread point.
const POINT: f64 = 0.00001;
/// Length of an injected feed outage.
const GAP_SECS: f64 = 120.0;
/// Simulated delivery delay of the newest synthetic tick.
const FEED_DELAY: f64 = 0.005;

/// Deterministic synthetic tick generator.
struct TickGenerator {
    index: u64,
    time: f64,
    invalid_every: u64,
    gap_every: u64,
}

impl TickGenerator {
    fn new(start_time: f64, invalid_every: usize, gap_every: usize) -> Self {
        Self {
            index: 0,
            time: start_time,
            invalid_every: invalid_every as u64,
            gap_every: gap_every as u64,
        }
    }

    fn next_tick(&mut self) -> Tick {
        let i = self.index;
        self.index += 1;

        if i > 0 {
            self.time += TICK_INTERVAL;
            if self.gap_every != 0 && i % self.gap_every == 0 {
                self.time += GAP_SECS;
            }
        }

        // Bid wanders over a 200-point band; spread cycles 10..=14 points.
        let bid = 1.1000 + ((i * 7919) % 200) as f64 * POINT;
        let spread = 10 + (i % 5) as i32;
        let ask = if self.invalid_every != 0 && i % self.invalid_every == self.invalid_every - 1 {
            bid - POINT
        } else {
            bid + spread as f64 * POINT
        };

        Tick::new(bid, ask, self.time, spread)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_capture(path: &Path) -> Result<Vec<Tick>> {
    let bytes = fs::read(path).with_context(|| format!("reading capture {}", path.display()))?;
    let reader = TickReader::new(&bytes).map_err(|e| {
        anyhow::anyhow!("{}: {} ({} bytes, record size {})", path.display(), e, bytes.len(), TICK_RECORD_SIZE)
    })?;
    Ok(reader.collect())
}

fn write_capture(path: &Path, ticks: &[Tick]) -> Result<()> {
    let mut bytes = Vec::with_capacity(ticks.len() * TICK_RECORD_SIZE);
    for tick in ticks {
        bytes.extend_from_slice(tick.as_bytes());
    }
    fs::write(path, bytes).with_context(|| format!("writing capture {}", path.display()))
}

fn load_thresholds(path: Option<&Path>) -> Result<QualityThresholds> {
    let Some(path) = path else {
        return Ok(QualityThresholds::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading thresholds {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing thresholds {}", path.display()))
}

fn wall_clock_secs() -> Result<f64> {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?;
    Ok(since_epoch.as_secs_f64())
}

/// Render the quality report for stdout, as JSON or as the text report.
fn render_report(report: &QualityReport, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(report)? + "\n")
    } else {
        Ok(report.to_string())
    }
}

/// Human-readable progress goes to stdout, or to stderr when stdout
/// carries the JSON report.
fn console(json: bool) -> Box<dyn Write> {
    if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

fn main() -> Result<ExitCode> {
    init_logging();
    let args = Args::parse();
    let thresholds = load_thresholds(args.thresholds.as_deref())?;
    let mut out = console(args.json);

    writeln!(out, "╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                    TICKVAL REPLAY ENGINE                     ║")?;
    writeln!(out, "║            Tick Validation & Data Quality Benchmark          ║")?;
    writeln!(out, "╚══════════════════════════════════════════════════════════════╝")?;
    writeln!(out)?;

    // Load or synthesize the series
    let (ticks, default_now) = match &args.input {
        Some(path) => {
            let ticks = load_capture(path)?;
            info!(path = %path.display(), ticks = ticks.len(), "loaded capture");
            (ticks, None)
        }
        None => {
            let mut gen = TickGenerator::new(1_700_000_000.0, args.invalid_every, args.gap_every);
            let ticks: Vec<Tick> = (0..args.count).map(|_| gen.next_tick()).collect();
            let now = ticks.last().map(|t| t.time + FEED_DELAY);
            info!(ticks = ticks.len(), invalid_every = args.invalid_every, gap_every = args.gap_every, "generated synthetic series");
            (ticks, now)
        }
    };

    if let Some(path) = &args.record {
        write_capture(path, &ticks)?;
        info!(path = %path.display(), ticks = ticks.len(), "wrote capture");
    }

    // Warm up
    writeln!(out, "[1/3] Warming up...")?;
    for tick in ticks.iter().cycle().take(10_000.min(ticks.len() * 10)) {
        black_box(validate(tick.bid, tick.ask, tick.time, tick.spread));
    }

    // Validation benchmark
    writeln!(out, "[2/3] Benchmarking validation...")?;
    let timer = CycleTimer::new();
    let mut latency = LatencyHistogram::new();
    let mut counters = VerdictCounters::new();
    let start = Instant::now();

    for tick in &ticks {
        let verdict = latency.time(&timer, || {
            validate(black_box(tick.bid), black_box(tick.ask), tick.time, black_box(tick.spread))
        });
        counters.record(verdict);
    }

    let elapsed = start.elapsed();
    let rate = ticks.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    let summary = latency.summary();

    writeln!(out, "   Validated {} ticks in {:.2?}", ticks.len(), elapsed)?;
    writeln!(out, "   Rate: {:.0} ticks/sec", rate)?;
    summary.write_to(&mut out, "   Validate Latency")?;
    for (verdict, count) in counters.iter() {
        writeln!(out, "   {:<22} {:>10}", verdict.as_str(), count)?;
    }

    // Quality report
    writeln!(out, "\n[3/3] Running quality checks...")?;
    let now = match args.now.or(default_now) {
        Some(now) => now,
        None => wall_clock_secs()?,
    };

    let checker = QualityChecker::new(thresholds);
    let report = match checker.run_all(&ticks, now) {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "no quality report");
            writeln!(out, "   {}", e)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let rendered = render_report(&report, args.json)?;
    if args.json {
        io::stdout().write_all(rendered.as_bytes())?;
    } else {
        write!(out, "{}", rendered)?;
    }

    // Summary
    writeln!(out, "\n╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                       REPLAY SUMMARY                         ║")?;
    writeln!(out, "╠══════════════════════════════════════════════════════════════╣")?;
    writeln!(out, "║  Validate Rate:   {:>12.0} ticks/sec                      ║", rate)?;
    writeln!(out, "║  Accepted:        {:>12.2} %                              ║", counters.acceptance_pct())?;
    writeln!(out, "║  P99 Latency:     {:>12}                                ║", format_latency(summary.p99))?;
    writeln!(out, "║  Quality:         {:>12}                                ║", format!("{}/{}", report.passed_count(), report.total()))?;
    writeln!(out, "╚══════════════════════════════════════════════════════════════╝")?;

    writeln!(out)?;
    if report.all_passed() {
        writeln!(out, "✅ PASS: Series meets every quality criterion")?;
        Ok(ExitCode::SUCCESS)
    } else {
        let failed: Vec<_> = report.failures().map(|c| c.as_str()).collect();
        writeln!(out, "❌ FAIL: {}", failed.join(", "))?;
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_clean_series() {
        let mut gen = TickGenerator::new(1_700_000_000.0, 0, 0);
        let ticks: Vec<Tick> = (0..1_000).map(|_| gen.next_tick()).collect();

        assert!(ticks.iter().all(|t| t.is_valid()));
        assert!(ticks.windows(2).all(|w| w[1].time > w[0].time));
    }

    #[test]
    fn test_generator_injects_crossed_quotes() {
        let mut gen = TickGenerator::new(1_700_000_000.0, 100, 0);
        let ticks: Vec<Tick> = (0..1_000).map(|_| gen.next_tick()).collect();

        let crossed = ticks.iter().filter(|t| t.ask < t.bid).count();
        assert_eq!(crossed, 10);
        assert!(!ticks[99].is_valid());
        assert!(ticks[100].is_valid());
    }

    #[test]
    fn test_generator_injects_gaps() {
        let mut gen = TickGenerator::new(0.0, 0, 250);
        let ticks: Vec<Tick> = (0..1_000).map(|_| gen.next_tick()).collect();

        let gaps = ticks.windows(2).filter(|w| w[1].time - w[0].time > 60.0).count();
        assert_eq!(gaps, 3);
    }

    #[test]
    fn test_synthetic_series_quality() {
        let mut gen = TickGenerator::new(1_700_000_000.0, 0, 0);
        let ticks: Vec<Tick> = (0..5_000).map(|_| gen.next_tick()).collect();
        let now = ticks[ticks.len() - 1].time + FEED_DELAY;

        let report = QualityChecker::default().run_all(&ticks, now).unwrap();
        assert!(report.all_passed(), "{}", report);
    }

    #[test]
    fn test_default_thresholds_without_file() {
        assert_eq!(load_thresholds(None).unwrap(), QualityThresholds::default());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["tickval-replay", "-n", "10", "--gap-every", "5", "--json"]).unwrap();
        assert_eq!(args.count, 10);
        assert_eq!(args.gap_every, 5);
        assert_eq!(args.invalid_every, 0);
        assert!(args.json);
        assert!(args.input.is_none());
    }

    fn synthetic_report(invalid_every: usize) -> QualityReport {
        let mut gen = TickGenerator::new(1_700_000_000.0, invalid_every, 0);
        let ticks: Vec<Tick> = (0..500).map(|_| gen.next_tick()).collect();
        let now = ticks[ticks.len() - 1].time + FEED_DELAY;
        QualityChecker::default().run_all(&ticks, now).unwrap()
    }

    #[test]
    fn test_json_report_is_bare_json() {
        let report = synthetic_report(50);
        let rendered = render_report(&report, true).unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["ticks"], 500);
        assert_eq!(value["fingerprint"], report.fingerprint.as_str());
        assert_eq!(value["results"].as_array().map(Vec::len), Some(report.total()));
        assert!(rendered.trim_start().starts_with('{'));
    }

    #[test]
    fn test_text_report() {
        let rendered = render_report(&synthetic_report(0), false).unwrap();
        assert!(rendered.contains("OVERALL: PASSED (6/6)"));
        assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_err());
    }

    #[test]
    fn test_capture_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticks.bin");

        let mut gen = TickGenerator::new(1_700_000_000.0, 7, 11);
        let ticks: Vec<Tick> = (0..64).map(|_| gen.next_tick()).collect();

        write_capture(&path, &ticks).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), (64 * TICK_RECORD_SIZE) as u64);
        assert_eq!(load_capture(&path).unwrap(), ticks);
    }

    #[test]
    fn test_capture_with_trailing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("torn.bin");

        let mut bytes = Tick::new(1.0, 1.1, 0.0, 1).as_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 5]);
        fs::write(&path, &bytes).unwrap();

        let err = load_capture(&path).unwrap_err();
        assert!(err.to_string().contains("trailing bytes"), "{}", err);
    }

    #[test]
    fn test_missing_capture() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_capture(&dir.path().join("absent.bin")).is_err());
    }

    #[test]
    fn test_thresholds_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");

        fs::write(&path, r#"{"max_gap_secs": 5.0, "min_ticks_per_sec": 50.0}"#).unwrap();
        let thresholds = load_thresholds(Some(path.as_path())).unwrap();
        assert_eq!(
            thresholds,
            QualityThresholds::default().max_gap_secs(5.0).min_ticks_per_sec(50.0)
        );

        fs::write(&path, r#"{"max_gap_secs": "#).unwrap();
        assert!(load_thresholds(Some(path.as_path())).is_err());
    }
}

//! Validation latency and outcome tracking.
//!
//! Provides nanosecond-precision latency measurement with HdrHistogram
//! and per-verdict counters for validated tick streams.

use std::io::{self, Write};

use hdrhistogram::Histogram;
use tickval_core::TickVerdict;

/// Percentile snapshot of a [`LatencyHistogram`], in nanoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatencySummary {
    pub count: u64,
    pub p50: u64,
    pub p90: u64,
    pub p95: u64,
    pub p99: u64,
    pub p999: u64,
    pub max: u64,
    pub mean: f64,
    pub stddev: f64,
}

impl LatencySummary {
    /// Write the distribution, one percentile per line, each line led by `prefix`.
    pub fn write_to<W: Write>(&self, out: &mut W, prefix: &str) -> io::Result<()> {
        writeln!(out, "{} Distribution ({} samples):", prefix, self.count)?;
        for (label, nanos) in [
            ("P50:  ", self.p50),
            ("P90:  ", self.p90),
            ("P95:  ", self.p95),
            ("P99:  ", self.p99),
            ("P99.9:", self.p999),
            ("Max:  ", self.max),
        ] {
            writeln!(out, "{}   {} {:>10}", prefix, label, format_latency(nanos))?;
        }
        writeln!(out, "{}   Mean:   {:>8.1} ns (σ {:.1})", prefix, self.mean, self.stddev)
    }
}

/// Format latency with appropriate units.
pub fn format_latency(nanos: u64) -> String {
    match nanos {
        0..=999 => format!("{} ns", nanos),
        1_000..=999_999 => format!("{:.2} μs", nanos as f64 / 1e3),
        1_000_000..=999_999_999 => format!("{:.2} ms", nanos as f64 / 1e6),
        _ => format!("{:.2} s", nanos as f64 / 1e9),
    }
}

/// Per-call validation latency, recorded in nanoseconds.
///
/// Auto-resizing, so a single pathological sample (a page fault or a
/// preempted thread) widens the range instead of being dropped.
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    /// Three significant digits.
    pub fn new() -> Self {
        Self::with_precision(3)
    }

    /// `sigfig` is clamped to the 1..=5 range HdrHistogram accepts.
    pub fn with_precision(sigfig: u8) -> Self {
        Self {
            histogram: Histogram::new(sigfig.clamp(1, 5)).expect("sigfig within 1..=5"),
        }
    }

    #[inline(always)]
    pub fn record(&mut self, nanos: u64) {
        // Only fails for a non-resizable histogram out of range.
        let _ = self.histogram.record(nanos);
    }

    /// Time `f` against `timer` and record the elapsed nanoseconds.
    #[inline(always)]
    pub fn time<T>(&mut self, timer: &CycleTimer, f: impl FnOnce() -> T) -> T {
        let start = timer.now();
        let value = f();
        self.record(timer.delta_as_nanos(start, timer.now()));
        value
    }

    /// Value at `percentile` (0.0 - 100.0).
    pub fn percentile(&self, percentile: f64) -> u64 {
        self.histogram.value_at_quantile(percentile / 100.0)
    }

    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    pub fn min(&self) -> u64 {
        self.histogram.min()
    }

    pub fn max(&self) -> u64 {
        self.histogram.max()
    }

    pub fn reset(&mut self) {
        self.histogram.reset();
    }

    pub fn summary(&self) -> LatencySummary {
        LatencySummary {
            count: self.count(),
            p50: self.percentile(50.0),
            p90: self.percentile(90.0),
            p95: self.percentile(95.0),
            p99: self.percentile(99.0),
            p999: self.percentile(99.9),
            max: self.max(),
            mean: self.histogram.mean(),
            stddev: self.histogram.stdev(),
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Cycle-counter clock; TSC where available, OS clock otherwise.
#[derive(Clone, Default)]
pub struct CycleTimer {
    clock: quanta::Clock,
}

impl CycleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn now(&self) -> u64 {
        self.clock.raw()
    }

    #[inline(always)]
    pub fn delta_as_nanos(&self, start: u64, end: u64) -> u64 {
        self.clock.delta_as_nanos(start, end)
    }
}

/// Per-verdict tick counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerdictCounters {
    counts: [u64; TickVerdict::ALL.len()],
}

impl VerdictCounters {
    pub const fn new() -> Self {
        Self {
            counts: [0; TickVerdict::ALL.len()],
        }
    }

    #[inline(always)]
    pub fn record(&mut self, verdict: TickVerdict) {
        self.counts[verdict.code() as usize] += 1;
    }

    /// Count for one verdict.
    pub fn get(&self, verdict: TickVerdict) -> u64 {
        self.counts[verdict.code() as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn accepted(&self) -> u64 {
        self.get(TickVerdict::Valid)
    }

    pub fn rejected(&self) -> u64 {
        self.total() - self.accepted()
    }

    /// Share of valid ticks in percent; 0 when nothing was recorded.
    pub fn acceptance_pct(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.accepted() as f64 * 100.0 / total as f64
    }

    /// Non-zero counts in verdict order.
    pub fn iter(&self) -> impl Iterator<Item = (TickVerdict, u64)> + '_ {
        TickVerdict::ALL
            .iter()
            .map(|&v| (v, self.get(v)))
            .filter(|&(_, n)| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_summary() {
        let mut h = LatencyHistogram::new();

        for i in 1..=100 {
            h.record(i * 100);
        }

        let summary = h.summary();
        assert_eq!(summary.count, 100);
        assert!(summary.p50 >= 4900 && summary.p50 <= 5100);
        assert!(summary.p95 >= 9400 && summary.p95 <= 9600);
        assert!(summary.p50 <= summary.p90 && summary.p90 <= summary.p95 && summary.p95 <= summary.p99);
        assert_eq!(h.min(), 100);
        // HdrHistogram may round max value slightly
        assert!(summary.max >= 10000 && summary.max <= 10100);

        h.reset();
        assert_eq!(h.count(), 0);
    }

    #[test]
    fn test_summary_lines() {
        let summary = LatencySummary { count: 3, p50: 40, p90: 80, p95: 1_500, p99: 2_000, p999: 2_000, max: 2_000, mean: 50.0, stddev: 5.0 };
        let mut out = Vec::new();
        summary.write_to(&mut out, "  Validate").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("  Validate Distribution (3 samples):"));
        assert!(text.contains("P95:      1.50 μs"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(500), "500 ns");
        assert_eq!(format_latency(5000), "5.00 μs");
        assert_eq!(format_latency(5_000_000), "5.00 ms");
        assert_eq!(format_latency(2_500_000_000), "2.50 s");
    }

    #[test]
    fn test_timed_closure_records_once() {
        let timer = CycleTimer::new();
        let mut h = LatencyHistogram::new();

        let value = h.time(&timer, || 6 * 7);

        assert_eq!(value, 42);
        assert_eq!(h.count(), 1);
        assert!(h.max() < 1_000_000_000);
    }

    #[test]
    fn test_verdict_counters() {
        let mut counters = VerdictCounters::new();
        assert_eq!(counters.acceptance_pct(), 0.0);

        for _ in 0..3 {
            counters.record(TickVerdict::Valid);
        }
        counters.record(TickVerdict::AskNotAboveBid);

        assert_eq!(counters.total(), 4);
        assert_eq!(counters.accepted(), 3);
        assert_eq!(counters.rejected(), 1);
        assert_eq!(counters.get(TickVerdict::NonPositiveBid), 0);
        assert_eq!(counters.acceptance_pct(), 75.0);

        let seen: Vec<_> = counters.iter().collect();
        assert_eq!(seen, vec![(TickVerdict::Valid, 3), (TickVerdict::AskNotAboveBid, 1)]);
    }
}

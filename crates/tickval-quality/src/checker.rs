//! The quality checker.

use tracing::{debug, info, warn};

use tickval_core::Tick;

use crate::report::{CheckDetail, CheckResult, Criterion, QualityReport};
use crate::series::TickSeries;
use crate::thresholds::QualityThresholds;
use crate::QualityError;

/// Runs every quality criterion against a tick series.
#[derive(Debug, Clone, Default)]
pub struct QualityChecker {
    thresholds: QualityThresholds,
}

impl QualityChecker {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Run all criteria. `now` is the observation time in epoch seconds.
    pub fn run_all(&self, ticks: &[Tick], now: f64) -> Result<QualityReport, QualityError> {
        let series = TickSeries::new(ticks)?;

        let results = vec![
            self.check_timeliness(&series, now),
            self.check_accuracy(&series),
            self.check_completeness(&series),
            self.check_consistency(&series),
            self.check_reliability(&series),
            self.check_scalability(&series),
        ];

        for result in &results {
            if result.passed {
                debug!(criterion = %result.criterion, detail = ?result.detail, "quality check passed");
            } else {
                warn!(criterion = %result.criterion, detail = ?result.detail, "quality check failed");
            }
        }

        let report = QualityReport {
            ticks: series.len(),
            fingerprint: series.fingerprint(),
            results,
        };

        info!(
            ticks = report.ticks,
            fingerprint = %report.fingerprint,
            passed = report.passed_count(),
            total = report.total(),
            "quality checks complete"
        );

        Ok(report)
    }

    /// Age of the newest tick against `now`.
    pub fn check_timeliness(&self, series: &TickSeries<'_>, now: f64) -> CheckResult {
        let latency_ms = (now - series.last().time) * 1000.0;
        let threshold_ms = self.thresholds.max_latency_ms;

        CheckResult {
            criterion: Criterion::Timeliness,
            passed: latency_ms <= threshold_ms,
            detail: CheckDetail::Timeliness { latency_ms, threshold_ms },
        }
    }

    /// Share of quotes that are not crossed.
    pub fn check_accuracy(&self, series: &TickSeries<'_>) -> CheckResult {
        let crossed = series.ticks().iter().filter(|t| t.ask < t.bid).count();
        let accuracy_pct = 100.0 - crossed as f64 * 100.0 / series.len() as f64;
        let threshold_pct = self.thresholds.min_accuracy_pct;

        CheckResult {
            criterion: Criterion::Accuracy,
            passed: accuracy_pct >= threshold_pct,
            detail: CheckDetail::Accuracy { accuracy_pct, threshold_pct, crossed },
        }
    }

    /// Fields that hold a non-finite value anywhere in the series.
    pub fn check_completeness(&self, series: &TickSeries<'_>) -> CheckResult {
        let ticks = series.ticks();
        let fields: [(&'static str, fn(&Tick) -> f64); 3] = [
            ("bid", |t: &Tick| t.bid),
            ("ask", |t: &Tick| t.ask),
            ("time", |t: &Tick| t.time),
        ];

        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, field)| ticks.iter().any(|t| !field(t).is_finite()))
            .map(|&(name, _)| name)
            .collect();

        CheckResult {
            criterion: Criterion::Completeness,
            passed: missing.is_empty(),
            detail: CheckDetail::Completeness { missing },
        }
    }

    /// Non-decreasing timestamps and every tick passing validation.
    pub fn check_consistency(&self, series: &TickSeries<'_>) -> CheckResult {
        let ticks = series.ticks();
        let time_monotonic = ticks.windows(2).all(|w| w[1].time >= w[0].time);
        let rejected = ticks.iter().filter(|t| !t.is_valid()).count();
        let price_order = rejected == 0;

        CheckResult {
            criterion: Criterion::Consistency,
            passed: time_monotonic && price_order,
            detail: CheckDetail::Consistency { time_monotonic, price_order, rejected },
        }
    }

    /// Share of intervals that are not feed outages.
    pub fn check_reliability(&self, series: &TickSeries<'_>) -> CheckResult {
        let max_gap = self.thresholds.max_gap_secs;
        let gaps = series.intervals().filter(|&dt| dt > max_gap).count();
        let n = series.len();
        let uptime_pct = (n - gaps) as f64 * 100.0 / n as f64;
        let threshold_pct = self.thresholds.min_uptime_pct;

        CheckResult {
            criterion: Criterion::Reliability,
            passed: uptime_pct >= threshold_pct,
            detail: CheckDetail::Reliability { uptime_pct, threshold_pct, gaps },
        }
    }

    /// Average tick rate over the series, floored at a one-second span.
    pub fn check_scalability(&self, series: &TickSeries<'_>) -> CheckResult {
        let ticks_per_sec = series.len() as f64 / series.duration_secs().max(1.0);
        let threshold = self.thresholds.min_ticks_per_sec;

        CheckResult {
            criterion: Criterion::Scalability,
            passed: ticks_per_sec >= threshold,
            detail: CheckDetail::Scalability { ticks_per_sec, threshold },
        }
    }
}

//! Pass/fail thresholds for the quality checks.

use serde::{Deserialize, Serialize};

/// Thresholds applied by [`QualityChecker`](crate::QualityChecker).
///
/// Missing fields fall back to their defaults when deserialized, so a
/// thresholds file only needs to name what it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Maximum age of the newest tick, in milliseconds.
    pub max_latency_ms: f64,
    /// Minimum share of uncrossed quotes, in percent.
    pub min_accuracy_pct: f64,
    /// Gap between consecutive ticks that counts as an outage, in seconds.
    pub max_gap_secs: f64,
    /// Minimum share of gap-free intervals, in percent.
    pub min_uptime_pct: f64,
    /// Minimum average tick rate.
    pub min_ticks_per_sec: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            max_latency_ms: 100.0,
            min_accuracy_pct: 99.9,
            max_gap_secs: 60.0,
            min_uptime_pct: 99.99,
            min_ticks_per_sec: 1.0,
        }
    }
}

impl QualityThresholds {
    #[must_use]
    pub fn max_latency_ms(mut self, ms: f64) -> Self {
        self.max_latency_ms = ms;
        self
    }

    #[must_use]
    pub fn min_accuracy_pct(mut self, pct: f64) -> Self {
        self.min_accuracy_pct = pct;
        self
    }

    #[must_use]
    pub fn max_gap_secs(mut self, secs: f64) -> Self {
        self.max_gap_secs = secs;
        self
    }

    #[must_use]
    pub fn min_uptime_pct(mut self, pct: f64) -> Self {
        self.min_uptime_pct = pct;
        self
    }

    #[must_use]
    pub fn min_ticks_per_sec(mut self, tps: f64) -> Self {
        self.min_ticks_per_sec = tps;
        self
    }
}

//! Quality check results and the rendered report.

use core::fmt;
use serde::Serialize;

/// The quality criteria, in the order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Criterion {
    Timeliness,
    Accuracy,
    Completeness,
    Consistency,
    Reliability,
    Scalability,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Timeliness,
        Criterion::Accuracy,
        Criterion::Completeness,
        Criterion::Consistency,
        Criterion::Reliability,
        Criterion::Scalability,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Criterion::Timeliness => "Timeliness",
            Criterion::Accuracy => "Accuracy",
            Criterion::Completeness => "Completeness",
            Criterion::Consistency => "Consistency",
            Criterion::Reliability => "Reliability",
            Criterion::Scalability => "Scalability",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measured values behind a pass/fail decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckDetail {
    Timeliness {
        latency_ms: f64,
        threshold_ms: f64,
    },
    Accuracy {
        accuracy_pct: f64,
        threshold_pct: f64,
        crossed: usize,
    },
    Completeness {
        missing: Vec<&'static str>,
    },
    Consistency {
        time_monotonic: bool,
        price_order: bool,
        rejected: usize,
    },
    Reliability {
        uptime_pct: f64,
        threshold_pct: f64,
        gaps: usize,
    },
    Scalability {
        ticks_per_sec: f64,
        threshold: f64,
    },
}

impl fmt::Display for CheckDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckDetail::Timeliness { latency_ms, threshold_ms } => {
                writeln!(f, "    → latency_ms: {:.3}", latency_ms)?;
                writeln!(f, "    → threshold_ms: {}", threshold_ms)
            }
            CheckDetail::Accuracy { accuracy_pct, threshold_pct, crossed } => {
                writeln!(f, "    → accuracy_pct: {:.4}", accuracy_pct)?;
                writeln!(f, "    → threshold_pct: {}", threshold_pct)?;
                writeln!(f, "    → crossed: {}", crossed)
            }
            CheckDetail::Completeness { missing } => {
                writeln!(f, "    → missing: {:?}", missing)
            }
            CheckDetail::Consistency { time_monotonic, price_order, rejected } => {
                writeln!(f, "    → time_monotonic: {}", time_monotonic)?;
                writeln!(f, "    → price_order: {}", price_order)?;
                writeln!(f, "    → rejected: {}", rejected)
            }
            CheckDetail::Reliability { uptime_pct, threshold_pct, gaps } => {
                writeln!(f, "    → uptime_pct: {:.4}", uptime_pct)?;
                writeln!(f, "    → threshold_pct: {}", threshold_pct)?;
                writeln!(f, "    → gaps: {}", gaps)
            }
            CheckDetail::Scalability { ticks_per_sec, threshold } => {
                writeln!(f, "    → ticks_per_sec: {:.2}", ticks_per_sec)?;
                writeln!(f, "    → threshold: {}", threshold)
            }
        }
    }
}

/// Outcome of one criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub criterion: Criterion,
    pub passed: bool,
    pub detail: CheckDetail,
}

/// All criteria for one tick series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Number of ticks checked.
    pub ticks: usize,
    /// Hex SHA-256 of the checked tick records.
    pub fingerprint: String,
    pub results: Vec<CheckResult>,
}

impl QualityReport {
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Result for one criterion, if it was evaluated.
    pub fn get(&self, criterion: Criterion) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.criterion == criterion)
    }

    /// Criteria that failed, in evaluation order.
    pub fn failures(&self) -> impl Iterator<Item = Criterion> + '_ {
        self.results.iter().filter(|r| !r.passed).map(|r| r.criterion)
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, " TICK DATA QUALITY REPORT ({} ticks)", self.ticks)?;
        writeln!(f, " fingerprint: {}...", &self.fingerprint[..self.fingerprint.len().min(16)])?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "OVERALL: {} ({}/{})",
            if self.all_passed() { "PASSED" } else { "FAILED" },
            self.passed_count(),
            self.total(),
        )?;

        for result in &self.results {
            writeln!(f)?;
            let status = if result.passed { "PASSED" } else { "FAILED" };
            writeln!(f, "[{}] {}", status, result.criterion)?;
            write!(f, "{}", result.detail)?;
        }

        Ok(())
    }
}

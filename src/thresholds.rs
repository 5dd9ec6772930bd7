//! Pass/fail thresholds evaluated against the metrics of a finished load test.
//!
//! The defaults require 95% of requests to complete below 2 seconds and fewer
//! than 5% of requests to fail. Both limits are strict, a run sitting exactly
//! on a limit breaches it.
//!
//! Response times come from Goose's raw (not backfilled) timings, which Goose
//! rounds once they exceed 100ms. The percentile is taken over those rounded
//! buckets.

use goose::metrics::GooseMetrics;
use goose::GooseError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::THRESHOLDS_VAR;

/// Percentile of response times the time limit applies to.
pub const PERCENTILE: f64 = 0.95;

/// Limits a load test must stay under to pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// 95th percentile response time must be below this, in milliseconds.
    pub p95_ms: usize,
    /// Share of failed requests must be below this, in percent.
    pub max_failure_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            p95_ms: 2000,
            max_failure_percent: 5.0,
        }
    }
}

/// Accepts `default`, or `{p95_ms},{max_failure_percent}` such as `2000,5`.
impl FromStr for Thresholds {
    type Err = GooseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Ok(Thresholds::default());
        }

        let invalid = |detail: &str| GooseError::InvalidOption {
            option: THRESHOLDS_VAR.to_string(),
            value: s.to_string(),
            detail: detail.to_string(),
        };
        let (p95_ms, max_failure_percent) = s.split_once(',').ok_or_else(|| {
            invalid("expected \"default\" or \"{p95_ms},{max_failure_percent}\", ie \"2000,5\".")
        })?;
        let p95_ms = p95_ms
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(&format!("invalid p95 limit: {}", e)))?;
        let max_failure_percent = max_failure_percent
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(&format!("invalid failure limit: {}", e)))?;
        if !(0.0..=100.0).contains(&max_failure_percent) {
            return Err(invalid("failure limit must be a percentage from 0 to 100."));
        }

        Ok(Thresholds {
            p95_ms,
            max_failure_percent,
        })
    }
}

/// A threshold the load test did not stay under.
#[derive(Clone, Debug, PartialEq)]
pub enum Breach {
    ResponseTime { p95_ms: usize, limit_ms: usize },
    FailureRate { percent: f64, limit_percent: f64 },
}

impl fmt::Display for Breach {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Breach::ResponseTime { p95_ms, limit_ms } => write!(
                f,
                "p95 response time {}ms is not below {}ms",
                p95_ms, limit_ms
            ),
            Breach::FailureRate {
                percent,
                limit_percent,
            } => write!(
                f,
                "failure rate {:.2}% is not below {}%",
                percent, limit_percent
            ),
        }
    }
}

impl Thresholds {
    /// Returns every threshold the load test breached, empty if it passed.
    ///
    /// A load test without request metrics, for example run with
    /// `--no-metrics`, passes.
    pub fn check(&self, goose_metrics: &GooseMetrics) -> Vec<Breach> {
        let mut times = BTreeMap::new();
        let mut total = 0;
        let mut failures = 0;
        for request in goose_metrics.requests.values() {
            total += request.success_count + request.fail_count;
            failures += request.fail_count;
            for (time, count) in &request.raw_data.times {
                *times.entry(*time).or_insert(0) += count;
            }
        }

        self.breaches(&times, total, failures)
    }

    /// Compares response time counters and request counts with the limits.
    pub fn breaches(
        &self,
        times: &BTreeMap<usize, usize>,
        total: usize,
        failures: usize,
    ) -> Vec<Breach> {
        let mut breaches = Vec::new();

        if let Some(p95_ms) = percentile(times, PERCENTILE) {
            if p95_ms >= self.p95_ms {
                breaches.push(Breach::ResponseTime {
                    p95_ms,
                    limit_ms: self.p95_ms,
                });
            }
        }

        if total > 0 {
            let percent = failures as f64 * 100.0 / total as f64;
            if percent >= self.max_failure_percent {
                breaches.push(Breach::FailureRate {
                    percent,
                    limit_percent: self.max_failure_percent,
                });
            }
        }

        breaches
    }
}

/// Smallest response time at or below which `percent` of the counted
/// responses fall. `None` if nothing was counted.
pub fn percentile(times: &BTreeMap<usize, usize>, percent: f64) -> Option<usize> {
    let counted: usize = times.values().sum();
    if counted == 0 {
        return None;
    }
    let rank = ((counted as f64 * percent).ceil() as usize).max(1);

    let mut seen = 0;
    for (time, count) in times {
        seen += count;
        if seen >= rank {
            return Some(*time);
        }
    }
    times.keys().next_back().copied()
}

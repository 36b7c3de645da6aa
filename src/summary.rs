//! Reduces a sequence of lengths down to the four figures the report shows
//! for every length distribution: minimum, maximum, mean and median.

use serde::Serialize;

/// `{min, max, mean, median}` for one length distribution. An empty input
/// summarizes to all zeros rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthSummary {
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
}

impl LengthSummary {
    const EMPTY: LengthSummary = LengthSummary {
        min: 0,
        max: 0,
        mean: 0.0,
        median: 0.0,
    };

    /// Summarizes `values`, which need not be sorted on entry.
    pub fn of(values: &[u32]) -> LengthSummary {
        if values.is_empty() {
            return Self::EMPTY;
        }

        let mut sorted: Vec<u64> = values.iter().map(|&v| v as u64).collect();
        sorted.sort_unstable();

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let sum: u64 = sorted.iter().sum();
        let mean = round2(sum as f64 / sorted.len() as f64);
        let median = round2(median_of_sorted(&sorted));

        LengthSummary { min, max, mean, median }
    }
}

fn median_of_sorted(sorted: &[u64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    }
}

/// Rounds to two decimal places, matching the report's density/mean/median
/// precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Linear-regression forecast of future run distances.
//!
//! Entries are ranked `1..=n` in chronological order and a least-squares line
//! is fitted through `(rank, miles)`. "Next week" and "next month" are the
//! fitted values at ranks `n + 7` and `n + 30`, regardless of the real
//! calendar spacing between runs.

use crate::metrics::{advanced_metrics, chronological, round2};
use crate::{PerformancePrediction, RunEntry};

/// Fewer entries than this yield an all-zero prediction
const MIN_ENTRIES: usize = 3;

/// Rank offsets used for the two horizons
const WEEK_AHEAD: f64 = 7.0;
const MONTH_AHEAD: f64 = 30.0;

/// Fitted line `y = intercept + slope * x`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

impl Regression {
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Closed-form ordinary least squares over `(x, y)` points.
///
/// Returns `None` for an empty input or when every `x` is identical.
pub fn linear_regression(points: &[(f64, f64)]) -> Option<Regression> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_x2) = points.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sx2), &(x, y)| (sx + x, sy + y, sxy + x * y, sx2 + x * x),
    );

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(Regression { slope, intercept })
}

/// Forecast next-week and next-month distances for a run log
pub fn predict(entries: &[RunEntry]) -> PerformancePrediction {
    if entries.len() < MIN_ENTRIES {
        tracing::debug!(
            "Only {} entries, skipping forecast (need {})",
            entries.len(),
            MIN_ENTRIES
        );
        return PerformancePrediction::default();
    }

    let points: Vec<(f64, f64)> = chronological(entries)
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| ((idx + 1) as f64, entry.miles))
        .collect();

    // A flat line through the mean when the fit is undefined
    let fit = linear_regression(&points).unwrap_or_else(|| Regression {
        slope: 0.0,
        intercept: points.iter().map(|(_, y)| y).sum::<f64>() / points.len() as f64,
    });

    let n = points.len() as f64;
    let next_week = fit.at(n + WEEK_AHEAD).max(0.0);
    let next_month = fit.at(n + MONTH_AHEAD).max(0.0);

    PerformancePrediction {
        next_week_prediction: round2(next_week),
        next_month_prediction: round2(next_month),
        confidence: advanced_metrics(entries).consistency,
    }
}

//! Aggregate and derived statistics over run entries.
//!
//! All functions are pure and never fail. Float outputs are rounded with
//! [`round2`]: scale by 100, round half away from zero, scale back. Binary
//! floating point means `1.005` becomes `1.0` under this rule (`1.005 * 100`
//! is `100.49999...`).
//!
//! Degenerate inputs resolve as follows:
//! - empty input: every field zero, trend stable
//! - consistency is measured around the rounded average; when that average
//!   is zero it scores 100 if every run is zero, else 0
//! - trend with one entry: stable (there is no earlier half)
//! - trend with a zero earlier mean: improving if the later mean is positive

use crate::{AdvancedMetrics, ByPerson, Metrics, RunEntry, Trend};
use chrono::{Datelike, IsoWeek};
use std::collections::BTreeMap;

/// Assumed duration of every run, in minutes
const REFERENCE_RUN_MINUTES: f64 = 30.0;

/// Relative change (percent) the later half must exceed to count as a trend
const TREND_THRESHOLD_PCT: f64 = 10.0;

/// Round to 2 decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Count, total, mean, min and max of the entries' miles
pub fn basic_metrics(entries: &[RunEntry]) -> Metrics {
    if entries.is_empty() {
        return Metrics::default();
    }

    let total: f64 = entries.iter().map(|e| e.miles).sum();
    let min = entries.iter().map(|e| e.miles).fold(f64::INFINITY, f64::min);
    let max = entries
        .iter()
        .map(|e| e.miles)
        .fold(f64::NEG_INFINITY, f64::max);

    Metrics {
        count: entries.len(),
        total: round2(total),
        average: round2(total / entries.len() as f64),
        min: round2(min),
        max: round2(max),
    }
}

/// Basic metrics plus pace, consistency, trend and weekly statistics
pub fn advanced_metrics(entries: &[RunEntry]) -> AdvancedMetrics {
    if entries.is_empty() {
        return AdvancedMetrics::default();
    }

    let basic = basic_metrics(entries);
    let pace = if basic.average > 0.0 {
        round2(REFERENCE_RUN_MINUTES / basic.average)
    } else {
        0.0
    };

    let miles: Vec<f64> = entries.iter().map(|e| e.miles).collect();
    let consistency = consistency_score(&miles, basic.average);

    let sorted = chronological(entries);
    let trend = trend_of(&sorted);

    let weekly: Vec<f64> = week_sums(sorted.iter().copied())
        .into_iter()
        .map(|(_, sum)| sum)
        .collect();
    let weekly_average = weekly.iter().sum::<f64>() / weekly.len() as f64;
    let best_week = weekly.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let worst_week = weekly.iter().copied().fold(f64::INFINITY, f64::min);

    AdvancedMetrics {
        basic,
        pace,
        consistency,
        trend,
        weekly_average: round2(weekly_average),
        best_week: round2(best_week),
        worst_week: round2(worst_week),
    }
}

/// Split entries by exact person name, keeping each person's relative order
pub fn group_by_person(entries: &[RunEntry]) -> ByPerson<Vec<RunEntry>> {
    let mut groups: ByPerson<Vec<RunEntry>> = ByPerson::new();
    for entry in entries {
        groups.entry_or_default(&entry.person).push(entry.clone());
    }
    groups
}

pub fn metrics_by_person(entries: &[RunEntry]) -> ByPerson<Metrics> {
    group_by_person(entries).map(|group| basic_metrics(&group))
}

pub fn advanced_metrics_by_person(entries: &[RunEntry]) -> ByPerson<AdvancedMetrics> {
    group_by_person(entries).map(|group| advanced_metrics(&group))
}

/// ISO-8601 week key such as `2025-W01`
pub fn iso_week_key(entry: &RunEntry) -> String {
    format_week(entry.date.iso_week())
}

pub(crate) fn format_week(week: IsoWeek) -> String {
    format!("{}-W{:02}", week.year(), week.week())
}

/// Entries ordered by date; equal dates keep their input order
pub(crate) fn chronological(entries: &[RunEntry]) -> Vec<&RunEntry> {
    let mut sorted: Vec<&RunEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);
    sorted
}

/// Miles summed per ISO week, ascending by week
pub(crate) fn week_sums<'a, I>(entries: I) -> Vec<(IsoWeek, f64)>
where
    I: IntoIterator<Item = &'a RunEntry>,
{
    let mut weeks: BTreeMap<IsoWeek, f64> = BTreeMap::new();
    for entry in entries {
        *weeks.entry(entry.date.iso_week()).or_default() += entry.miles;
    }
    weeks.into_iter().collect()
}

/// Uniformity score in 0..=100 from the population standard deviation.
///
/// `mean` is the reported (rounded) average; deviations are taken from it.
fn consistency_score(miles: &[f64], mean: f64) -> u32 {
    if miles.is_empty() {
        return 0;
    }

    let n = miles.len() as f64;
    let variance = miles.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if mean == 0.0 {
        return if std_dev == 0.0 { 100 } else { 0 };
    }

    (100.0 - std_dev / mean * 100.0).clamp(0.0, 100.0).round() as u32
}

/// Compare the later half of chronologically sorted entries to the earlier half
fn trend_of(sorted: &[&RunEntry]) -> Trend {
    let half = sorted.len() / 2;
    let (first, second) = sorted.split_at(half);
    if first.is_empty() || second.is_empty() {
        return Trend::Stable;
    }

    let first_mean = mean_miles(first);
    let second_mean = mean_miles(second);

    if first_mean == 0.0 {
        return if second_mean > 0.0 {
            Trend::Improving
        } else {
            Trend::Stable
        };
    }

    let diff_pct = (second_mean - first_mean) * 100.0 / first_mean;
    if diff_pct > TREND_THRESHOLD_PCT {
        Trend::Improving
    } else if diff_pct < -TREND_THRESHOLD_PCT {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

fn mean_miles(entries: &[&RunEntry]) -> f64 {
    entries.iter().map(|e| e.miles).sum::<f64>() / entries.len() as f64
}

//! Chart-ready series derived from a run log.
//!
//! These feed the daily, leaderboard, trend-line and weekly views. Each
//! function returns a fresh vector with miles rounded to 2 decimals.

use crate::metrics::{chronological, format_week, round2, week_sums};
use crate::{ByPerson, RunEntry};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default number of trailing runs averaged into the trend line
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 3;

/// Miles logged on one UTC calendar day, across all runners
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub miles: f64,
}

/// One runner's total distance
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PersonTotal {
    pub person: String,
    pub miles: f64,
}

/// A run alongside the trailing average ending at it
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub miles: f64,
    pub moving_average: f64,
}

/// Miles summed over one ISO week
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeeklyTotal {
    pub week: String,
    pub miles: f64,
}

/// Per-day totals, oldest day first
pub fn daily_totals(entries: &[RunEntry]) -> Vec<DailyTotal> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in entries {
        *days.entry(entry.day()).or_default() += entry.miles;
    }

    days.into_iter()
        .map(|(date, miles)| DailyTotal {
            date,
            miles: round2(miles),
        })
        .collect()
}

/// Total miles per runner, largest first; ties keep first-seen order
pub fn person_totals(entries: &[RunEntry]) -> Vec<PersonTotal> {
    let mut totals: ByPerson<f64> = ByPerson::new();
    for entry in entries {
        *totals.entry_or_default(&entry.person) += entry.miles;
    }

    let mut leaderboard: Vec<PersonTotal> = totals
        .into_iter()
        .map(|(person, miles)| PersonTotal {
            person,
            miles: round2(miles),
        })
        .collect();
    leaderboard.sort_by(|a, b| b.miles.total_cmp(&a.miles));
    leaderboard
}

/// Chronological runs with a trailing mean over up to `window` runs.
///
/// A window of 0 is treated as 1.
pub fn moving_average(entries: &[RunEntry], window: usize) -> Vec<TrendPoint> {
    let window = window.max(1);
    let sorted = chronological(entries);

    sorted
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let start = (idx + 1).saturating_sub(window);
            let span = &sorted[start..=idx];
            let avg = span.iter().map(|e| e.miles).sum::<f64>() / span.len() as f64;
            TrendPoint {
                date: entry.day(),
                miles: round2(entry.miles),
                moving_average: round2(avg),
            }
        })
        .collect()
}

/// Per-ISO-week totals, oldest week first
pub fn weekly_totals(entries: &[RunEntry]) -> Vec<WeeklyTotal> {
    week_sums(entries)
        .into_iter()
        .map(|(week, miles)| WeeklyTotal {
            week: format_week(week),
            miles: round2(miles),
        })
        .collect()
}

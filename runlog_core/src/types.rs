//! Core domain types for runlog.
//!
//! This module defines the values that flow through the pipeline:
//! - Run entries (the parsed CSV rows)
//! - Aggregate and derived metrics
//! - Forecast output
//! - The insertion-ordered per-person mapping

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Record Model
// ============================================================================

/// Earliest and latest calendar years a run may be logged in
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

pub(crate) fn is_loggable_date(date: &DateTime<Utc>) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// A single logged run
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunEntry {
    pub date: DateTime<Utc>,
    pub person: String,
    pub miles: f64,
}

impl RunEntry {
    pub fn new(date: DateTime<Utc>, person: impl Into<String>, miles: f64) -> Self {
        Self {
            date,
            person: person.into(),
            miles,
        }
    }

    /// Entry dated at UTC midnight of the given calendar day
    pub fn on_day(day: NaiveDate, person: impl Into<String>, miles: f64) -> Self {
        Self::new(day.and_time(NaiveTime::MIN).and_utc(), person, miles)
    }

    /// UTC calendar day the run was logged on
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Whether the date falls in a four-digit calendar year
    pub fn has_valid_date(&self) -> bool {
        is_loggable_date(&self.date)
    }

    pub fn has_valid_person(&self) -> bool {
        !self.person.trim().is_empty()
    }

    /// Miles must be a finite, non-negative number
    pub fn has_valid_miles(&self) -> bool {
        self.miles.is_finite() && self.miles >= 0.0
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Direction of change between the earlier and later half of a run log
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Aggregate statistics over the miles of a set of entries.
///
/// Every float is rounded to 2 decimal places.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Metrics {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// [`Metrics`] plus pace, consistency, trend and weekly statistics
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct AdvancedMetrics {
    #[serde(flatten)]
    pub basic: Metrics,
    /// Minutes per mile assuming a 30 minute run
    pub pace: f64,
    /// 0-100, higher means more uniform distances
    pub consistency: u32,
    pub trend: Trend,
    pub weekly_average: f64,
    pub best_week: f64,
    pub worst_week: f64,
}

// ============================================================================
// Forecast
// ============================================================================

/// Share of the weekly confidence reported for the monthly forecast
const MONTH_CONFIDENCE_FACTOR: f64 = 0.85;

/// Linear extrapolation of future run distances
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct PerformancePrediction {
    pub next_week_prediction: f64,
    pub next_month_prediction: f64,
    /// Consistency score of the same entries
    pub confidence: u32,
}

impl PerformancePrediction {
    /// Confidence discounted for the longer monthly horizon
    pub fn month_confidence(&self) -> u32 {
        (f64::from(self.confidence) * MONTH_CONFIDENCE_FACTOR).round() as u32
    }
}

// ============================================================================
// Per-person mapping
// ============================================================================

/// Values keyed by person, iterated in order of each person's first appearance.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Clone, Debug, PartialEq)]
pub struct ByPerson<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for ByPerson<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> ByPerson<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `person`, inserting `T::default()` at the end if absent
    pub fn entry_or_default(&mut self, person: &str) -> &mut T
    where
        T: Default,
    {
        let idx = match self.position(person) {
            Some(idx) => idx,
            None => {
                self.entries.push((person.to_string(), T::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, person: &str) -> Option<&T> {
        self.position(person).map(|idx| &self.entries[idx].1)
    }

    pub fn contains(&self, person: &str) -> bool {
        self.position(person).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Person names in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Person names in alphabetical order
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Apply `f` to every value, keeping the key order
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ByPerson<U> {
        ByPerson {
            entries: self
                .entries
                .into_iter()
                .map(|(name, value)| (name, f(value)))
                .collect(),
        }
    }

    fn position(&self, person: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == person)
    }
}

impl<T> IntoIterator for ByPerson<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for ByPerson<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_on_day_is_utc_midnight() {
        let entry = RunEntry::on_day(day(2024, 3, 9), "Alice", 4.2);
        assert_eq!(entry.date.to_rfc3339(), "2024-03-09T00:00:00+00:00");
        assert_eq!(entry.day(), day(2024, 3, 9));
    }

    #[test]
    fn test_entry_validity_checks() {
        let ok = RunEntry::on_day(day(2024, 1, 1), "Bob", 0.0);
        assert!(ok.has_valid_date());
        assert!(ok.has_valid_person());
        assert!(ok.has_valid_miles());

        let bad = RunEntry::on_day(day(10_000, 1, 1), "  ", f64::NAN);
        assert!(!bad.has_valid_date());
        assert!(!bad.has_valid_person());
        assert!(!bad.has_valid_miles());

        assert!(!RunEntry::on_day(day(2024, 1, 1), "Bob", -0.5).has_valid_miles());
        assert!(!RunEntry::on_day(day(2024, 1, 1), "Bob", f64::INFINITY).has_valid_miles());
    }

    #[test]
    fn test_trend_display_and_serde() {
        assert_eq!(Trend::Improving.to_string(), "improving");
        assert_eq!(serde_json::to_string(&Trend::Declining).unwrap(), "\"declining\"");
        assert_eq!(Trend::default(), Trend::Stable);
    }

    #[test]
    fn test_month_confidence() {
        let prediction = PerformancePrediction {
            confidence: 80,
            ..Default::default()
        };
        assert_eq!(prediction.month_confidence(), 68);
    }

    #[test]
    fn test_by_person_keeps_first_seen_order() {
        let mut map: ByPerson<u32> = ByPerson::new();
        *map.entry_or_default("Zed") += 1;
        *map.entry_or_default("Amy") += 2;
        *map.entry_or_default("Zed") += 3;

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["Zed", "Amy"]);
        assert_eq!(map.sorted_names(), vec!["Amy", "Zed"]);
        assert_eq!(map.get("Zed"), Some(&4));
        assert!(!map.contains("zed"));
    }

    #[test]
    fn test_by_person_serializes_in_order() {
        let mut map: ByPerson<u32> = ByPerson::new();
        *map.entry_or_default("b") = 1;
        *map.entry_or_default("a") = 2;
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn test_advanced_metrics_flattens_basic() {
        let json = serde_json::to_value(AdvancedMetrics::default()).unwrap();
        assert_eq!(json["count"], 0);
        assert_eq!(json["trend"], "stable");
        assert_eq!(json["weekly_average"], 0.0);
    }
}

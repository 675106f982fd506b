//! Upload gate and the bundled views built on top of it.
//!
//! [`load`] is the single entry point for raw text: it parses, validates and
//! only then hands back entries. The report types gather everything one view
//! needs so a front end only has to render them.

use crate::metrics::{advanced_metrics, advanced_metrics_by_person, group_by_person};
use crate::series::{
    daily_totals, moving_average, person_totals, weekly_totals, DailyTotal, PersonTotal,
    TrendPoint, WeeklyTotal,
};
use crate::{
    forecast, parser, validate, AdvancedMetrics, ByPerson, PerformancePrediction, Result,
    RunEntry,
};
use serde::Serialize;
use std::path::Path;

/// Parse and validate a run log, rejecting it as a whole on the first problem
pub fn load(text: &str) -> Result<Vec<RunEntry>> {
    let entries = parser::parse(text)?;
    validate::validate(&entries)?;

    tracing::info!(
        "Loaded {} runs for {} runners",
        entries.len(),
        group_by_person(&entries).len()
    );
    Ok(entries)
}

/// Read a run log from disk and [`load`] it
pub fn load_file(path: &Path) -> Result<Vec<RunEntry>> {
    let text = std::fs::read_to_string(path)?;
    tracing::debug!("Read {} bytes from {:?}", text.len(), path);
    load(&text)
}

/// Everything the all-runners view shows
#[derive(Clone, Debug, Serialize)]
pub struct OverallReport {
    pub metrics: AdvancedMetrics,
    pub prediction: PerformancePrediction,
    pub runners: ByPerson<AdvancedMetrics>,
    pub leaderboard: Vec<PersonTotal>,
    pub daily: Vec<DailyTotal>,
    pub weekly: Vec<WeeklyTotal>,
}

impl OverallReport {
    pub fn build(entries: &[RunEntry]) -> Self {
        Self {
            metrics: advanced_metrics(entries),
            prediction: forecast::predict(entries),
            runners: advanced_metrics_by_person(entries),
            leaderboard: person_totals(entries),
            daily: daily_totals(entries),
            weekly: weekly_totals(entries),
        }
    }
}

/// Everything the single-runner view shows
#[derive(Clone, Debug, Serialize)]
pub struct PersonReport {
    pub person: String,
    pub metrics: AdvancedMetrics,
    pub prediction: PerformancePrediction,
    pub month_confidence: u32,
    pub trend_line: Vec<TrendPoint>,
    pub weekly: Vec<WeeklyTotal>,
}

impl PersonReport {
    /// Report for `person`, or `None` if they have no runs.
    ///
    /// `window` is the moving-average width for the trend line.
    pub fn build(entries: &[RunEntry], person: &str, window: usize) -> Option<Self> {
        let groups = group_by_person(entries);
        let runs = groups.get(person)?;
        let prediction = forecast::predict(runs);

        Some(Self {
            person: person.to_string(),
            metrics: advanced_metrics(runs),
            month_confidence: prediction.month_confidence(),
            prediction,
            trend_line: moving_average(runs, window),
            weekly: weekly_totals(runs),
        })
    }
}

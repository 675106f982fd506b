//! CSV ingestion for run logs.
//!
//! The input is a single comma-separated text blob with a header row naming
//! `date`, `person` and `miles` (or `mi`) columns in any order. Parsing is
//! fail-fast: the first malformed row aborts with a row-numbered
//! [`FormatError`].

use crate::error::FormatError;
use crate::types::is_loggable_date;
use crate::RunEntry;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};

/// Date-only layouts, tried in order. Parsed as UTC midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time layouts without an offset. Interpreted as UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    person: usize,
    miles: usize,
    width: usize,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, FormatError> {
        let names: Vec<String> = header.iter().map(str::to_lowercase).collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let date = find("date").ok_or(FormatError::MissingColumns)?;
        let person = find("person").ok_or(FormatError::MissingColumns)?;
        let miles = find("miles")
            .or_else(|| find("mi"))
            .ok_or(FormatError::MissingColumns)?;

        Ok(Self {
            date,
            person,
            miles,
            width: names.len(),
        })
    }
}

/// Maps reader byte offsets back to 1-based physical line numbers.
///
/// The reader reports a record's position as the point where it started
/// scanning, which sits before any blank lines it skipped on the way. Those
/// terminators are stepped over so the line is the one holding the record.
struct LineIndex<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    /// Line of the first non-terminator byte at or after `byte`; offsets
    /// must be non-decreasing across calls
    fn line_at(&mut self, byte: u64) -> usize {
        let from = usize::try_from(byte).map_or(self.bytes.len(), |b| b.min(self.bytes.len()));
        let start = from
            + self.bytes[from..]
                .iter()
                .take_while(|&&b| b == b'\n' || b == b'\r')
                .count();

        if start > self.offset {
            self.line += self.bytes[self.offset..start]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.offset = start;
        }
        self.line
    }
}

/// Parse a run log into entries, preserving input row order.
///
/// Rows are numbered from 1 with the header as row 1. Blank lines are
/// skipped but still count towards the numbering of later rows. Fields are
/// split on every comma; quotes carry no meaning.
pub fn parse(text: &str) -> Result<Vec<RunEntry>, FormatError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let mut lines = LineIndex::new(text);

    let mut records: Vec<(usize, StringRecord)> = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                // In-memory UTF-8 input with quoting off leaves nothing to
                // reject but the row shape
                let line = lines.line_at(err.position().map_or(0, |pos| pos.byte()));
                let row = records.first().map_or(1, |(header_line, _)| line - header_line + 1);
                return Err(FormatError::ColumnCountMismatch { row });
            }
        };
        if !is_blank(&record) {
            let line = lines.line_at(record.position().map_or(0, |pos| pos.byte()));
            records.push((line, record));
        }
    }

    let mut records = records.into_iter();
    let (header_line, header) = records.next().ok_or(FormatError::Empty)?;
    let mut rows = records.peekable();
    if rows.peek().is_none() {
        return Err(FormatError::Empty);
    }
    let columns = Columns::from_header(&header)?;

    let mut entries = Vec::new();
    for (line, record) in rows {
        let row = line - header_line + 1;
        entries.push(parse_row(&record, columns, row)?);
    }

    tracing::debug!("Parsed {} run entries", entries.len());
    Ok(entries)
}

/// A whitespace-only line reads as one empty field
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

fn parse_row(
    record: &StringRecord,
    columns: Columns,
    row: usize,
) -> Result<RunEntry, FormatError> {
    if record.len() != columns.width {
        return Err(FormatError::ColumnCountMismatch { row });
    }

    let date_str = &record[columns.date];
    let date = parse_date(date_str).ok_or_else(|| FormatError::InvalidDate {
        row,
        value: date_str.to_string(),
    })?;

    let miles_str = &record[columns.miles];
    let miles = parse_miles(miles_str).ok_or_else(|| FormatError::InvalidMiles {
        row,
        value: miles_str.to_string(),
    })?;

    let person = &record[columns.person];
    if person.is_empty() {
        return Err(FormatError::MissingPerson { row });
    }

    Ok(RunEntry::new(date, person, miles))
}

/// Parse a date cell into a UTC instant.
///
/// Accepts RFC 3339 timestamps (converted to UTC), naive date-times (taken as
/// UTC) and bare dates (UTC midnight).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        })?;

    is_loggable_date(&parsed).then_some(parsed)
}

/// Parse a miles cell; rejects negatives and non-finite values
fn parse_miles(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|miles| miles.is_finite() && *miles >= 0.0)
}

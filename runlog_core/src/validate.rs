//! Structural gate over parsed entries.
//!
//! The parser already enforces these rules; this pass re-checks them for
//! entries built by any other route before they are accepted.

use crate::error::ValidationError;
use crate::RunEntry;

/// Check every entry, stopping at the first violation.
///
/// Error rows are 1-based positions in `entries`.
pub fn validate(entries: &[RunEntry]) -> Result<(), ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::NoData);
    }

    for (idx, entry) in entries.iter().enumerate() {
        let row = idx + 1;

        if !entry.has_valid_date() {
            return Err(ValidationError::InvalidDate { row });
        }
        if !entry.has_valid_person() {
            return Err(ValidationError::InvalidPerson { row });
        }
        if !entry.has_valid_miles() {
            return Err(ValidationError::InvalidMiles { row });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(person: &str, miles: f64) -> RunEntry {
        RunEntry::on_day(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), person, miles)
    }

    #[test]
    fn test_empty_is_invalid() {
        let err = validate(&[]).unwrap_err();
        assert_eq!(err, ValidationError::NoData);
        assert_eq!(err.to_string(), "No valid data rows found");
    }

    #[test]
    fn test_valid_entries_pass() {
        let entries = vec![entry("Alice", 3.0), entry("Bob", 0.0)];
        assert!(validate(&entries).is_ok());
    }

    #[test]
    fn test_rejects_hand_built_negative_miles() {
        let entries = vec![entry("Alice", 3.0), entry("Bob", -1.0)];
        let err = validate(&entries).unwrap_err();
        assert_eq!(err, ValidationError::InvalidMiles { row: 2 });
        assert_eq!(err.to_string(), "Invalid miles value in row 2");
    }

    #[test]
    fn test_rejects_non_numeric_miles() {
        let entries = vec![entry("Alice", f64::NAN)];
        assert_eq!(validate(&entries), Err(ValidationError::InvalidMiles { row: 1 }));
    }

    #[test]
    fn test_rejects_empty_person() {
        let entries = vec![entry("Alice", 1.0), entry("Bob", 1.0), entry("", 1.0)];
        assert_eq!(validate(&entries), Err(ValidationError::InvalidPerson { row: 3 }));
    }

    #[test]
    fn test_rejects_out_of_range_date() {
        let far = RunEntry::on_day(NaiveDate::from_ymd_opt(12_000, 1, 1).unwrap(), "Alice", 1.0);
        let entries = vec![entry("Bob", 1.0), far];
        assert_eq!(validate(&entries), Err(ValidationError::InvalidDate { row: 2 }));
    }

    #[test]
    fn test_stops_at_first_violation() {
        let entries = vec![entry("", -1.0), entry("Bob", -5.0)];
        assert_eq!(validate(&entries), Err(ValidationError::InvalidPerson { row: 1 }));
    }
}

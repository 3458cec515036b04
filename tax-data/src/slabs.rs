//! Slab schedules from CSV.
//!
//! | Column        | Type    | Notes                                   |
//! |---------------|---------|-----------------------------------------|
//! | `upper_bound` | decimal | Leave empty for the open top slab       |
//! | `rate`        | decimal | Fraction, e.g. `0.05` for 5%            |
//!
//! Rows must be in ascending order; the schedule is validated once all rows
//! are read.
//!
//! ```csv
//! upper_bound,rate
//! 250000,0
//! 500000,0.05
//! 1000000,0.20
//! ,0.30
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{SlabSchedule, TaxSlab};

use crate::error::DataError;

#[derive(Debug, Deserialize)]
struct SlabRow {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    upper_bound: Option<Decimal>,
    rate: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Parses and validates a schedule from any reader.
///
/// # Errors
///
/// * [`DataError::Csv`] if a row is structurally invalid or a bound is not a
///   number.
/// * [`DataError::InvalidRate`] if a rate cell is not a number.
/// * [`DataError::Schedule`] if the rows do not form a valid schedule.
pub fn load_schedule<R: Read>(reader: R) -> Result<SlabSchedule, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut slabs = Vec::new();
    for (idx, result) in csv_reader.deserialize::<SlabRow>().enumerate() {
        let row = result?;
        let rate = row
            .rate
            .parse::<Decimal>()
            .map_err(|_| DataError::InvalidRate {
                value: row.rate.clone(),
                row: idx + 1,
            })?;
        slabs.push(TaxSlab {
            upper_bound: row.upper_bound,
            rate,
        });
    }

    Ok(SlabSchedule::new(slabs)?)
}

pub fn load_schedule_file(path: &Path) -> Result<SlabSchedule, DataError> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    load_schedule(file)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::SlabScheduleError;

    use super::*;

    const DEFAULT_CSV: &str = "upper_bound,rate\n250000,0\n500000,0.05\n1000000,0.20\n,0.30\n";

    #[test]
    fn default_table_round_trips_through_csv() {
        let schedule = load_schedule(DEFAULT_CSV.as_bytes()).unwrap();

        assert_eq!(schedule, SlabSchedule::default());
    }

    #[test]
    fn empty_upper_bound_is_unbounded() {
        let schedule = load_schedule("upper_bound,rate\n100,0.1\n ,0.2\n".as_bytes()).unwrap();

        assert_eq!(schedule.slabs()[0].upper_bound, Some(dec!(100)));
        assert_eq!(schedule.slabs()[1].upper_bound, None);
        assert_eq!(schedule.slabs()[1].rate, dec!(0.2));
    }

    #[test]
    fn header_only_is_an_empty_schedule() {
        let err = load_schedule("upper_bound,rate\n".as_bytes()).unwrap_err();

        assert!(matches!(err, DataError::Schedule(SlabScheduleError::Empty)));
    }

    #[test]
    fn bad_rate_reports_row() {
        let err = load_schedule("upper_bound,rate\n100,0.1\n,ten\n".as_bytes()).unwrap_err();

        match err {
            DataError::InvalidRate { value, row } => {
                assert_eq!(value, "ten");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidRate, got {other:?}"),
        }
    }

    #[test]
    fn bad_bound_is_a_csv_error() {
        let err = load_schedule("upper_bound,rate\nlots,0.1\n,0.2\n".as_bytes()).unwrap_err();

        assert!(matches!(err, DataError::Csv(_)));
    }

    #[test]
    fn descending_bounds_are_rejected() {
        let err = load_schedule("upper_bound,rate\n500,0.1\n100,0.2\n,0.3\n".as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            DataError::Schedule(SlabScheduleError::NotIncreasing { index: 1, .. })
        ));
    }

    #[test]
    fn load_schedule_file_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");

        let err = load_schedule_file(&missing).unwrap_err();

        assert!(matches!(err, DataError::Io { .. }));
    }
}

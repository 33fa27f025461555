//! Daily rollups over hourly readings

use crate::types::{DailyAverage, Reading};
use chrono::NaiveDate;

/// Aggregation over an empty reading sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot aggregate an empty sequence of readings")]
pub struct EmptyInputError;

/// Running sum/count for a single calendar date
#[derive(Debug, Clone)]
pub struct DailyAccumulator {
    date: NaiveDate,
    sum: f64,
    count: usize,
}

impl DailyAccumulator {
    /// Start a new day seeded with its first reading
    pub fn new(reading: &Reading) -> Self {
        Self {
            date: reading.date(),
            sum: reading.temperature,
            count: 1,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn add(&mut self, temperature: f64) {
        self.sum += temperature;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn result(&self) -> DailyAverage {
        DailyAverage {
            date: self.date,
            average_temperature: round2(self.sum / self.count as f64),
        }
    }
}

/// Round to 2 decimal places from the stored binary value, ties to even
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Group readings by calendar date and average each group.
///
/// Readings must be sorted ascending by timestamp. Dates are emitted in
/// first-seen order, one entry per run of equal dates.
pub fn aggregate(readings: &[Reading]) -> Result<Vec<DailyAverage>, EmptyInputError> {
    let (first, rest) = readings.split_first().ok_or(EmptyInputError)?;

    let mut days = Vec::new();
    let mut current = DailyAccumulator::new(first);

    for reading in rest {
        if reading.date() == current.date() {
            current.add(reading.temperature);
        } else {
            days.push(current.result());
            current = DailyAccumulator::new(reading);
        }
    }
    days.push(current.result());

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_timestamp;

    fn reading(temperature: f64, ts: &str) -> Reading {
        Reading::new(temperature, parse_timestamp(ts).unwrap())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_same_day_average() {
        let days = aggregate(&[
            reading(10.0, "2024-01-01T00:00"),
            reading(20.0, "2024-01-01T01:00"),
        ])
        .unwrap();

        assert_eq!(
            days,
            vec![DailyAverage {
                date: date("2024-01-01"),
                average_temperature: 15.0
            }]
        );
    }

    #[test]
    fn test_midnight_boundary() {
        let days = aggregate(&[
            reading(10.0, "2024-01-01T23:00"),
            reading(30.0, "2024-01-02T00:00"),
        ])
        .unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date("2024-01-01"));
        assert_eq!(days[0].average_temperature, 10.0);
        assert_eq!(days[1].date, date("2024-01-02"));
        assert_eq!(days[1].average_temperature, 30.0);
    }

    #[test]
    fn test_single_reading() {
        let days = aggregate(&[reading(-4.2, "2024-02-29T12:00")]).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date("2024-02-29"));
        assert_eq!(days[0].average_temperature, -4.2);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(aggregate(&[]), Err(EmptyInputError));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let days = aggregate(&[
            reading(1.0, "2024-01-01T00:00"),
            reading(1.0, "2024-01-01T01:00"),
            reading(2.0, "2024-01-01T02:00"),
        ])
        .unwrap();
        assert_eq!(days[0].average_temperature, 1.33);
    }

    #[test]
    fn test_round2_uses_stored_value() {
        // 9.975 is stored just below the midpoint
        assert_eq!(round2(9.975), 9.97);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_round2_exact_tie_goes_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn test_average_on_exact_tie() {
        let days = aggregate(&[
            reading(0.0, "2024-01-01T00:00"),
            reading(0.25, "2024-01-01T01:00"),
        ])
        .unwrap();
        assert_eq!(days[0].average_temperature, 0.12);
    }

    #[test]
    fn test_full_hourly_window() {
        // 5 days x 24 hours, each day's temperature equals its index
        let start = parse_timestamp("2024-06-10T00:00").unwrap();
        let readings: Vec<Reading> = (0..120)
            .map(|h| {
                let ts = start + chrono::Duration::hours(h);
                Reading::new((h / 24) as f64, ts)
            })
            .collect();

        let days = aggregate(&readings).unwrap();

        assert_eq!(days.len(), 5);
        assert!(days.len() <= readings.len());
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.average_temperature, i as f64);
            assert_eq!(day.date, date("2024-06-10") + chrono::Duration::days(i as i64));
        }
    }

    #[test]
    fn test_accumulator_counts() {
        let first = reading(5.0, "2024-01-01T00:00");
        let mut acc = DailyAccumulator::new(&first);
        acc.add(7.0);
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.result().average_temperature, 6.0);
    }
}

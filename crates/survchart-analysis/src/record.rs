//! Life-table input rows
//!
//! Every CSV record holds one life-table row of one stratum. Fields are kept as
//! raw strings until a chart needs them, because the numeric columns may carry
//! the suppression marker `S` instead of a number.

use std::str::FromStr;

use serde::Deserialize;
use survchart_stats::survival::LifeTableEntry;

/// Number of columns in an input record.
pub const FIELD_COUNT: usize = 8;

/// Character used in numeric columns for suppressed values. Read as `0`.
pub const SUPPRESSED_MARKER: char = 'S';

/// One input row, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LifeTableRow {
    /// Row identifier
    pub id: String,
    /// Comma-separated `field=value` pairs
    pub strata: String,
    /// Metric (analysis) name
    pub metric: String,
    /// Time point in months
    pub time: String,
    /// Number of events at the time point
    pub events: String,
    /// Population of the stratum. Read but not used by any chart.
    pub population: String,
    /// Number of subjects at risk at the time point
    pub at_risk: String,
    /// Standard error of the survival estimate
    pub std_error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum NumericField {
    #[display("time")]
    Time,
    #[display("events")]
    Events,
    #[display("at-risk")]
    AtRisk,
    #[display("standard error")]
    StdError,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid {field} value {value:?}")]
pub struct ParseFieldError {
    pub field: NumericField,
    pub value: String,
}

impl LifeTableRow {
    pub fn time(&self) -> Result<u32, ParseFieldError> {
        parse_numeric(NumericField::Time, &self.time)
    }

    pub fn events(&self) -> Result<f64, ParseFieldError> {
        parse_finite(NumericField::Events, &self.events)
    }

    pub fn at_risk(&self) -> Result<f64, ParseFieldError> {
        parse_finite(NumericField::AtRisk, &self.at_risk)
    }

    pub fn std_error(&self) -> Result<f64, ParseFieldError> {
        parse_finite(NumericField::StdError, &self.std_error)
    }

    /// Converts the row into a Kaplan-Meier life-table entry.
    pub fn to_entry(&self) -> Result<LifeTableEntry, ParseFieldError> {
        Ok(LifeTableEntry {
            time: self.time()?,
            events: self.events()?,
            at_risk: self.at_risk()?,
        })
    }
}

/// Parses a numeric column, replacing every suppression marker with `0` first.
fn parse_numeric<T>(field: NumericField, raw: &str) -> Result<T, ParseFieldError>
where
    T: FromStr,
{
    raw.trim()
        .replace(SUPPRESSED_MARKER, "0")
        .parse()
        .map_err(|_| ParseFieldError {
            field,
            value: raw.to_owned(),
        })
}

fn parse_finite(field: NumericField, raw: &str) -> Result<f64, ParseFieldError> {
    let value: f64 = parse_numeric(field, raw)?;
    if !value.is_finite() {
        return Err(ParseFieldError {
            field,
            value: raw.to_owned(),
        });
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(strata: &str, metric: &str, cols: [&str; 5]) -> LifeTableRow {
        let [time, events, population, at_risk, std_error] = cols;
        LifeTableRow {
            id: format!("{metric}:{strata}:{time}"),
            strata: strata.to_owned(),
            metric: metric.to_owned(),
            time: time.to_owned(),
            events: events.to_owned(),
            population: population.to_owned(),
            at_risk: at_risk.to_owned(),
            std_error: std_error.to_owned(),
        }
    }

    #[test]
    fn test_suppressed_values_read_as_zero() {
        let row = row("eth_maori=1", "Stage1", ["S", "S", "120", "S", "S"]);
        assert_eq!(row.time().unwrap(), 0);
        assert_eq!(row.events().unwrap(), 0.0);
        assert_eq!(row.at_risk().unwrap(), 0.0);
        assert_eq!(row.std_error().unwrap(), 0.0);
    }

    #[test]
    fn test_marker_is_replaced_inside_numbers() {
        let row = row("eth_maori=1", "Stage1", ["1S", "2", "3", "4", "0.0S1"]);
        assert_eq!(row.time().unwrap(), 10);
        assert!((row.std_error().unwrap() - 0.001).abs() < 1e-15);
    }

    #[test]
    fn test_to_entry() {
        let row = row("eth_maori=1", "Stage1", ["12", "7", "300", "250", "0.01"]);
        let entry = row.to_entry().unwrap();
        assert_eq!(entry.time, 12);
        assert_eq!(entry.events, 7.0);
        assert_eq!(entry.at_risk, 250.0);
    }

    #[test]
    fn test_invalid_values() {
        let row = row("eth_maori=1", "Stage1", ["1.5", "x", "3", "inf", "NaN"]);

        let err = row.time().unwrap_err();
        assert_eq!(err.field, NumericField::Time);
        assert_eq!(err.value, "1.5");

        assert_eq!(row.events().unwrap_err().field, NumericField::Events);
        assert_eq!(row.at_risk().unwrap_err().field, NumericField::AtRisk);
        assert_eq!(row.std_error().unwrap_err().field, NumericField::StdError);
        assert_eq!(
            row.events().unwrap_err().to_string(),
            "invalid events value \"x\""
        );
    }
}

//! Survival summary table display
//!
//! This module provides functions for writing per-chart survival statistics
//! in a consistent tabular format.

use std::io::{self, Write};

use survchart_analysis::chart::{ChartSeries, ChartSpec};

/// A row in a survival summary table
pub(super) struct SummaryRow<'a> {
    /// Legend label of the curve
    pub label: &'a str,
    /// Number of life-table rows
    pub rows: usize,
    /// Sum of events over all rows
    pub events: f64,
    /// Survival probability at the last time point
    pub final_survival: f64,
    /// Time of the point nearest to 50% survival
    pub crossing: Option<u32>,
    /// Interpolated median survival time
    pub median: Option<f64>,
}

impl<'a> SummaryRow<'a> {
    pub fn from_series(series: &'a ChartSeries) -> Self {
        let curve = &series.curve;
        Self {
            label: &series.label,
            rows: curve.len(),
            events: curve.events.iter().sum(),
            final_survival: curve.final_survival(),
            crossing: series.crosshair.map(|c| c.time),
            median: curve.median_survival(),
        }
    }
}

fn write_header<W>(w: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        w,
        "  {:<24} {:>6} {:>10} {:>10} {:>10} {:>12}",
        "Curve", "Rows", "Events", "Final S", "Crossing", "Median(KM)",
    )
}

fn write_separator<W>(w: &mut W) -> io::Result<()>
where
    W: Write,
{
    // label(24) + rows(6) + events(10) + final(10) + crossing(10) + median(12) + spaces(5)
    writeln!(w, "  {}", "-".repeat(77))
}

fn write_row<W>(w: &mut W, row: &SummaryRow) -> io::Result<()>
where
    W: Write,
{
    let crossing = row.crossing.map_or("N/A".to_string(), |t| t.to_string());
    let median = row.median.map_or("N/A".to_string(), |m| format!("{m:.1}"));
    writeln!(
        w,
        "  {:<24} {:>6} {:>10.0} {:>10.3} {:>10} {:>12}",
        row.label, row.rows, row.events, row.final_survival, crossing, median,
    )
}

/// Write the summary table of one chart
pub(super) fn write_chart_table<W>(w: &mut W, chart: &ChartSpec) -> io::Result<()>
where
    W: Write,
{
    writeln!(w, "{}", chart.title)?;
    write_header(w)?;
    write_separator(w)?;
    for series in &chart.series {
        write_row(w, &SummaryRow::from_series(series))?;
    }
    if !chart.skipped.is_empty() {
        writeln!(w, "  (Skipped unknown: {})", chart.skipped.join(", "))?;
    }
    Ok(())
}

/// Write legend explaining table columns
pub(super) fn write_legend<W>(w: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(w, "Legend:")?;
    writeln!(w, "  Final S     : Kaplan-Meier survival probability at the last time point")?;
    writeln!(w, "  Crossing    : Time of the curve point nearest to 50% survival (chart crosshair)")?;
    writeln!(w, "  Median(KM)  : Interpolated time at which survival first drops to 50%")
}

#[cfg(test)]
mod tests {
    use survchart_analysis::{dataset::GroupedDataset, strata::StrataSplit};

    use super::*;

    #[test]
    fn test_chart_table() {
        let data = "\
id,strata,metric,time,events,population,at_risk,std_error
1,is_benefit=1,Stage2,0,0,10,10,0
2,is_benefit=1,Stage2,6,5,10,10,0.1
3,is_benefit=Unknown,Stage2,0,0,10,10,0
4,is_benefit=0,Stage2,0,1,10,10,0.01
";
        let dataset = GroupedDataset::from_reader(data.as_bytes(), StrataSplit::Joined).unwrap();
        let chart = dataset.charts().next().unwrap().unwrap();

        let mut out = Vec::new();
        write_chart_table(&mut out, &chart).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "Stage2 - Benefit");
        assert!(lines[1].trim_start().starts_with("Curve"));
        assert_eq!(lines.len(), 6);

        let true_row = lines[3].split_whitespace().collect::<Vec<_>>();
        assert_eq!(true_row, ["True", "2", "5", "0.500", "6", "6.0"]);
        let false_row = lines[4].split_whitespace().collect::<Vec<_>>();
        assert_eq!(false_row, ["False", "1", "1", "0.900", "0", "N/A"]);
        assert_eq!(lines[5], "  (Skipped unknown: Unknown)");
    }
}

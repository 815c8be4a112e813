//! Curve export command
//!
//! Writes the computed Kaplan-Meier curves of every chart to CSV, one file per
//! analysis title.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use survchart_analysis::chart::ChartSpec;

use super::InputArg;
use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct ExportCurvesArg {
    #[command(flatten)]
    pub input: InputArg,

    /// Output directory for KM curve CSV files
    #[arg(long)]
    pub output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct CurveRecord<'a> {
    label: &'a str,
    time: u32,
    survival_prob: f64,
    lower: f64,
    upper: f64,
    at_risk: f64,
    events: f64,
}

pub(crate) fn run(arg: &ExportCurvesArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(&arg.input.input, arg.input.split)?;
    util::create_output_dir(&arg.output_dir)?;

    for chart in dataset.charts() {
        let chart = chart?;
        let path = util::chart_path(&arg.output_dir, &chart.title, "_km.csv");
        save_chart_curves(&path, &chart)?;
        tracing::info!(path = %path.display(), "saved KM curves");
    }

    Ok(())
}

/// Save the curves of all series of a chart to a CSV file
fn save_chart_curves(path: &Path, chart: &ChartSpec) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    for series in &chart.series {
        let curve = &series.curve;
        for (i, point) in series.points.iter().enumerate() {
            writer
                .serialize(CurveRecord {
                    label: &series.label,
                    time: point.time,
                    survival_prob: point.survival,
                    lower: point.lower,
                    upper: point.upper,
                    at_risk: curve.at_risk[i],
                    events: curve.events[i],
                })
                .with_context(|| {
                    format!("Failed to write CSV data for curve '{}'", series.label)
                })?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

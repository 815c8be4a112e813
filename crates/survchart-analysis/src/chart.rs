//! Chart model
//!
//! A [`ChartSpec`] holds everything needed to draw one chart: title, axes, and
//! one [`ChartSeries`] per rendered sub-group with its Kaplan-Meier curve,
//! confidence band, and median crosshair. It is plain data, built the same way
//! every time from the same rows, and serialises to JSON as chart metadata.

use serde::Serialize;
use survchart_stats::{
    confidence::{ConfidenceBand, Z_95},
    survival::{KaplanMeierCurve, LifeTableEntry},
};

use crate::{
    dataset::SubGroup,
    record::{LifeTableRow, ParseFieldError},
};

/// Sub-groups whose label contains this text are unknown categories and are not drawn.
pub const UNKNOWN_MARKER: &str = "Unk";

/// Survival level marked by the crosshair.
pub const MEDIAN_LEVEL: f64 = 0.5;

pub const X_AXIS_LABEL: &str = "Months";
pub const Y_AXIS_LABEL: &str = "Survival Probability";

#[must_use]
pub fn is_unknown_label(label: &str) -> bool {
    label.contains(UNKNOWN_MARKER)
}

/// Normalizes a sub-group label for the legend.
///
/// Underscores become hyphens, and binary labels (`0`/`1`, `FALSE`/`TRUE`)
/// become `False`/`True`.
#[must_use]
pub fn legend_label(label: &str) -> String {
    let label = label.replace('_', "-");
    match label.as_str() {
        "0" | "FALSE" => "False".to_owned(),
        "1" | "TRUE" => "True".to_owned(),
        _ => label,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid row {row_id:?}")]
pub struct InvalidRowError {
    pub row_id: String,
    pub source: ParseFieldError,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot build series {group:?} of chart {title:?}")]
pub struct ChartError {
    pub title: String,
    pub group: String,
    pub source: InvalidRowError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub label: String,
    pub min: f64,
    pub max: f64,
    /// Distance between ticks and gridlines; `None` lets the renderer choose.
    pub tick_step: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: u32,
    pub survival: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Where the dashed median lines meet the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Crosshair {
    pub time: u32,
    /// Survival probability of the curve point nearest to [`MEDIAN_LEVEL`].
    pub survival: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Legend label
    pub label: String,
    /// Sub-group label as found in the data
    pub group: String,
    pub points: Vec<SeriesPoint>,
    pub crosshair: Option<Crosshair>,
    #[serde(skip)]
    pub curve: KaplanMeierCurve,
}

impl ChartSeries {
    /// Computes the survival curve and confidence band of a sub-group.
    pub fn from_subgroup(group: &SubGroup) -> Result<Self, InvalidRowError> {
        let (entries, std_errors): (Vec<_>, Vec<_>) = group
            .rows
            .iter()
            .map(|row| {
                parse_row(row).map_err(|source| InvalidRowError {
                    row_id: row.id.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();

        let curve = KaplanMeierCurve::from_life_table(entries);
        let band = ConfidenceBand::log_scale(&curve.survival_prob, &std_errors, Z_95);

        let points = curve
            .times
            .iter()
            .zip(&curve.survival_prob)
            .zip(band.lower.iter().zip(&band.upper))
            .map(|((&time, &survival), (&lower, &upper))| SeriesPoint {
                time,
                survival,
                lower,
                upper,
            })
            .collect();
        let crosshair = curve.median_crossing().map(|crossing| Crosshair {
            time: crossing.time,
            survival: crossing.survival,
        });

        Ok(Self {
            label: legend_label(&group.label),
            group: group.label.clone(),
            points,
            crosshair,
            curve,
        })
    }

    /// Largest time point of the series.
    #[must_use]
    pub fn max_time(&self) -> Option<u32> {
        self.curve.times.iter().copied().max()
    }
}

fn parse_row(row: &LifeTableRow) -> Result<(LifeTableEntry, f64), ParseFieldError> {
    Ok((row.to_entry()?, row.std_error()?))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<ChartSeries>,
    /// Labels of sub-groups left out as unknown categories.
    pub skipped: Vec<String>,
}

impl ChartSpec {
    /// Builds the chart of one title.
    ///
    /// Sub-groups labelled as unknown are skipped. The time axis starts at zero
    /// and ends at the largest time point of the drawn series; the survival axis
    /// is fixed to `[0, 1]` with a tick every 0.1.
    pub fn from_group(title: &str, groups: &[SubGroup]) -> Result<Self, ChartError> {
        let mut series = vec![];
        let mut skipped = vec![];

        for group in groups {
            if is_unknown_label(&group.label) {
                tracing::debug!(title, group = %group.label, "skipping unknown category");
                skipped.push(group.label.clone());
                continue;
            }
            let s = ChartSeries::from_subgroup(group).map_err(|source| ChartError {
                title: title.to_owned(),
                group: group.label.clone(),
                source,
            })?;
            series.push(s);
        }

        let x_max = series
            .iter()
            .filter_map(ChartSeries::max_time)
            .max()
            .unwrap_or(0)
            .max(1);

        Ok(Self {
            title: title.to_owned(),
            x_axis: AxisSpec {
                label: X_AXIS_LABEL.to_owned(),
                min: 0.0,
                max: f64::from(x_max),
                tick_step: None,
            },
            y_axis: AxisSpec {
                label: Y_AXIS_LABEL.to_owned(),
                min: 0.0,
                max: 1.0,
                tick_step: Some(0.1),
            },
            series,
            skipped,
        })
    }

    /// Legend labels in drawing order.
    pub fn legend_labels(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::{GroupedDataset, tests::HEADER},
        record::{NumericField, tests::row},
        strata::StrataSplit,
    };

    fn subgroup(label: &str, rows: Vec<LifeTableRow>) -> SubGroup {
        SubGroup {
            label: label.to_owned(),
            rows,
        }
    }

    fn example_dataset() -> GroupedDataset {
        // Each sex follows survival 1.0, 0.9, 0.75
        let mut data = HEADER.to_owned();
        for (i, sex) in ["Male", "Female", "Unknown"].into_iter().enumerate() {
            for (time, events, at_risk, se) in
                [(0, 0, 100, "0"), (6, 10, 100, "0.03"), (12, 15, 90, "0.045")]
            {
                data.push_str(&format!(
                    "{i}-{time},\"eth_european=1, snz_sex_gender_code={sex}\",Stage1,{time},{events},100,{at_risk},{se}\n"
                ));
            }
        }
        GroupedDataset::from_reader(data.as_bytes(), StrataSplit::Leading).unwrap()
    }

    #[test]
    fn test_legend_label() {
        assert_eq!(legend_label("0"), "False");
        assert_eq!(legend_label("FALSE"), "False");
        assert_eq!(legend_label("1"), "True");
        assert_eq!(legend_label("TRUE"), "True");
        assert_eq!(legend_label("Level_1_3"), "Level-1-3");
        assert_eq!(legend_label("1 & Male"), "1 & Male");
        assert_eq!(legend_label("true"), "true");
    }

    #[test]
    fn test_is_unknown_label() {
        assert!(is_unknown_label("Unknown"));
        assert!(is_unknown_label("1 & Unk"));
        assert!(!is_unknown_label("unknown"));
        assert!(!is_unknown_label("Male"));
    }

    #[test]
    fn test_example_chart() {
        let dataset = example_dataset();
        assert_eq!(dataset.len(), 1);

        let charts = dataset.charts().collect::<Result<Vec<_>, _>>().unwrap();
        let chart = &charts[0];
        assert_eq!(chart.title, "Stage1 - European");
        assert_eq!(chart.legend_labels().collect::<Vec<_>>(), ["Male", "Female"]);
        assert_eq!(chart.skipped, ["Unknown"]);

        for series in &chart.series {
            let survival = series.points.iter().map(|p| p.survival).collect::<Vec<_>>();
            for (actual, expected) in survival.iter().zip([1.0, 0.9, 0.75]) {
                assert!((actual - expected).abs() < 1e-12);
            }
            for pair in survival.windows(2) {
                assert!(pair[1] <= pair[0]);
            }
            for p in &series.points {
                assert!(p.lower <= p.survival && p.survival <= p.upper);
            }
            let crosshair = series.crosshair.unwrap();
            assert_eq!(crosshair.time, 12);
        }

        assert_eq!(chart.x_axis.min, 0.0);
        assert_eq!(chart.x_axis.max, 12.0);
        assert_eq!(chart.y_axis.min, 0.0);
        assert_eq!(chart.y_axis.max, 1.0);
        assert_eq!(chart.y_axis.tick_step, Some(0.1));
        assert_eq!(chart.x_axis.label, "Months");
        assert_eq!(chart.y_axis.label, "Survival Probability");
    }

    #[test]
    fn test_metadata_is_reproducible() {
        let first = example_dataset()
            .charts()
            .map(|c| serde_json::to_string(&c.unwrap()).unwrap())
            .collect::<Vec<_>>();
        let second = example_dataset()
            .charts()
            .map(|c| serde_json::to_string(&c.unwrap()).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(first, second);
        assert!(first[0].contains("\"label\":\"Female\""));
        assert!(!first[0].contains("\"curve\""));
    }

    #[test]
    fn test_sentinel_and_zero_at_risk() {
        let group = subgroup(
            "1",
            vec![
                row("rural_ind=1", "Stage1", ["S", "S", "50", "50", "S"]),
                row("rural_ind=1", "Stage1", ["3", "25", "50", "50", "0.1"]),
                row("rural_ind=1", "Stage1", ["6", "4", "50", "S", "0.1"]),
            ],
        );
        let series = ChartSeries::from_subgroup(&group).unwrap();
        assert_eq!(series.label, "True");
        assert_eq!(series.group, "1");
        let survival = series.points.iter().map(|p| p.survival).collect::<Vec<_>>();
        assert_eq!(survival, [1.0, 0.5, 0.5]);
        assert_eq!(series.points[0].time, 0);
        // Ties between the two 0.5 points resolve to the first
        assert_eq!(series.crosshair.unwrap().time, 3);
    }

    #[test]
    fn test_all_unknown_groups() {
        let groups = [subgroup(
            "Unk",
            vec![row("rural_ind=Unk", "Stage1", ["24", "1", "2", "2", "0"])],
        )];
        let chart = ChartSpec::from_group("Stage1 - Rural", &groups).unwrap();
        assert!(chart.series.is_empty());
        assert_eq!(chart.x_axis.max, 1.0);
    }

    #[test]
    fn test_invalid_row_reports_group() {
        let mut bad = row("rural_ind=0", "Stage1", ["1", "2", "3", "4", "0"]);
        bad.at_risk = "many".to_owned();
        let groups = [subgroup("0", vec![bad])];

        let err = ChartSpec::from_group("Stage1 - Rural", &groups).unwrap_err();
        assert_eq!(err.title, "Stage1 - Rural");
        assert_eq!(err.group, "0");
        assert_eq!(err.source.row_id, "Stage1:rural_ind=0:1");
        assert_eq!(err.source.source.field, NumericField::AtRisk);
    }
}

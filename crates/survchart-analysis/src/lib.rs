//! Grouping and chart modelling for Kaplan-Meier life-table reports
//!
//! This crate turns rows of a survival-analysis export into chart models, one
//! per analysis title, ready to be drawn by the survchart binary.
//!
//! # Overview
//!
//! 1. **Load Rows** ([`record::LifeTableRow`]): Read CSV records, keeping fields as raw text
//! 2. **Parse Strata** ([`strata::Strata`]): Map raw strata fields to readable names
//! 3. **Group** ([`dataset::GroupedDataset`]): Group rows by chart title, then by curve label
//! 4. **Model Charts** ([`chart::ChartSpec`]): Compute Kaplan-Meier curves, confidence bands
//!    and median crosshairs for every curve of a chart
//!
//! # Examples
//!
//! ```
//! use survchart_analysis::{dataset::GroupedDataset, strata::StrataSplit};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let data = "\
//! id,strata,metric,time,events,population,at_risk,std_error
//! 1,eth_maori=1,Stage1,0,0,40,40,0
//! 2,eth_maori=1,Stage1,6,20,40,40,0.05
//! 3,eth_maori=0,Stage1,0,0,60,60,0
//! 4,eth_maori=0,Stage1,6,15,60,60,0.04
//! ";
//! let dataset = GroupedDataset::from_reader(data.as_bytes(), StrataSplit::Joined)?;
//!
//! for chart in dataset.charts() {
//!     let chart = chart?;
//!     assert_eq!(chart.title, "Stage1 - Maori");
//!     assert_eq!(chart.legend_labels().collect::<Vec<_>>(), ["True", "False"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod dataset;
pub mod record;
pub mod strata;

//! Survival statistics for the survchart project.
//!
//! This crate provides the estimators behind every survchart chart:
//!
//! - **Kaplan-Meier estimation**: survival curves computed from pre-aggregated life-table rows
//! - **Median crossing**: the curve point nearest to 50% survival, plus interpolated median time
//! - **Confidence bands**: log-scale pointwise bands from per-row standard errors
//!
//! # Modules
//!
//! - [`survival`]: Kaplan-Meier curves over life tables
//! - [`confidence`]: Log-scale confidence bands
//!
//! # Examples
//!
//! ## Building a curve and its band
//!
//! ```
//! use survchart_stats::{
//!     confidence::{ConfidenceBand, Z_95},
//!     survival::{KaplanMeierCurve, LifeTableEntry},
//! };
//!
//! let rows = [
//!     LifeTableEntry { time: 0, events: 0.0, at_risk: 200.0 },
//!     LifeTableEntry { time: 6, events: 50.0, at_risk: 200.0 },
//!     LifeTableEntry { time: 12, events: 50.0, at_risk: 150.0 },
//! ];
//! let std_errors = [0.0, 0.03, 0.04];
//!
//! let curve = KaplanMeierCurve::from_life_table(rows);
//! let band = ConfidenceBand::log_scale(&curve.survival_prob, &std_errors, Z_95);
//!
//! assert_eq!(curve.median_crossing().unwrap().time, 12);
//! assert_eq!(band.len(), curve.len());
//! ```

pub mod confidence;
pub mod survival;

/// Multiplier applied to the standard error for the approximate 95% band.
pub const Z_95: f64 = 1.962;

/// Pointwise confidence band around a survival curve.
///
/// The band is built on the log scale: `exp(ln S ± z · se)`, evaluated as
/// `S · exp(±z · se)`. This keeps the lower bound non-negative. The upper bound is
/// not clipped and may exceed 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBand {
    /// Lower bound at each time point.
    pub lower: Vec<f64>,
    /// Upper bound at each time point.
    pub upper: Vec<f64>,
}

impl ConfidenceBand {
    /// Computes a log-scale confidence band.
    ///
    /// `survival_prob` and `std_errors` are parallel slices; extra elements in the
    /// longer one are ignored. A survival probability of zero yields a `[0, 0]`
    /// band regardless of the standard error, and a zero standard error yields
    /// `[s, s]`. `lower <= s <= upper` holds whenever the standard error is
    /// non-negative.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survchart_stats::confidence::{ConfidenceBand, Z_95};
    /// let band = ConfidenceBand::log_scale(&[1.0, 0.5, 0.0], &[0.0, 0.1, 0.2], Z_95);
    /// assert_eq!(band.lower[0], 1.0);
    /// assert!(band.lower[1] < 0.5 && 0.5 < band.upper[1]);
    /// assert_eq!((band.lower[2], band.upper[2]), (0.0, 0.0));
    /// ```
    #[must_use]
    pub fn log_scale(survival_prob: &[f64], std_errors: &[f64], z: f64) -> Self {
        let (lower, upper) = survival_prob
            .iter()
            .zip(std_errors)
            .map(|(&s, &se)| {
                let margin = se * z;
                (s * (-margin).exp(), s * margin.exp())
            })
            .unzip();
        Self { lower, upper }
    }

    /// Returns the number of points in the band.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Returns `true` if the band has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

/// One row of a life table.
///
/// A life table is already aggregated: every row says how many subjects were at
/// risk at a time point and how many of them experienced the event there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeTableEntry {
    /// Time point (months in the survchart input).
    pub time: u32,
    /// Number of events observed at this time point.
    pub events: f64,
    /// Number of subjects at risk at this time point.
    pub at_risk: f64,
}

/// Kaplan-Meier survival curve for survival analysis.
///
/// The Kaplan-Meier estimator is a non-parametric statistic used to estimate the survival
/// function from lifetime data. Here it is evaluated over a pre-aggregated life table, so
/// the curve has exactly one point per life-table row, in the order the rows were given.
///
/// # Fields
///
/// The curve stores parallel vectors representing the survival function at discrete time points:
/// - Time points of the life table
/// - Survival probability at each time point
/// - Number of subjects at risk at each time point
/// - Number of events at each time point
#[derive(Debug, Clone, PartialEq)]
pub struct KaplanMeierCurve {
    /// Time points of the life-table rows.
    pub times: Vec<u32>,
    /// Survival probability at each corresponding time point.
    /// Values range from 0.0 (no survival) to 1.0 (complete survival).
    pub survival_prob: Vec<f64>,
    /// Number of subjects at risk at each time point.
    pub at_risk: Vec<f64>,
    /// Number of events that occurred at each time point.
    pub events: Vec<f64>,
}

/// The curve point closest to 50% survival.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianCrossing {
    /// Index of the point in the curve.
    pub index: usize,
    /// Time of the point.
    pub time: u32,
    /// Survival probability of the point.
    pub survival: f64,
}

impl KaplanMeierCurve {
    /// Computes the Kaplan-Meier survival curve from life-table rows.
    ///
    /// The survival probability is the cumulative product of `1 - events / at_risk`
    /// over the rows in iteration order. A row with nobody at risk contributes no
    /// decrement. Each per-row factor is clamped to `[0, 1]`, so the curve is
    /// non-increasing and bounded even when a row reports more events than subjects
    /// at risk.
    ///
    /// Values are expected to be finite.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survchart_stats::survival::{KaplanMeierCurve, LifeTableEntry};
    /// let rows = [
    ///     LifeTableEntry { time: 0, events: 0.0, at_risk: 100.0 },
    ///     LifeTableEntry { time: 1, events: 10.0, at_risk: 100.0 },
    ///     LifeTableEntry { time: 2, events: 0.0, at_risk: 0.0 },
    /// ];
    /// let curve = KaplanMeierCurve::from_life_table(rows);
    /// assert_eq!(curve.survival_prob, vec![1.0, 0.9, 0.9]);
    /// ```
    #[must_use]
    pub fn from_life_table<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = LifeTableEntry>,
    {
        let entries = entries.into_iter();
        let (capacity, _) = entries.size_hint();

        let mut times = Vec::with_capacity(capacity);
        let mut survival_prob = Vec::with_capacity(capacity);
        let mut at_risk = Vec::with_capacity(capacity);
        let mut events = Vec::with_capacity(capacity);

        let mut current_survival = 1.0;
        for entry in entries {
            let survival_rate = if entry.at_risk == 0.0 {
                1.0
            } else {
                (1.0 - entry.events / entry.at_risk).clamp(0.0, 1.0)
            };
            current_survival *= survival_rate;

            times.push(entry.time);
            survival_prob.push(current_survival);
            at_risk.push(entry.at_risk);
            events.push(entry.events);
        }

        Self {
            times,
            survival_prob,
            at_risk,
            events,
        }
    }

    /// Returns the number of points in the curve.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` if the curve has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the point whose survival probability is nearest to 0.5.
    ///
    /// When several points are equally close, the first one wins. Returns `None`
    /// for an empty curve.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survchart_stats::survival::{KaplanMeierCurve, LifeTableEntry};
    /// let rows = [
    ///     LifeTableEntry { time: 3, events: 4.0, at_risk: 10.0 },
    ///     LifeTableEntry { time: 6, events: 3.0, at_risk: 6.0 },
    /// ];
    /// let curve = KaplanMeierCurve::from_life_table(rows);
    /// let crossing = curve.median_crossing().unwrap();
    /// assert_eq!(crossing.time, 3);
    /// ```
    #[must_use]
    pub fn median_crossing(&self) -> Option<MedianCrossing> {
        let (index, &survival) = self
            .survival_prob
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - 0.5).abs().total_cmp(&(*b - 0.5).abs()))?;
        Some(MedianCrossing {
            index,
            time: self.times[index],
            survival,
        })
    }

    /// Returns the median survival time.
    ///
    /// The median survival time is the time at which the survival probability
    /// drops to or below 50%. If the survival probability never reaches 50%,
    /// this method returns `None`.
    ///
    /// Linear interpolation is used between time points for more accurate estimates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survchart_stats::survival::{KaplanMeierCurve, LifeTableEntry};
    /// let rows = [
    ///     LifeTableEntry { time: 10, events: 2.0, at_risk: 10.0 },
    ///     LifeTableEntry { time: 20, events: 4.0, at_risk: 8.0 },
    /// ];
    /// let curve = KaplanMeierCurve::from_life_table(rows);
    /// // 0.8 at t=10, 0.4 at t=20: 0.5 is reached three quarters of the way.
    /// let median = curve.median_survival().unwrap();
    /// assert!((median - 17.5).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        let i = self.survival_prob.iter().position(|&s| s <= 0.5)?;
        if i == 0 {
            return Some(f64::from(self.times[0]));
        }

        let t0 = f64::from(self.times[i - 1]);
        let t1 = f64::from(self.times[i]);
        let s0 = self.survival_prob[i - 1];
        let s1 = self.survival_prob[i];
        if (s0 - s1).abs() < f64::EPSILON {
            return Some(t1);
        }
        Some(t0 + (0.5 - s0) / (s1 - s0) * (t1 - t0))
    }

    /// Returns the survival probability at the last point, or `1.0` for an empty curve.
    #[must_use]
    pub fn final_survival(&self) -> f64 {
        self.survival_prob.last().copied().unwrap_or(1.0)
    }
}

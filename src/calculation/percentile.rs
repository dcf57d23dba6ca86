//! Percentile estimation against a quartile benchmark.
//!
//! The benchmark's quartile points define a piecewise-linear curve from
//! percentile to value. Values outside the published points are extrapolated
//! with the slope of the nearest sloped segment, so estimates may fall below
//! 0 or above 100 to signal an out-of-range observation.

use crate::models::Benchmark;

/// A piecewise-linear percentile curve built from a benchmark's control points.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::QuartileCurve;
/// use comp_engine::models::Benchmark;
///
/// let benchmark = Benchmark {
///     id: "b".to_string(),
///     specialty: "Cardiology".to_string(),
///     coverage_type: "Home call".to_string(),
///     source: "Survey".to_string(),
///     survey_year: None,
///     p25: Some(800.0),
///     p50: 1000.0,
///     p75: Some(1300.0),
///     p90: Some(1700.0),
/// };
/// let curve = QuartileCurve::from_benchmark(&benchmark);
/// assert_eq!(curve.percentile_of(900.0), 37.5);
/// assert_eq!(curve.value_at(37.5), 900.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuartileCurve {
    /// `(percentile, value)` pairs in ascending percentile order; never empty.
    points: Vec<(f64, f64)>,
}

type Segment = ((f64, f64), (f64, f64));

impl QuartileCurve {
    /// Builds the curve from the benchmark's present quartile points.
    pub fn from_benchmark(benchmark: &Benchmark) -> Self {
        Self {
            points: benchmark.control_points(),
        }
    }

    fn first(&self) -> (f64, f64) {
        self.points[0]
    }

    fn last(&self) -> (f64, f64) {
        self.points[self.points.len() - 1]
    }

    /// Adjacent point pairs whose values actually rise.
    fn sloped_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .filter(|(lo, hi)| hi.1 > lo.1)
    }

    /// True when every control point carries the same value.
    pub fn is_flat(&self) -> bool {
        self.sloped_segments().next().is_none()
    }

    /// Estimates the percentile at which `value` falls.
    ///
    /// A flat curve has no slope to extrapolate with: a value equal to the
    /// benchmark maps to 50, anything below to 0, anything above to 100.
    pub fn percentile_of(&self, value: f64) -> f64 {
        let first = self.first();
        let last = self.last();

        let (Some(low), Some(high)) = (
            self.sloped_segments().next(),
            self.sloped_segments().last(),
        ) else {
            return if value < first.1 {
                0.0
            } else if value > first.1 {
                100.0
            } else {
                50.0
            };
        };

        if value < first.1 {
            return first.0 + (value - first.1) * percentile_per_value(low);
        }
        if value > last.1 {
            return last.0 + (value - last.1) * percentile_per_value(high);
        }

        self.sloped_segments()
            .find(|(lo, hi)| lo.1 <= value && value <= hi.1)
            .map(|segment| {
                let (lo, _) = segment;
                lo.0 + (value - lo.1) * percentile_per_value(segment)
            })
            .unwrap_or(50.0)
    }

    /// Returns the value at `percentile`; the inverse of [`Self::percentile_of`].
    pub fn value_at(&self, percentile: f64) -> f64 {
        let first = self.first();
        let last = self.last();

        let (Some(low), Some(high)) = (
            self.sloped_segments().next(),
            self.sloped_segments().last(),
        ) else {
            return first.1;
        };

        if percentile < first.0 {
            return first.1 + (percentile - first.0) / percentile_per_value(low);
        }
        if percentile > last.0 {
            return last.1 + (percentile - last.0) / percentile_per_value(high);
        }

        self.points
            .windows(2)
            .find(|pair| pair[0].0 <= percentile && percentile <= pair[1].0)
            .map(|pair| {
                let (lo, hi) = (pair[0], pair[1]);
                lo.1 + (percentile - lo.0) * (hi.1 - lo.1) / (hi.0 - lo.0)
            })
            .unwrap_or(first.1)
    }
}

fn percentile_per_value((lo, hi): Segment) -> f64 {
    (hi.0 - lo.0) / (hi.1 - lo.1)
}

/// Estimates where `value` falls on the benchmark's percentile curve.
pub fn estimate_percentile(value: f64, benchmark: &Benchmark) -> f64 {
    QuartileCurve::from_benchmark(benchmark).percentile_of(value)
}

/// Returns the benchmark value at `percentile`; the inverse of [`estimate_percentile`].
pub fn value_at_percentile(percentile: f64, benchmark: &Benchmark) -> f64 {
    QuartileCurve::from_benchmark(benchmark).value_at(percentile)
}

//! Trendline fitting through same-kind pivots
//!
//! Every unordered pivot pair defines a candidate line
//! `price = slope * index + intercept`. Pivots within `tolerance` (vertical
//! distance) of the line are its inliers; a candidate needs `min_touches`
//! inliers. Candidates are ranked by touches then index span, near-duplicates
//! are collapsed onto the better-ranked line, and the best `max_lines` are kept.
//!
//! Pair enumeration is O(n²) with an O(n) inlier pass per pair; pivot sets are
//! tens of points, not thousands.

use std::collections::HashMap;

use super::{
    helpers::{round_price, DUPLICATE_INTERCEPT_EPS, DUPLICATE_SLOPE_EPS, SAME_INDEX_NUDGE},
    pivots::PivotPoint,
};
use crate::{
    params::{check_price, get_count, get_price, ParamMeta, ParameterizedStage},
    Result, StageConfig, StructureError,
};

impl_with_defaults!(TrendlineFitter);

/// Fitted line with its inlier pivots
#[derive(Debug, Clone, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub touch_count: usize,
    /// `[min, max]` series index over the inliers
    pub index_range: [usize; 2],
    /// Series indices of the inlier pivots, ascending
    pub inliers: Vec<usize>,
}

impl TrendLine {
    /// Line price at a (fractional) series index
    #[inline]
    pub fn value_at(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }

    /// Index distance covered by the inliers
    #[inline]
    pub fn span(&self) -> usize {
        self.index_range[1] - self.index_range[0]
    }

    #[inline]
    pub fn distance_to(&self, pivot: &PivotPoint) -> f64 {
        (self.value_at(pivot.index as f64) - pivot.price).abs()
    }

    fn is_duplicate_of(&self, other: &TrendLine) -> bool {
        (self.slope - other.slope).abs() < DUPLICATE_SLOPE_EPS
            && (self.intercept - other.intercept).abs() < DUPLICATE_INTERCEPT_EPS
    }
}

#[derive(serde::Serialize)]
struct TrendLineWire {
    a: f64,
    b: f64,
    touches: usize,
    x_min: usize,
    x_max: usize,
    y_min: f64,
    y_max: f64,
}

/// `y_min`/`y_max` are the line values at `x_min`/`x_max`
impl serde::Serialize for TrendLine {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let [x_min, x_max] = self.index_range;
        TrendLineWire {
            a: self.slope,
            b: self.intercept,
            touches: self.touch_count,
            x_min,
            x_max,
            y_min: round_price(self.value_at(x_min as f64)),
            y_max: round_price(self.value_at(x_max as f64)),
        }
        .serialize(s)
    }
}

/// Slope/intercept of the line through two pivots.
///
/// Pivots sharing an index get their index distance nudged by
/// [`SAME_INDEX_NUDGE`].
pub fn line_through(a: &PivotPoint, b: &PivotPoint) -> (f64, f64) {
    let mut dx = b.index as f64 - a.index as f64;
    if dx == 0.0 {
        dx = SAME_INDEX_NUDGE;
    }
    let slope = (b.price - a.price) / dx;
    let intercept = a.price - slope * a.index as f64;
    (slope, intercept)
}

/// Fit trendlines through `pivots`.
pub fn detect_trendlines(
    pivots: &[PivotPoint],
    tolerance: f64,
    min_touches: usize,
    max_lines: usize,
) -> Vec<TrendLine> {
    if pivots.len() < 2 || max_lines == 0 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for (i, a) in pivots.iter().enumerate() {
        for b in &pivots[i + 1..] {
            let (slope, intercept) = line_through(a, b);
            let mut inliers: Vec<usize> = pivots
                .iter()
                .filter(|p| (slope * p.index as f64 + intercept - p.price).abs() <= tolerance)
                .map(|p| p.index)
                .collect();
            if inliers.is_empty() || inliers.len() < min_touches {
                continue;
            }
            inliers.sort_unstable();
            candidates.push(TrendLine {
                slope,
                intercept,
                touch_count: inliers.len(),
                index_range: [inliers[0], inliers[inliers.len() - 1]],
                inliers,
            });
        }
    }

    // stable: equal rank keeps pair enumeration order
    candidates.sort_by(|a, b| {
        b.touch_count
            .cmp(&a.touch_count)
            .then_with(|| b.span().cmp(&a.span()))
    });

    let mut lines: Vec<TrendLine> = Vec::with_capacity(max_lines);
    for candidate in candidates {
        if lines.len() == max_lines {
            break;
        }
        if !lines.iter().any(|kept| candidate.is_duplicate_of(kept)) {
            lines.push(candidate);
        }
    }
    lines
}

// ============================================================
// STAGE
// ============================================================

/// Trendline fitter configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrendlineFitter {
    /// Maximum vertical distance (price units) for an inlier
    pub tolerance: f64,
    pub min_touches: usize,
    pub max_lines: usize,
}

impl Default for TrendlineFitter {
    fn default() -> Self {
        Self {
            tolerance: 1.5,
            min_touches: 3,
            max_lines: 3,
        }
    }
}

impl TrendlineFitter {
    pub fn fit(&self, pivots: &[PivotPoint]) -> Vec<TrendLine> {
        self.fit_with_tolerance(pivots, self.tolerance)
    }

    /// Fit with an overriding tolerance (timeframe presets)
    pub fn fit_with_tolerance(&self, pivots: &[PivotPoint], tolerance: f64) -> Vec<TrendLine> {
        detect_trendlines(pivots, tolerance, self.min_touches, self.max_lines)
    }
}

impl StageConfig for TrendlineFitter {
    fn stage_name(&self) -> &'static str {
        "trendlines"
    }

    fn validate_config(&self) -> Result<()> {
        check_price("trendlines.tolerance", self.tolerance)?;
        if self.min_touches < 2 {
            return Err(StructureError::InvalidConfig(
                "trendlines.min_touches must be >= 2".to_string(),
            ));
        }
        Ok(())
    }
}

static TRENDLINE_PARAMS: &[ParamMeta] = &[
    ParamMeta::price("tolerance", 1.5, (0.5, 4.0, 0.5), "Inlier distance in price units"),
    ParamMeta::count("min_touches", 3.0, (2.0, 5.0, 1.0), "Minimum inlier pivots"),
    ParamMeta::count("max_lines", 3.0, (1.0, 5.0, 1.0), "Lines kept per direction"),
];

impl ParameterizedStage for TrendlineFitter {
    fn param_meta() -> &'static [ParamMeta] {
        TRENDLINE_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let stage = Self {
            tolerance: get_price(params, "tolerance", 1.5)?,
            min_touches: get_count(params, "min_touches", 3)?,
            max_lines: get_count(params, "max_lines", 3)?,
        };
        stage.validate_config()?;
        Ok(stage)
    }
}

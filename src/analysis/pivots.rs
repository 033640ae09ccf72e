//! Swing pivot detection
//!
//! A bar at index `i` is a swing high when its high is strictly greater than
//! every other high in `[i - left, i + right]`; swing lows use the strict
//! minimum of lows. Equal extremes inside the window disqualify the bar.
//!
//! [`find_swings`] is the inclusive variant: a bar that ties the window
//! extreme still counts.

use std::collections::HashMap;

use crate::{
    params::{get_period, ParamMeta, ParameterizedStage},
    series::{Candle, CandleSeries},
    Period, Result, StageConfig,
};

impl_with_defaults!(PivotDetector);

/// Which extreme a pivot marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotKind {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PivotPoint {
    /// Position in the oldest-first series
    pub index: usize,
    pub timestamp: i64,
    pub price: f64,
    pub kind: PivotKind,
}

/// Swing highs and lows, each in ascending index order
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Pivots {
    pub highs: Vec<PivotPoint>,
    pub lows: Vec<PivotPoint>,
}

impl Pivots {
    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }

    pub fn high_prices(&self) -> Vec<f64> {
        self.highs.iter().map(|p| p.price).collect()
    }

    pub fn low_prices(&self) -> Vec<f64> {
        self.lows.iter().map(|p| p.price).collect()
    }

    pub fn last_high(&self) -> Option<&PivotPoint> {
        self.highs.last()
    }

    pub fn last_low(&self) -> Option<&PivotPoint> {
        self.lows.last()
    }
}

/// Find swing pivots with `left`/`right` bars on each side.
///
/// Returns empty lists when the series holds `left + right` bars or fewer, or
/// when either window is zero.
pub fn find_pivots(series: &CandleSeries, left: usize, right: usize) -> Pivots {
    if left == 0 || right == 0 {
        return Pivots::default();
    }
    scan_window(series, left, right, |a, b| a > b, |a, b| a < b)
}

/// Bars whose high equals the window maximum (or whose low equals the window
/// minimum) over `[i - left, i + right]`.
///
/// Bars closer than the window to either edge never qualify.
pub fn find_swings(series: &CandleSeries, left: usize, right: usize) -> Pivots {
    scan_window(series, left, right, |a, b| a >= b, |a, b| a <= b)
}

fn scan_window(
    series: &CandleSeries,
    left: usize,
    right: usize,
    high_beats: impl Fn(f64, f64) -> bool,
    low_beats: impl Fn(f64, f64) -> bool,
) -> Pivots {
    let candles = series.candles();
    let len = candles.len();
    if len <= left + right {
        return Pivots::default();
    }

    let mut pivots = Pivots::default();
    for i in left..len - right {
        let window = &candles[i - left..=i + right];
        let bar = &candles[i];

        if is_window_extreme(window, left, |c| c.high, &high_beats) {
            pivots.highs.push(PivotPoint {
                index: i,
                timestamp: bar.timestamp,
                price: bar.high,
                kind: PivotKind::High,
            });
        }
        if is_window_extreme(window, left, |c| c.low, &low_beats) {
            pivots.lows.push(PivotPoint {
                index: i,
                timestamp: bar.timestamp,
                price: bar.low,
                kind: PivotKind::Low,
            });
        }
    }

    tracing::trace!(
        bars = len,
        left,
        right,
        highs = pivots.highs.len(),
        lows = pivots.lows.len(),
        "Pivots detected"
    );
    pivots
}

/// `window[pos]` beats every other bar of the window under `beats`
#[inline]
fn is_window_extreme(
    window: &[Candle],
    pos: usize,
    value: impl Fn(&Candle) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> bool {
    let candidate = value(&window[pos]);
    window
        .iter()
        .enumerate()
        .all(|(j, bar)| j == pos || beats(candidate, value(bar)))
}

// ============================================================
// STAGE
// ============================================================

/// Windowed swing detector
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PivotDetector {
    pub left: Period,
    pub right: Period,
}

impl Default for PivotDetector {
    fn default() -> Self {
        Self {
            left: Period::new_const(3),
            right: Period::new_const(3),
        }
    }
}

impl PivotDetector {
    pub fn detect(&self, series: &CandleSeries) -> Pivots {
        find_pivots(series, self.left.get(), self.right.get())
    }

    /// Bars needed before any pivot can appear
    pub fn min_bars(&self) -> usize {
        self.left.get() + self.right.get() + 1
    }
}

impl StageConfig for PivotDetector {
    fn stage_name(&self) -> &'static str {
        "pivots"
    }
}

static PIVOT_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("left", 3.0, (1.0, 10.0, 1.0), "Bars compared on the left"),
    ParamMeta::period("right", 3.0, (1.0, 10.0, 1.0), "Bars compared on the right"),
];

impl ParameterizedStage for PivotDetector {
    fn param_meta() -> &'static [ParamMeta] {
        PIVOT_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            left: get_period(params, "left", 3)?,
            right: get_period(params, "right", 3)?,
        })
    }
}

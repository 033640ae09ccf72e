//! Breakout / retest signal engine
//!
//! Stateless three-state classifier. Each call inspects the two most recent
//! lower-timeframe candles against a [`BreakoutBox`]:
//!
//! - `WAIT`: no boundary crossed
//! - `BREAKOUT`: a boundary was crossed but price is still far from it
//! - `ENTRY_READY`: a boundary was crossed and price sits within the retest
//!   tolerance of it
//!
//! Stops and targets are fixed point distances from the boundary and the
//! entry. All output prices are rounded to 2 decimals.

use std::collections::HashMap;

use super::{helpers::round_price, levels::Level};
use crate::{
    params::{check_price, get_price, get_ratio, ParamMeta, ParameterizedStage},
    result::LevelSet,
    series::{Candle, CandleSeries},
    Ratio, Result, StageConfig, StructureError,
};

impl_with_defaults!(BreakoutSignalEngine);

// ============================================================
// TYPES
// ============================================================

/// Breakout threshold range
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BreakoutBox {
    pub upper: f64,
    pub lower: f64,
    /// Higher-timeframe candle the box was taken from, if any
    pub reference_candle: Option<Candle>,
}

impl BreakoutBox {
    /// High/low of a (closed) higher-timeframe candle
    pub fn from_candle(candle: &Candle) -> Self {
        Self {
            upper: candle.high,
            lower: candle.low,
            reference_candle: Some(*candle),
        }
    }

    /// Nearest resistance at or above `reference_price` and nearest support at
    /// or below it. `None` unless both sides exist.
    pub fn from_levels(levels: &LevelSet, reference_price: f64) -> Option<Self> {
        let upper = nearest(&levels.resistance, |p| p >= reference_price, |a, b| a.min(b))?;
        let lower = nearest(&levels.support, |p| p <= reference_price, |a, b| a.max(b))?;
        Some(Self {
            upper,
            lower,
            reference_candle: None,
        })
    }

    pub fn height(&self) -> f64 {
        self.upper - self.lower
    }
}

fn nearest(levels: &[Level], keep: impl Fn(f64) -> bool, pick: impl Fn(f64, f64) -> f64) -> Option<f64> {
    levels
        .iter()
        .map(|l| l.price)
        .filter(|&p| keep(p))
        .reduce(pick)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// +1 for long, -1 for short
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStatus {
    Wait,
    Breakout,
    EntryReady,
}

/// Prices attached to a breakout
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TradePlan {
    pub side: Side,
    /// Crossed box boundary
    pub boundary: f64,
    pub entry: f64,
    /// Midpoint between boundary and last close
    pub entry_retest: f64,
    pub stop: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub last_close: f64,
}

/// Classifier output; only breakout states carry prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Wait,
    Breakout(TradePlan),
    EntryReady(TradePlan),
}

impl Signal {
    pub fn status(&self) -> SignalStatus {
        match self {
            Signal::Wait => SignalStatus::Wait,
            Signal::Breakout(_) => SignalStatus::Breakout,
            Signal::EntryReady(_) => SignalStatus::EntryReady,
        }
    }

    pub fn plan(&self) -> Option<&TradePlan> {
        match self {
            Signal::Wait => None,
            Signal::Breakout(plan) | Signal::EntryReady(plan) => Some(plan),
        }
    }

    pub fn side(&self) -> Option<Side> {
        self.plan().map(|p| p.side)
    }
}

#[derive(serde::Serialize)]
struct SignalWire {
    status: SignalStatus,
    side: Option<Side>,
    entry: Option<f64>,
    entry_50: Option<f64>,
    sl: Option<f64>,
    tp1: Option<f64>,
    tp2: Option<f64>,
    last_close: Option<f64>,
}

impl serde::Serialize for Signal {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let plan = self.plan();
        SignalWire {
            status: self.status(),
            side: self.side(),
            entry: plan.map(|p| p.entry),
            entry_50: plan.map(|p| p.entry_retest),
            sl: plan.map(|p| p.stop),
            tp1: plan.map(|p| p.tp1),
            tp2: plan.map(|p| p.tp2),
            last_close: plan.map(|p| p.last_close),
        }
        .serialize(s)
    }
}

// ============================================================
// STRATEGY VARIANTS
// ============================================================

/// What counts as crossing a boundary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakConfirmation {
    /// `prev.close <= upper < last.close` (mirrored for the lower side)
    #[default]
    Close,
    /// Close-cross, or the last wick beyond the boundary
    CloseOrWick,
}

/// Which price becomes the entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryConvention {
    /// The crossed boundary
    #[default]
    Boundary,
    /// The last close
    LastClose,
}

// ============================================================
// ENGINE
// ============================================================

/// Breakout engine configuration. Distances are in points; one point is
/// `point_size` price units.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BreakoutSignalEngine {
    pub point_size: f64,
    pub sl_points: f64,
    pub tp1_points: f64,
    pub tp2_points: f64,
    /// Floor of the retest tolerance
    pub retest_min_points: f64,
    /// Fraction of the last close-to-close move added to the retest tolerance
    pub retest_ratio: Ratio,
    pub confirmation: BreakConfirmation,
    pub entry: EntryConvention,
}

impl Default for BreakoutSignalEngine {
    fn default() -> Self {
        Self {
            point_size: 0.01,
            sl_points: 250.0,
            tp1_points: 250.0,
            tp2_points: 500.0,
            retest_min_points: 100.0,
            retest_ratio: Ratio::new_const(0.5),
            confirmation: BreakConfirmation::Close,
            entry: EntryConvention::Boundary,
        }
    }
}

impl BreakoutSignalEngine {
    /// Classify the latest two candles of `recent` against `bx`.
    ///
    /// Fewer than two candles is a `WAIT`.
    pub fn analyze(&self, bx: &BreakoutBox, recent: &CandleSeries) -> Signal {
        match recent.last_two() {
            Some((prev, last)) => self.classify(bx, prev, last),
            None => Signal::Wait,
        }
    }

    /// Classify an explicit `(prev, last)` pair
    pub fn classify(&self, bx: &BreakoutBox, prev: &Candle, last: &Candle) -> Signal {
        let Some(side) = self.break_side(bx, prev, last) else {
            return Signal::Wait;
        };

        let boundary = match side {
            Side::Long => bx.upper,
            Side::Short => bx.lower,
        };
        let entry = match self.entry {
            EntryConvention::Boundary => boundary,
            EntryConvention::LastClose => last.close,
        };
        let dir = side.sign();
        let plan = TradePlan {
            side,
            boundary: round_price(boundary),
            entry: round_price(entry),
            entry_retest: round_price((boundary + last.close) / 2.0),
            stop: round_price(boundary - dir * self.points(self.sl_points)),
            tp1: round_price(entry + dir * self.points(self.tp1_points)),
            tp2: round_price(entry + dir * self.points(self.tp2_points)),
            last_close: round_price(last.close),
        };

        if (last.close - boundary).abs() <= self.retest_tolerance(prev, last) {
            Signal::EntryReady(plan)
        } else {
            Signal::Breakout(plan)
        }
    }

    /// `max(retest_min_points, retest_ratio * |last.close - prev.close|)` in price units
    pub fn retest_tolerance(&self, prev: &Candle, last: &Candle) -> f64 {
        let body_range = (last.close - prev.close).abs();
        self.points(self.retest_min_points)
            .max(self.retest_ratio.get() * body_range)
    }

    /// Upward crossing is checked first
    fn break_side(&self, bx: &BreakoutBox, prev: &Candle, last: &Candle) -> Option<Side> {
        let wick = self.confirmation == BreakConfirmation::CloseOrWick;
        let up = (prev.close <= bx.upper && last.close > bx.upper) || (wick && last.high > bx.upper);
        let down = (prev.close >= bx.lower && last.close < bx.lower) || (wick && last.low < bx.lower);

        if up {
            Some(Side::Long)
        } else if down {
            Some(Side::Short)
        } else {
            None
        }
    }

    #[inline]
    fn points(&self, points: f64) -> f64 {
        points * self.point_size
    }
}

impl StageConfig for BreakoutSignalEngine {
    fn stage_name(&self) -> &'static str {
        "breakout"
    }

    fn validate_config(&self) -> Result<()> {
        if !(self.point_size.is_finite() && self.point_size > 0.0) {
            return Err(StructureError::InvalidConfig(format!(
                "breakout.point_size must be > 0, got {}",
                self.point_size
            )));
        }
        check_price("breakout.sl_points", self.sl_points)?;
        check_price("breakout.tp1_points", self.tp1_points)?;
        check_price("breakout.tp2_points", self.tp2_points)?;
        check_price("breakout.retest_min_points", self.retest_min_points)?;
        Ok(())
    }
}

static BREAKOUT_PARAMS: &[ParamMeta] = &[
    ParamMeta::price("sl_points", 250.0, (100.0, 400.0, 50.0), "Stop distance behind the boundary"),
    ParamMeta::price("tp1_points", 250.0, (150.0, 400.0, 50.0), "First target distance"),
    ParamMeta::price("tp2_points", 500.0, (300.0, 800.0, 100.0), "Second target distance"),
    ParamMeta::price("retest_min_points", 100.0, (50.0, 200.0, 50.0), "Retest tolerance floor"),
    ParamMeta::ratio("retest_ratio", 0.5, (0.3, 0.7, 0.1), "Retest share of the last move"),
];

impl ParameterizedStage for BreakoutSignalEngine {
    fn param_meta() -> &'static [ParamMeta] {
        BREAKOUT_PARAMS
    }

    /// `point_size` and the strategy variants keep their defaults
    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let engine = Self {
            sl_points: get_price(params, "sl_points", 250.0)?,
            tp1_points: get_price(params, "tp1_points", 250.0)?,
            tp2_points: get_price(params, "tp2_points", 500.0)?,
            retest_min_points: get_price(params, "retest_min_points", 100.0)?,
            retest_ratio: get_ratio(params, "retest_ratio", 0.5)?,
            ..Default::default()
        };
        engine.validate_config()?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64) -> Candle {
        Candle::new(0, close, close + 0.2, close - 0.2, close)
    }

    fn box_90_100() -> BreakoutBox {
        BreakoutBox::from_candle(&Candle::new(0, 95.0, 100.0, 90.0, 96.0))
    }

    #[test]
    fn test_close_cross_up_entry_ready() {
        let engine = BreakoutSignalEngine::default();
        let signal = engine.classify(&box_90_100(), &bar(99.0), &bar(101.0));

        let Signal::EntryReady(plan) = signal else {
            panic!("expected ENTRY_READY, got {signal:?}");
        };
        assert_eq!(plan.side, Side::Long);
        assert_eq!(plan.entry, 100.0);
        assert_eq!(plan.stop, 97.5);
        assert_eq!(plan.tp1, 102.5);
        assert_eq!(plan.tp2, 105.0);
        assert_eq!(plan.entry_retest, 100.5);
        assert_eq!(plan.last_close, 101.0);
    }

    #[test]
    fn test_far_from_boundary_is_breakout() {
        let engine = BreakoutSignalEngine::default();
        // tolerance = max(1.0, 0.5 * 1.0) = 1.0; distance 4.0
        let signal = engine.classify(&box_90_100(), &bar(103.0), &bar(104.0));
        assert_eq!(signal, Signal::Wait, "prev already above: no fresh close-cross");

        let signal = engine.classify(&box_90_100(), &bar(100.0), &bar(104.0));
        // tolerance = max(1.0, 0.5 * 4.0) = 2.0
        assert_eq!(signal.status(), SignalStatus::Breakout);
        assert_eq!(signal.side(), Some(Side::Long));
    }

    #[test]
    fn test_cross_down_short_prices() {
        let engine = BreakoutSignalEngine::default();
        let signal = engine.classify(&box_90_100(), &bar(90.5), &bar(89.6));

        assert_eq!(signal.status(), SignalStatus::EntryReady);
        let plan = signal.plan().unwrap();
        assert_eq!(plan.side, Side::Short);
        assert_eq!(plan.entry, 90.0);
        assert_eq!(plan.stop, 92.5);
        assert_eq!(plan.tp1, 87.5);
        assert_eq!(plan.tp2, 85.0);
    }

    #[test]
    fn test_inside_box_waits() {
        let engine = BreakoutSignalEngine::default();
        assert_eq!(engine.classify(&box_90_100(), &bar(95.0), &bar(96.0)), Signal::Wait);
    }

    #[test]
    fn test_wick_variant() {
        let wick_last = Candle::new(0, 99.0, 100.8, 98.5, 99.5);
        let close_only = BreakoutSignalEngine::default();
        assert_eq!(close_only.classify(&box_90_100(), &bar(99.0), &wick_last), Signal::Wait);

        let wick = BreakoutSignalEngine {
            confirmation: BreakConfirmation::CloseOrWick,
            ..Default::default()
        };
        let signal = wick.classify(&box_90_100(), &bar(99.0), &wick_last);
        assert_eq!(signal.status(), SignalStatus::EntryReady);
        assert_eq!(signal.side(), Some(Side::Long));
    }

    #[test]
    fn test_last_close_entry_variant() {
        let engine = BreakoutSignalEngine {
            entry: EntryConvention::LastClose,
            ..Default::default()
        };
        let plan = *engine.classify(&box_90_100(), &bar(99.0), &bar(101.0)).plan().unwrap();
        assert_eq!(plan.entry, 101.0);
        assert_eq!(plan.boundary, 100.0);
        // stop stays anchored to the boundary
        assert_eq!(plan.stop, 97.5);
        assert_eq!(plan.tp1, 103.5);
    }

    #[test]
    fn test_wick_variant_downside() {
        let wick_last = Candle::new(0, 91.0, 91.5, 89.4, 90.6);
        let close_only = BreakoutSignalEngine::default();
        assert_eq!(close_only.classify(&box_90_100(), &bar(91.0), &wick_last), Signal::Wait);

        let wick = BreakoutSignalEngine {
            confirmation: BreakConfirmation::CloseOrWick,
            ..Default::default()
        };
        let signal = wick.classify(&box_90_100(), &bar(91.0), &wick_last);
        assert_eq!(signal.status(), SignalStatus::EntryReady);
        let plan = signal.plan().unwrap();
        assert_eq!(plan.side, Side::Short);
        assert_eq!(plan.entry, 90.0);
        assert_eq!(plan.entry_retest, 90.3);
        assert_eq!(plan.stop, 92.5);
    }

    #[test]
    fn test_last_close_entry_short() {
        let engine = BreakoutSignalEngine {
            entry: EntryConvention::LastClose,
            ..Default::default()
        };
        let plan = *engine.classify(&box_90_100(), &bar(90.5), &bar(89.6)).plan().unwrap();
        assert_eq!(plan.side, Side::Short);
        assert_eq!(plan.entry, 89.6);
        assert_eq!(plan.boundary, 90.0);
        assert_eq!(plan.stop, 92.5);
        assert_eq!(plan.tp1, 87.1);
        assert_eq!(plan.tp2, 84.6);
    }

    #[test]
    fn test_short_series_waits() {
        let engine = BreakoutSignalEngine::default();
        assert_eq!(engine.analyze(&box_90_100(), &CandleSeries::default()), Signal::Wait);
    }

    #[test]
    fn test_box_from_levels() {
        let levels = LevelSet {
            resistance: vec![
                Level { price: 110.0, touch_count: 3 },
                Level { price: 104.0, touch_count: 2 },
            ],
            support: vec![
                Level { price: 92.0, touch_count: 4 },
                Level { price: 97.0, touch_count: 2 },
                Level { price: 101.0, touch_count: 2 },
            ],
        };
        let bx = BreakoutBox::from_levels(&levels, 100.0).unwrap();
        assert_eq!(bx.upper, 104.0);
        assert_eq!(bx.lower, 97.0);
        assert!(bx.reference_candle.is_none());
        assert_eq!(bx.height(), 7.0);

        assert!(BreakoutBox::from_levels(&levels, 120.0).is_none());
    }

    #[test]
    fn test_signal_wire_shape() {
        let wait = serde_json::to_value(Signal::Wait).unwrap();
        assert_eq!(wait["status"], "WAIT");
        assert!(wait["side"].is_null());
        assert!(wait["entry"].is_null());

        let engine = BreakoutSignalEngine::default();
        let ready = serde_json::to_value(engine.classify(&box_90_100(), &bar(99.0), &bar(101.0))).unwrap();
        assert_eq!(ready["status"], "ENTRY_READY");
        assert_eq!(ready["side"], "LONG");
        assert_eq!(ready["entry_50"], 100.5);
        assert_eq!(ready["sl"], 97.5);
    }

    #[test]
    fn test_validate_config() {
        let bad = BreakoutSignalEngine {
            point_size: 0.0,
            ..Default::default()
        };
        assert!(bad.validate_config().is_err());

        let mut params = HashMap::new();
        params.insert("sl_points", 300.0);
        let engine = BreakoutSignalEngine::with_params(&params).unwrap();
        assert_eq!(engine.sl_points, 300.0);
        assert_eq!(engine.point_size, 0.01);
    }
}

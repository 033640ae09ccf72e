//! Retest confirmation candles
//!
//! Checked in order: engulfing, pin bar, marubozu. The first match wins.

use super::breakout::Side;
use crate::{series::Candle, OHLCExt};

/// Engulfing body must reach this multiple of ATR
pub const ENGULFING_MIN_BODY_ATR: f64 = 0.4;
/// Pin bar wick relative to body
pub const PIN_WICK_BODY_MULT: f64 = 2.0;
/// Close position thresholds for a pin bar (long / short)
pub const PIN_CLOSE_POS_LONG: f64 = 0.70;
pub const PIN_CLOSE_POS_SHORT: f64 = 0.30;
pub const MARUBOZU_MIN_BODY_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ConfirmKind {
    Engulfing,
    PinBar,
    Marubozu,
}

impl ConfirmKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfirmKind::Engulfing => "Engulfing",
            ConfirmKind::PinBar => "PinBar",
            ConfirmKind::Marubozu => "Marubozu",
        }
    }
}

/// Confirmation candle at `candles[idx]` in the `side` direction.
///
/// `None` for index 0, a zero-range bar or no match. Without an `atr` the
/// engulfing check cannot pass.
pub fn confirm_pattern(candles: &[Candle], idx: usize, side: Side, atr: Option<f64>) -> Option<ConfirmKind> {
    if idx == 0 || idx >= candles.len() {
        return None;
    }
    let bar = &candles[idx];
    let prev = &candles[idx - 1];
    if bar.range() <= 0.0 {
        return None;
    }
    let body = bar.body();
    let with_side = match side {
        Side::Long => bar.is_bullish(),
        Side::Short => bar.is_bearish(),
    };

    let engulfs = bar.body_low() <= prev.body_low() && bar.body_high() >= prev.body_high();
    let strong = atr.is_some_and(|a| body >= ENGULFING_MIN_BODY_ATR * a);
    if engulfs && strong && with_side {
        return Some(ConfirmKind::Engulfing);
    }

    let long_wick = bar.upper_shadow() >= PIN_WICK_BODY_MULT * body
        || bar.lower_shadow() >= PIN_WICK_BODY_MULT * body;
    if body > 0.0 && long_wick {
        let pos = bar.close_position()?;
        let rejects = match side {
            Side::Long => pos >= PIN_CLOSE_POS_LONG,
            Side::Short => pos <= PIN_CLOSE_POS_SHORT,
        };
        if rejects {
            return Some(ConfirmKind::PinBar);
        }
    }

    if bar.body_ratio() >= MARUBOZU_MIN_BODY_RATIO && with_side {
        return Some(ConfirmKind::Marubozu);
    }
    None
}

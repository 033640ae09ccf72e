//! Multi-timeframe zone breakout scan
//!
//! Works from M5 candles only; M15 and H1 are resampled from them.
//!
//! 1. H1: the last swing high and swing low become supply/demand zones,
//!    padded by a fraction of H1 ATR. Trend comes from EMA50 position and
//!    slope.
//! 2. M15: the latest strong-bodied close beyond a zone (plus a buffer) in the
//!    trend direction is the breakout.
//! 3. M5: the first bar after the breakout touching the zone, followed within
//!    a few bars by a confirmation candle, triggers the trade.

use std::collections::HashMap;

use super::{
    breakout::Side,
    confirm::{confirm_pattern, ConfirmKind},
    helpers::round_price,
    indicators::{atr, ema, last_atr},
    pivots::find_swings,
};
use crate::{
    params::{check_price, get_period, get_price, get_ratio, ParamMeta, ParameterizedStage},
    series::{format_timestamp, resample, Candle, CandleSeries, Timeframe},
    OHLCExt, Period, Ratio, Result, StageConfig, StructureError,
};

impl_with_defaults!(ZoneScanConfig);

/// Zone pad used when H1 ATR is not available yet
pub const FALLBACK_ZONE_PAD: f64 = 0.5;
/// ATR stand-in for the M5 touch tolerance during ATR warm-up
pub const FALLBACK_TOUCH_ATR: f64 = 5.0;

// ============================================================
// TYPES
// ============================================================

/// Inclusive price band
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceZone {
    pub low: f64,
    pub high: f64,
}

impl PriceZone {
    pub fn around(mid: f64, pad: f64) -> Self {
        Self {
            low: mid - pad,
            high: mid + pad,
        }
    }

    /// Bar range `[low, high]` overlaps the zone widened by `tol`
    pub fn touched_by(&self, low: f64, high: f64, tol: f64) -> bool {
        !(high < self.low - tol || low > self.high + tol)
    }

    fn rounded(self) -> [f64; 2] {
        [round_price(self.low), round_price(self.high)]
    }
}

/// Resistance and support zones from H1 swings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct H1Zones {
    pub upper: PriceZone,
    pub lower: PriceZone,
}

/// M15 close through a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBreakout {
    pub side: Side,
    /// Index in the M15 series
    pub index: usize,
    /// M15 bar open time
    pub timestamp: i64,
    pub zone: PriceZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSetupReason {
    /// Too few M15 or H1 bars after resampling
    InsufficientHistory,
    /// No H1 swing high or swing low
    NoZones,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchReason {
    /// No M15 close through a zone with trend support
    NoBreakout,
    /// Zone was (possibly) retested but no confirmation candle followed
    NoConfirmation,
}

/// Triggered zone trade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneTrade {
    pub side: Side,
    pub zone: PriceZone,
    pub breakout_time: i64,
    pub retest_time: i64,
    pub confirm_time: i64,
    pub confirm: ConfirmKind,
    pub entry: f64,
    pub sl: f64,
    pub tp1: f64,
    pub tp2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneScanStatus {
    NoData,
    NoSetup,
    Watch,
    WaitData,
    Buy,
    Sell,
}

/// Result of one zone scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneScanOutcome {
    NoData,
    NoSetup(NoSetupReason),
    Watch {
        reason: WatchReason,
        breakout_time: Option<i64>,
    },
    /// Breakout found but no M5 bars after it yet
    WaitData { breakout_time: i64 },
    Triggered(ZoneTrade),
}

impl ZoneScanOutcome {
    pub fn status(&self) -> ZoneScanStatus {
        match self {
            ZoneScanOutcome::NoData => ZoneScanStatus::NoData,
            ZoneScanOutcome::NoSetup(_) => ZoneScanStatus::NoSetup,
            ZoneScanOutcome::Watch { .. } => ZoneScanStatus::Watch,
            ZoneScanOutcome::WaitData { .. } => ZoneScanStatus::WaitData,
            ZoneScanOutcome::Triggered(trade) => match trade.side {
                Side::Long => ZoneScanStatus::Buy,
                Side::Short => ZoneScanStatus::Sell,
            },
        }
    }

    pub fn trade(&self) -> Option<&ZoneTrade> {
        match self {
            ZoneScanOutcome::Triggered(trade) => Some(trade),
            _ => None,
        }
    }
}

#[derive(serde::Serialize)]
struct ZoneScanWire {
    status: ZoneScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakout_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    h1_zone: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retest_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confirm_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confirm_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entry: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tp1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tp2: Option<f64>,
}

impl serde::Serialize for ZoneScanOutcome {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut wire = ZoneScanWire {
            status: self.status(),
            reason: None,
            breakout_time: None,
            direction: None,
            h1_zone: None,
            retest_time: None,
            confirm_time: None,
            confirm_type: None,
            entry: None,
            sl: None,
            tp1: None,
            tp2: None,
        };
        match *self {
            ZoneScanOutcome::NoData => {}
            ZoneScanOutcome::NoSetup(reason) => {
                wire.reason = Some(match reason {
                    NoSetupReason::InsufficientHistory => "insufficient_history",
                    NoSetupReason::NoZones => "no_zones",
                });
            }
            ZoneScanOutcome::Watch { reason, breakout_time } => {
                wire.reason = Some(match reason {
                    WatchReason::NoBreakout => "no_breakout",
                    WatchReason::NoConfirmation => "no_confirmation",
                });
                wire.breakout_time = breakout_time.map(format_timestamp);
            }
            ZoneScanOutcome::WaitData { breakout_time } => {
                wire.breakout_time = Some(format_timestamp(breakout_time));
            }
            ZoneScanOutcome::Triggered(t) => {
                wire.breakout_time = Some(format_timestamp(t.breakout_time));
                wire.direction = Some(t.side);
                wire.h1_zone = Some(t.zone.rounded());
                wire.retest_time = Some(format_timestamp(t.retest_time));
                wire.confirm_time = Some(format_timestamp(t.confirm_time));
                wire.confirm_type = Some(t.confirm.as_str());
                wire.entry = Some(t.entry);
                wire.sl = Some(t.sl);
                wire.tp1 = Some(t.tp1);
                wire.tp2 = Some(t.tp2);
            }
        }
        wire.serialize(s)
    }
}

/// Run the zone scan with `config`
pub fn scan_zone_breakout(m5: &CandleSeries, config: &ZoneScanConfig) -> ZoneScanOutcome {
    config.scan(m5)
}

// ============================================================
// STAGE
// ============================================================

/// Zone scan configuration. Price distances are in raw price units.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ZoneScanConfig {
    /// Centered H1 swing window width. A bar tying the window extreme is a
    /// swing.
    pub swing_lookback: Period,
    /// Zone half-width as a fraction of H1 ATR
    pub zone_pad_ratio: Ratio,
    pub atr_period: Period,
    pub ema_period: Period,
    /// EMA steps compared for the trend slope
    pub trend_slope_bars: Period,
    pub min_m15_bars: usize,
    pub min_h1_bars: usize,
    /// Closed M15 bars searched for a breakout
    pub breakout_bars: Period,
    pub min_buffer: f64,
    /// Buffer as a fraction of M15 ATR when that exceeds `min_buffer`
    pub buffer_atr_ratio: Ratio,
    pub body_ratio_filter: Ratio,
    /// M5 bars from the breakout searched for a retest
    pub retest_window: Period,
    /// Bars checked for confirmation, starting at the touching bar
    pub confirm_bars: Period,
    /// Touch tolerance as a fraction of M5 ATR
    pub touch_atr_ratio: Ratio,
    pub sl_after_zone: f64,
    pub tp1_points: f64,
    pub tp2_points: f64,
}

impl Default for ZoneScanConfig {
    fn default() -> Self {
        Self {
            swing_lookback: Period::new_const(5),
            zone_pad_ratio: Ratio::new_const(0.2),
            atr_period: Period::new_const(14),
            ema_period: Period::new_const(50),
            trend_slope_bars: Period::new_const(4),
            min_m15_bars: 30,
            min_h1_bars: 10,
            breakout_bars: Period::new_const(40),
            min_buffer: 10.0,
            buffer_atr_ratio: Ratio::new_const(0.15),
            body_ratio_filter: Ratio::new_const(0.6),
            retest_window: Period::new_const(24),
            confirm_bars: Period::new_const(4),
            touch_atr_ratio: Ratio::new_const(0.1),
            sl_after_zone: 12.0,
            tp1_points: 25.0,
            tp2_points: 50.0,
        }
    }
}

impl ZoneScanConfig {
    /// Full scan over M5 candles
    pub fn scan(&self, m5: &CandleSeries) -> ZoneScanOutcome {
        if m5.is_empty() {
            return ZoneScanOutcome::NoData;
        }

        let m15 = resample(m5, Timeframe::M15);
        let h1 = resample(m5, Timeframe::H1);
        if m15.len() < self.min_m15_bars || h1.len() < self.min_h1_bars {
            tracing::debug!(m15 = m15.len(), h1 = h1.len(), "Not enough history for zone scan");
            return ZoneScanOutcome::NoSetup(NoSetupReason::InsufficientHistory);
        }

        let Some(zones) = self.h1_zones(&h1) else {
            return ZoneScanOutcome::NoSetup(NoSetupReason::NoZones);
        };
        let trend = self.h1_trend(&h1);

        let Some(breakout) = self.m15_breakout(&m15, &zones, trend) else {
            tracing::debug!(?trend, "No M15 breakout");
            return ZoneScanOutcome::Watch {
                reason: WatchReason::NoBreakout,
                breakout_time: None,
            };
        };

        let after = m5.since(breakout.timestamp);
        let window = &after.candles()[..after.len().min(self.retest_window.get())];
        let outcome = self.retest(window, &breakout);
        tracing::debug!(status = ?outcome.status(), side = ?breakout.side, "Zone scan complete");
        outcome
    }

    /// Zones around the last H1 swing high and swing low
    pub fn h1_zones(&self, h1: &CandleSeries) -> Option<H1Zones> {
        let width = self.swing_lookback.get();
        let left = width / 2;
        let pivots = find_swings(h1, left, width - 1 - left);
        let last_high = pivots.last_high()?;
        let last_low = pivots.last_low()?;

        let pad = last_atr(h1.candles(), self.atr_period.get())
            .map_or(FALLBACK_ZONE_PAD, |a| self.zone_pad_ratio.get() * a);
        Some(H1Zones {
            upper: PriceZone::around(last_high.price, pad),
            lower: PriceZone::around(last_low.price, pad),
        })
    }

    /// `Long` when the last close is above a rising EMA, `Short` when below a
    /// falling one.
    pub fn h1_trend(&self, h1: &CandleSeries) -> Option<Side> {
        let closes = h1.closes();
        let steps = self.trend_slope_bars.get();
        if closes.len() <= steps {
            return None;
        }
        let line = ema(&closes, self.ema_period.get());
        let last = line[line.len() - 1];
        let slope = last - line[line.len() - 1 - steps];
        let close = closes[closes.len() - 1];

        if close > last && slope > 0.0 {
            Some(Side::Long)
        } else if close < last && slope < 0.0 {
            Some(Side::Short)
        } else {
            None
        }
    }

    /// Latest qualifying M15 breakout among the recent closed bars.
    ///
    /// The newest M15 bar is treated as still forming and never qualifies.
    pub fn m15_breakout(&self, m15: &CandleSeries, zones: &H1Zones, trend: Option<Side>) -> Option<ZoneBreakout> {
        let side = trend?;
        let candles = m15.candles();
        if candles.len() < 2 {
            return None;
        }
        let buffer = last_atr(candles, self.atr_period.get())
            .map_or(self.min_buffer, |a| self.min_buffer.max(self.buffer_atr_ratio.get() * a));
        let start = candles.len().saturating_sub(self.breakout_bars.get()).max(1);

        (start..candles.len() - 1).rev().find_map(|i| {
            let bar = &candles[i];
            if bar.body_ratio() < self.body_ratio_filter.get() {
                return None;
            }
            let (zone, through) = match side {
                Side::Long => (zones.upper, bar.close > zones.upper.high + buffer),
                Side::Short => (zones.lower, bar.close < zones.lower.low - buffer),
            };
            through.then_some(ZoneBreakout {
                side,
                index: i,
                timestamp: bar.timestamp,
                zone,
            })
        })
    }

    /// Retest and confirmation on the M5 bars following a breakout
    pub fn retest(&self, after: &[Candle], breakout: &ZoneBreakout) -> ZoneScanOutcome {
        if after.is_empty() {
            return ZoneScanOutcome::WaitData {
                breakout_time: breakout.timestamp,
            };
        }

        let atr5 = atr(after, self.atr_period.get());
        let zone = breakout.zone;
        let confirmed = (0..after.len()).find_map(|j| {
            let tol = self.touch_atr_ratio.get() * atr5[j].unwrap_or(FALLBACK_TOUCH_ATR);
            if !zone.touched_by(after[j].low, after[j].high, tol) {
                return None;
            }
            let end = (j + self.confirm_bars.get()).min(after.len());
            (j..end).find_map(|k| confirm_pattern(after, k, breakout.side, atr5[k]).map(|kind| (j, k, kind)))
        });

        let Some((retest, confirm, kind)) = confirmed else {
            return ZoneScanOutcome::Watch {
                reason: WatchReason::NoConfirmation,
                breakout_time: Some(breakout.timestamp),
            };
        };

        let entry = after[confirm].close;
        let dir = breakout.side.sign();
        let sl = match breakout.side {
            Side::Long => zone.low - self.sl_after_zone,
            Side::Short => zone.high + self.sl_after_zone,
        };
        ZoneScanOutcome::Triggered(ZoneTrade {
            side: breakout.side,
            zone,
            breakout_time: breakout.timestamp,
            retest_time: after[retest].timestamp,
            confirm_time: after[confirm].timestamp,
            confirm: kind,
            entry: round_price(entry),
            sl: round_price(sl),
            tp1: round_price(entry + dir * self.tp1_points),
            tp2: round_price(entry + dir * self.tp2_points),
        })
    }
}

impl StageConfig for ZoneScanConfig {
    fn stage_name(&self) -> &'static str {
        "zone_scan"
    }

    fn validate_config(&self) -> Result<()> {
        check_price("zone_scan.min_buffer", self.min_buffer)?;
        check_price("zone_scan.sl_after_zone", self.sl_after_zone)?;
        check_price("zone_scan.tp1_points", self.tp1_points)?;
        check_price("zone_scan.tp2_points", self.tp2_points)?;
        if self.swing_lookback.get() < 2 {
            return Err(StructureError::InvalidConfig(
                "zone_scan.swing_lookback must be >= 2".to_string(),
            ));
        }
        Ok(())
    }
}

static ZONE_SCAN_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("swing_lookback", 5.0, (3.0, 9.0, 2.0), "Centered H1 swing window"),
    ParamMeta::ratio("zone_pad_ratio", 0.2, (0.1, 0.4, 0.1), "Zone pad as fraction of H1 ATR"),
    ParamMeta::ratio("body_ratio_filter", 0.6, (0.5, 0.8, 0.1), "Minimum M15 breakout body ratio"),
    ParamMeta::period("retest_window", 24.0, (12.0, 36.0, 12.0), "M5 bars searched for a retest"),
    ParamMeta::price("sl_after_zone", 12.0, (6.0, 18.0, 6.0), "Stop distance beyond the zone"),
];

impl ParameterizedStage for ZoneScanConfig {
    fn param_meta() -> &'static [ParamMeta] {
        ZONE_SCAN_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let config = Self {
            swing_lookback: get_period(params, "swing_lookback", 5)?,
            zone_pad_ratio: get_ratio(params, "zone_pad_ratio", 0.2)?,
            body_ratio_filter: get_ratio(params, "body_ratio_filter", 0.6)?,
            retest_window: get_period(params, "retest_window", 24)?,
            sl_after_zone: get_price(params, "sl_after_zone", 12.0)?,
            ..Default::default()
        };
        config.validate_config()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesOrder;

    const HOUR: i64 = 3_600_000;
    const M5: i64 = 300_000;

    /// Zigzag base price for hour `h`; swing highs every 4 hours from h5
    fn base_price(h: usize) -> f64 {
        let z = [0.0, 1.0, 0.0, -1.0][h % 4];
        100.0 + 0.5 * h as f64 + z
    }

    /// Twelve flat M5 bars per hour: zero-body M15 bars, no breakout
    fn quiet_hours(hours: usize) -> Vec<Candle> {
        (0..hours)
            .flat_map(|h| {
                let p = base_price(h);
                (0..12).map(move |k| Candle::new(h as i64 * HOUR + k * M5, p, p + 0.3, p - 0.3, p))
            })
            .collect()
    }

    fn at(hour: i64, k: i64, o: f64, h: f64, l: f64, c: f64) -> Candle {
        Candle::new(hour * HOUR + k * M5, o, h, l, c)
    }

    /// 20 quiet hours, then an up-break at 20:15, a retest at 20:45 and a
    /// bullish marubozu at 20:50
    fn breakout_retest_fixture() -> CandleSeries {
        let mut bars = quiet_hours(20);
        bars.extend([
            at(20, 0, 108.7, 109.0, 108.4, 108.7),
            at(20, 1, 108.7, 109.0, 108.4, 108.7),
            at(20, 2, 108.7, 109.0, 108.4, 108.7),
            at(20, 3, 110.8, 111.6, 110.7, 111.5),
            at(20, 4, 111.5, 112.4, 111.4, 112.3),
            at(20, 5, 112.3, 113.1, 112.2, 113.0),
            at(20, 6, 113.0, 113.1, 111.9, 112.0),
            at(20, 7, 112.0, 112.1, 111.1, 111.2),
            at(20, 8, 111.2, 111.3, 110.8, 110.9),
            at(20, 9, 110.9, 111.0, 110.0, 110.1),
            at(20, 10, 110.1, 111.2, 110.05, 111.1),
            at(20, 11, 111.1, 111.5, 111.0, 111.4),
            at(21, 0, 111.4, 111.6, 111.3, 111.5),
            at(21, 1, 111.4, 111.6, 111.3, 111.5),
            at(21, 2, 111.4, 111.6, 111.3, 111.5),
        ]);
        CandleSeries::from_candles(bars, SeriesOrder::OldestFirst)
    }

    fn small_buffer() -> ZoneScanConfig {
        ZoneScanConfig {
            min_buffer: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_data() {
        let outcome = ZoneScanConfig::default().scan(&CandleSeries::default());
        assert_eq!(outcome, ZoneScanOutcome::NoData);
        assert_eq!(outcome.status(), ZoneScanStatus::NoData);
    }

    #[test]
    fn test_short_history_no_setup() {
        let m5 = CandleSeries::from_candles(quiet_hours(5), SeriesOrder::OldestFirst);
        assert_eq!(
            ZoneScanConfig::default().scan(&m5),
            ZoneScanOutcome::NoSetup(NoSetupReason::InsufficientHistory)
        );
    }

    #[test]
    fn test_h1_zones_and_trend() {
        let m5 = breakout_retest_fixture();
        let h1 = resample(&m5, Timeframe::H1);
        assert_eq!(h1.len(), 22);

        let config = small_buffer();
        let zones = config.h1_zones(&h1).unwrap();
        // last swing high is hour 17 (high 109.8), pad = 0.2 * ATR14
        let pad = 0.2 * 20.6 / 14.0;
        assert!((zones.upper.low - (109.8 - pad)).abs() < 1e-9);
        assert!((zones.upper.high - (109.8 + pad)).abs() < 1e-9);
        // last swing low is hour 19 (low 108.2)
        assert!((zones.lower.low - (108.2 - pad)).abs() < 1e-9);

        assert_eq!(config.h1_trend(&h1), Some(Side::Long));
    }

    #[test]
    fn test_h1_zones_on_tied_highs() {
        let highs = [1.0, 2.0, 5.0, 5.0, 2.0, 1.0, 0.5, 1.0, 0.8, 1.2, 1.4, 1.6];
        let bars: Vec<Candle> = highs
            .iter()
            .enumerate()
            .map(|(i, &h)| Candle::new(i as i64 * HOUR, h - 0.1, h, h - 0.2, h - 0.1))
            .collect();
        let h1 = CandleSeries::from_candles(bars, SeriesOrder::OldestFirst);

        // twelve bars: ATR14 not warmed up, fallback pad
        let zones = ZoneScanConfig::default().h1_zones(&h1).unwrap();
        assert!((zones.upper.low - (5.0 - FALLBACK_ZONE_PAD)).abs() < 1e-9);
        assert!((zones.upper.high - (5.0 + FALLBACK_ZONE_PAD)).abs() < 1e-9);
        assert!((zones.lower.low - (0.3 - FALLBACK_ZONE_PAD)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_body_bars_never_break_out() {
        let m5 = CandleSeries::from_candles(quiet_hours(20), SeriesOrder::OldestFirst);
        let outcome = small_buffer().scan(&m5);
        assert_eq!(
            outcome,
            ZoneScanOutcome::Watch {
                reason: WatchReason::NoBreakout,
                breakout_time: None
            }
        );
    }

    #[test]
    fn test_breakout_retest_triggers_buy() {
        let outcome = small_buffer().scan(&breakout_retest_fixture());
        assert_eq!(outcome.status(), ZoneScanStatus::Buy);

        let trade = outcome.trade().unwrap();
        assert_eq!(trade.side, Side::Long);
        assert_eq!(trade.breakout_time, 20 * HOUR + 15 * 60_000);
        assert_eq!(trade.retest_time, 20 * HOUR + 9 * M5);
        assert_eq!(trade.confirm_time, 20 * HOUR + 10 * M5);
        assert_eq!(trade.confirm, ConfirmKind::Marubozu);
        assert_eq!(trade.entry, 111.1);
        assert_eq!(trade.sl, 97.51);
        assert_eq!(trade.tp1, 136.1);
        assert_eq!(trade.tp2, 161.1);
    }

    #[test]
    fn test_default_buffer_blocks_small_breakout() {
        // buffer 10 price units: the 113.0 close is not far enough
        let outcome = ZoneScanConfig::default().scan(&breakout_retest_fixture());
        assert_eq!(outcome.status(), ZoneScanStatus::Watch);
    }

    #[test]
    fn test_retest_without_confirmation() {
        let breakout = ZoneBreakout {
            side: Side::Long,
            index: 0,
            timestamp: 0,
            zone: PriceZone { low: 99.5, high: 100.5 },
        };
        // flat doji bars sitting on the zone
        let after: Vec<Candle> = (0..6).map(|i| Candle::new(i * M5, 100.0, 100.2, 99.8, 100.0)).collect();
        assert_eq!(
            small_buffer().retest(&after, &breakout),
            ZoneScanOutcome::Watch {
                reason: WatchReason::NoConfirmation,
                breakout_time: Some(0)
            }
        );
        assert_eq!(
            small_buffer().retest(&[], &breakout),
            ZoneScanOutcome::WaitData { breakout_time: 0 }
        );
    }

    #[test]
    fn test_touch_tolerance() {
        let zone = PriceZone::around(100.0, 0.5);
        assert!(zone.touched_by(100.6, 101.0, 0.2));
        assert!(!zone.touched_by(100.8, 101.0, 0.2));
        assert!(zone.touched_by(98.0, 99.4, 0.2));
    }

    #[test]
    fn test_outcome_wire_format() {
        let json = serde_json::to_value(small_buffer().scan(&breakout_retest_fixture())).unwrap();
        assert_eq!(json["status"], "BUY");
        assert_eq!(json["direction"], "LONG");
        assert_eq!(json["confirm_type"], "Marubozu");
        assert_eq!(json["breakout_time"], "1970-01-01 20:15:00");
        assert_eq!(json["h1_zone"][0], 109.51);

        let json = serde_json::to_value(ZoneScanOutcome::NoSetup(NoSetupReason::NoZones)).unwrap();
        assert_eq!(json["status"], "NO_SETUP");
        assert_eq!(json["reason"], "no_zones");
        assert!(json.get("entry").is_none());
    }

    #[test]
    fn test_validate_config() {
        assert!(ZoneScanConfig::default().validate_config().is_ok());
        let bad = ZoneScanConfig {
            tp1_points: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate_config().is_err());
    }
}

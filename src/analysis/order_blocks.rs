//! Order block detection
//!
//! A bearish order block is the last green candle before price closes below a
//! recent swing low (break of structure down); a bullish order block is the
//! last red candle before a close above a recent swing high. The zone is the
//! origin candle's body.

use std::collections::HashMap;

use super::{
    helpers::round_price,
    pivots::{PivotPoint, Pivots},
};
use crate::{
    params::{get_period, ParamMeta, ParameterizedStage},
    series::{format_timestamp, Candle, CandleSeries},
    OHLCExt, Period, Result, StageConfig,
};

impl_with_defaults!(OrderBlockDetector);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBlockKind {
    /// Demand zone
    Bullish,
    /// Supply zone
    Bearish,
}

/// Supply/demand zone left by the origin candle of a break of structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderBlock {
    pub kind: OrderBlockKind,
    /// `[low, high]` of the origin candle body
    pub zone: [f64; 2],
    pub timestamp: i64,
    /// Series index of the origin candle
    pub index: usize,
    /// Series index of the candle that broke structure
    pub break_index: usize,
}

impl OrderBlock {
    fn from_origin(kind: OrderBlockKind, candle: &Candle, index: usize, break_index: usize) -> Self {
        Self {
            kind,
            zone: [candle.body_low(), candle.body_high()],
            timestamp: candle.timestamp,
            index,
            break_index,
        }
    }

    /// Price inside the zone (inclusive)
    pub fn contains(&self, price: f64) -> bool {
        (self.zone[0]..=self.zone[1]).contains(&price)
    }
}

#[derive(serde::Serialize)]
struct OrderBlockWire {
    #[serde(rename = "type")]
    kind: OrderBlockKind,
    zone: [f64; 2],
    dt: String,
}

impl serde::Serialize for OrderBlock {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        OrderBlockWire {
            kind: self.kind,
            zone: [round_price(self.zone[0]), round_price(self.zone[1])],
            dt: format_timestamp(self.timestamp),
        }
        .serialize(s)
    }
}

/// Detect order blocks in the most recent `lookback` bars with default key
/// level count and backward search window.
pub fn detect_order_blocks(series: &CandleSeries, pivots: &Pivots, lookback: usize) -> Vec<OrderBlock> {
    match Period::new(lookback) {
        Ok(lookback) => OrderBlockDetector {
            lookback,
            ..Default::default()
        }
        .detect(series, pivots),
        Err(_) => Vec::new(),
    }
}

// ============================================================
// STAGE
// ============================================================

/// Order block detector configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrderBlockDetector {
    /// Bars (most recent) considered
    pub lookback: Period,
    /// Most recent pivots per side used as key levels
    pub key_levels: Period,
    /// Bars searched backward from the break for the origin candle
    pub max_back: Period,
}

impl Default for OrderBlockDetector {
    fn default() -> Self {
        Self {
            lookback: Period::new_const(150),
            key_levels: Period::new_const(3),
            max_back: Period::new_const(35),
        }
    }
}

impl OrderBlockDetector {
    /// At most one block per direction, sorted by origin index.
    pub fn detect(&self, series: &CandleSeries, pivots: &Pivots) -> Vec<OrderBlock> {
        let candles = series.candles();
        let len = candles.len();
        if len < 2 {
            return Vec::new();
        }
        let start = len.saturating_sub(self.lookback.get());

        let mut blocks: Vec<OrderBlock> = [
            self.find_block(candles, start, &pivots.highs, OrderBlockKind::Bullish),
            self.find_block(candles, start, &pivots.lows, OrderBlockKind::Bearish),
        ]
        .into_iter()
        .flatten()
        .collect();
        blocks.sort_by_key(|b| b.index);

        tracing::trace!(window = len - start, blocks = blocks.len(), "Order blocks detected");
        blocks
    }

    /// First key level (most recent first) yielding a break plus an origin candle
    fn find_block(
        &self,
        candles: &[Candle],
        start: usize,
        key_pivots: &[PivotPoint],
        kind: OrderBlockKind,
    ) -> Option<OrderBlock> {
        key_pivots
            .iter()
            .rev()
            .filter(|p| p.index >= start && p.index < candles.len())
            .take(self.key_levels.get())
            .find_map(|pivot| {
                let breaks = |c: &Candle| match kind {
                    OrderBlockKind::Bullish => c.close > pivot.price,
                    OrderBlockKind::Bearish => c.close < pivot.price,
                };
                let break_index = (pivot.index + 1..candles.len()).find(|&i| breaks(&candles[i]))?;

                let floor = break_index.saturating_sub(self.max_back.get()).max(start);
                let origin = (floor..break_index).rev().find(|&i| match kind {
                    OrderBlockKind::Bullish => candles[i].is_bearish(),
                    OrderBlockKind::Bearish => candles[i].is_bullish(),
                })?;

                Some(OrderBlock::from_origin(kind, &candles[origin], origin, break_index))
            })
    }
}

impl StageConfig for OrderBlockDetector {
    fn stage_name(&self) -> &'static str {
        "order_blocks"
    }
}

static ORDER_BLOCK_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("lookback", 150.0, (50.0, 300.0, 50.0), "Recent bars scanned"),
    ParamMeta::period("key_levels", 3.0, (1.0, 5.0, 1.0), "Recent pivots used as key levels"),
    ParamMeta::period("max_back", 35.0, (20.0, 40.0, 5.0), "Backward search window from the break"),
];

impl ParameterizedStage for OrderBlockDetector {
    fn param_meta() -> &'static [ParamMeta] {
        ORDER_BLOCK_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            lookback: get_period(params, "lookback", 150)?,
            key_levels: get_period(params, "key_levels", 3)?,
            max_back: get_period(params, "max_back", 35)?,
        })
    }
}

//! Analysis output
//!
//! Serializes to the JSON shape consumed by chart front-ends:
//!
//! ```json
//! {
//!   "levels": { "resistance": [{"price": 110.0, "hits": 3}], "support": [] },
//!   "trendlines": { "up": [{"a": 0.1, "b": 95.0, "touches": 3, "x_min": 4,
//!                           "x_max": 40, "y_min": 95.4, "y_max": 99.0}], "down": [] },
//!   "order_blocks": [{"type": "bearish", "zone": [100.5, 101.2], "dt": "2024-01-02 10:00:00"}],
//!   "signal": {"status": "WAIT", "side": null, "entry": null, "entry_50": null,
//!              "sl": null, "tp1": null, "tp2": null, "last_close": null}
//! }
//! ```

use crate::analysis::{Level, OrderBlock, Signal, TrendLine};

/// Resistance from swing highs, support from swing lows
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct LevelSet {
    pub resistance: Vec<Level>,
    pub support: Vec<Level>,
}

impl LevelSet {
    pub fn is_empty(&self) -> bool {
        self.resistance.is_empty() && self.support.is_empty()
    }
}

/// Up lines through swing lows, down lines through swing highs
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TrendlineSet {
    pub up: Vec<TrendLine>,
    pub down: Vec<TrendLine>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct StructureResult {
    pub levels: LevelSet,
    pub trendlines: TrendlineSet,
    pub order_blocks: Vec<OrderBlock>,
    /// `null` unless lower-timeframe candles were supplied
    pub signal: Option<Signal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_shape() {
        let json = serde_json::to_value(StructureResult::default()).unwrap();
        assert_eq!(json["levels"]["resistance"], serde_json::json!([]));
        assert_eq!(json["trendlines"]["down"], serde_json::json!([]));
        assert_eq!(json["order_blocks"], serde_json::json!([]));
        assert!(json.get("signal").is_some());
        assert!(json["signal"].is_null());
    }

    #[test]
    fn test_level_price_rounded() {
        let levels = LevelSet {
            resistance: vec![Level {
                price: 100.123_456,
                touch_count: 3,
            }],
            support: vec![],
        };
        let json = serde_json::to_value(&levels).unwrap();
        assert_eq!(json["resistance"][0]["price"], 100.12);
        assert_eq!(json["resistance"][0]["hits"], 3);
        assert!(!levels.is_empty());
    }

    #[test]
    fn test_wait_signal_serialized_with_nulls() {
        let result = StructureResult {
            signal: Some(Signal::Wait),
            ..Default::default()
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["signal"]["status"], "WAIT");
        assert!(json["signal"]["sl"].is_null());
    }
}

//! Shared numeric helpers and fixed thresholds

// ============================================================
// FIXED THRESHOLDS
// ============================================================

/// Index nudge applied when two pivots share an index
pub const SAME_INDEX_NUDGE: f64 = 1e-9;
/// Lines closer than this in slope are duplicate candidates
pub const DUPLICATE_SLOPE_EPS: f64 = 1e-5;
/// Lines closer than this in intercept (absolute price) are duplicate candidates
pub const DUPLICATE_INTERCEPT_EPS: f64 = 20.0;
/// Output price granularity (decimal places)
pub const PRICE_DECIMALS: i32 = 2;

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Round to instrument tick granularity (2 decimals)
#[inline]
pub fn round_price(value: f64) -> f64 {
    round_to(value, PRICE_DECIMALS)
}

#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Arithmetic mean; `None` for an empty slice
#[inline]
pub fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// `serialize_with` adapter writing a price rounded to [`PRICE_DECIMALS`]
pub fn serialize_price<S: serde::Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round_price(*value))
}

//! Rolling indicators used by the zone scan

use crate::series::Candle;

/// True range of `candle` against the previous close
#[inline]
pub fn true_range(candle: &Candle, prev_close: f64) -> f64 {
    let range = candle.high - candle.low;
    range
        .max((candle.high - prev_close).abs())
        .max((candle.low - prev_close).abs())
}

/// Average true range (simple rolling mean over `n` true ranges).
///
/// The first bar has no previous close and therefore no true range, so the
/// first value is at index `n`. Entries before that are `None`.
pub fn atr(candles: &[Candle], n: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; candles.len()];
    if n == 0 || candles.len() <= n {
        return out;
    }

    let tr: Vec<f64> = candles
        .windows(2)
        .map(|w| true_range(&w[1], w[0].close))
        .collect();

    let mut sum: f64 = tr[..n].iter().sum();
    out[n] = Some(sum / n as f64);
    for i in n..tr.len() {
        sum += tr[i] - tr[i - n];
        // tr[i] belongs to candle i + 1
        out[i + 1] = Some(sum / n as f64);
    }
    out
}

/// Last ATR value, if the series is long enough
pub fn last_atr(candles: &[Candle], n: usize) -> Option<f64> {
    atr(candles, n).last().copied().flatten()
}

/// Exponential moving average with `alpha = 2 / (span + 1)`, seeded with
/// the first value.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            Some(p) => alpha * v + (1.0 - alpha) * p,
            None => v,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

//! Candle data model
//!
//! [`Candle`] is the concrete OHLC bar used by every stage. [`CandleSeries`] is
//! an immutable, validated sequence normalized to oldest-first order: index 0
//! is always the oldest bar, whatever order the caller supplied.
//!
//! Rows coming from a market-data collaborator arrive as [`CandleRow`]s with a
//! free-form datetime string and optional numeric fields. Malformed rows are
//! skipped by [`CandleSeries::from_rows`] and rejected by
//! [`CandleSeries::try_from_rows`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{OHLCExt, Result, StructureError, OHLC};

// ============================================================
// CANDLE
// ============================================================

/// Single OHLC bar. `timestamp` is epoch milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Lower edge of the real body
    #[inline]
    pub fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Upper edge of the real body
    #[inline]
    pub fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }
}

impl OHLC for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

// ============================================================
// EXTERNAL ROW FORMAT
// ============================================================

/// Raw candle row as produced by a market-data fetcher.
///
/// Numeric fields are optional so that rows with missing values can be
/// detected and skipped instead of failing deserialization of a whole batch.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CandleRow {
    #[serde(alias = "time", alias = "timestamp")]
    pub datetime: String,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
}

impl CandleRow {
    pub fn new(datetime: impl Into<String>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            datetime: datetime.into(),
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
        }
    }

    /// Convert into a validated [`Candle`]. `index` is only used for the error.
    pub fn to_candle(&self, index: usize) -> Result<Candle> {
        let malformed = |reason| StructureError::MalformedCandle { index, reason };

        let timestamp = parse_datetime(&self.datetime).ok_or(malformed("unparseable datetime"))?;
        let open = self.open.ok_or(malformed("missing open"))?;
        let high = self.high.ok_or(malformed("missing high"))?;
        let low = self.low.ok_or(malformed("missing low"))?;
        let close = self.close.ok_or(malformed("missing close"))?;

        let candle = Candle::new(timestamp, open, high, low, close);
        candle.validate().map_err(|e| match e {
            StructureError::MalformedCandle { reason, .. } => {
                StructureError::MalformedCandle { index, reason }
            }
            other => other,
        })?;
        Ok(candle)
    }
}

/// Parse a datetime string into epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM:SS`, bare
/// dates and integer epochs (seconds below 1e11, milliseconds above).
pub fn parse_datetime(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        let n: i64 = s.parse().ok()?;
        return Some(if n < 100_000_000_000 { n * 1000 } else { n });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Format epoch milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

// ============================================================
// CANDLE SERIES
// ============================================================

/// Order in which the caller supplies bars
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Immutable, oldest-first candle sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build from any OHLC bars in the declared order.
    ///
    /// Bars without a timestamp get their oldest-first position as timestamp.
    /// Invalid bars (NaN, infinite, high/low inconsistent with the body) are
    /// dropped.
    pub fn from_bars<T: OHLC>(bars: &[T], order: SeriesOrder) -> Self {
        let len = bars.len();
        let mut skipped = 0usize;
        let mut candles = Vec::with_capacity(len);

        for pos in 0..len {
            let (bar, age_rank) = match order {
                SeriesOrder::OldestFirst => (&bars[pos], pos),
                SeriesOrder::NewestFirst => (&bars[len - 1 - pos], pos),
            };
            if bar.validate().is_err() {
                skipped += 1;
                continue;
            }
            candles.push(Candle::new(
                bar.timestamp().unwrap_or(age_rank as i64),
                bar.open(),
                bar.high(),
                bar.low(),
                bar.close(),
            ));
        }

        if skipped > 0 {
            tracing::warn!(skipped, total = len, "Dropped invalid bars");
        }
        Self { candles }
    }

    /// Build from already-typed candles in the declared order, dropping invalid ones.
    pub fn from_candles(candles: Vec<Candle>, order: SeriesOrder) -> Self {
        Self::from_bars(&candles, order)
    }

    /// Lenient construction from external rows: malformed rows are skipped and
    /// the remainder is sorted by timestamp, so either input order works.
    pub fn from_rows(rows: &[CandleRow]) -> Self {
        let mut candles = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match row.to_candle(index) {
                Ok(candle) => candles.push(candle),
                Err(error) => tracing::warn!(%error, "Skipping malformed candle row"),
            }
        }
        candles.sort_by_key(|c| c.timestamp);
        Self { candles }
    }

    /// Strict construction from external rows: the first malformed row is an error.
    pub fn try_from_rows(rows: &[CandleRow]) -> Result<Self> {
        let mut candles = rows
            .iter()
            .enumerate()
            .map(|(index, row)| row.to_candle(index))
            .collect::<Result<Vec<_>>>()?;
        candles.sort_by_key(|c| c.timestamp);
        Ok(Self { candles })
    }

    #[inline]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    #[inline]
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// `(prev, last)` - the two most recent bars
    pub fn last_two(&self) -> Option<(&Candle, &Candle)> {
        match self.candles.as_slice() {
            [.., prev, last] => Some((prev, last)),
            _ => None,
        }
    }

    /// Most recent `n` bars (all of them if fewer)
    pub fn tail(&self, n: usize) -> &[Candle] {
        &self.candles[self.candles.len().saturating_sub(n)..]
    }

    /// New series made of the most recent `n` bars
    pub fn tail_series(&self, n: usize) -> Self {
        Self {
            candles: self.tail(n).to_vec(),
        }
    }

    /// New series of bars with `timestamp >= from`
    pub fn since(&self, from: i64) -> Self {
        let start = self.candles.partition_point(|c| c.timestamp < from);
        Self {
            candles: self.candles[start..].to_vec(),
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Error unless the series holds at least `need` bars
    pub fn ensure_len(&self, need: usize) -> Result<()> {
        if self.candles.len() < need {
            return Err(StructureError::InsufficientData {
                need,
                got: self.candles.len(),
            });
        }
        Ok(())
    }
}

// ============================================================
// TIMEFRAMES & RESAMPLING
// ============================================================

/// Chart timeframes with their own tolerance presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Timeframe {
    M5,
    M15,
    H1,
    H4,
    D1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    /// Bar duration in milliseconds
    pub const fn duration_ms(self) -> i64 {
        match self {
            Timeframe::M5 => 5 * 60_000,
            Timeframe::M15 => 15 * 60_000,
            Timeframe::H1 => 3_600_000,
            Timeframe::H4 => 4 * 3_600_000,
            Timeframe::D1 => 86_400_000,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m5" | "5m" | "5min" => Ok(Timeframe::M5),
            "m15" | "15m" | "15min" => Ok(Timeframe::M15),
            "h1" | "1h" | "60m" | "60min" => Ok(Timeframe::H1),
            "h4" | "4h" => Ok(Timeframe::H4),
            "d1" | "1d" | "1day" => Ok(Timeframe::D1),
            _ => Err(StructureError::InvalidConfig(format!(
                "unknown timeframe '{s}', expected one of M5/M15/H1/H4/D1"
            ))),
        }
    }
}

/// Aggregate a series into `timeframe` buckets aligned on epoch multiples.
///
/// Bucket open is the first bar's open, high/low the extremes, close the last
/// bar's close; the bucket start is the timestamp. Empty buckets are skipped.
pub fn resample(series: &CandleSeries, timeframe: Timeframe) -> CandleSeries {
    let width = timeframe.duration_ms();
    let mut out: Vec<Candle> = Vec::with_capacity(series.len() / 2 + 1);

    for bar in series.candles() {
        let bucket = bar.timestamp.div_euclid(width) * width;
        match out.last_mut() {
            Some(agg) if agg.timestamp == bucket => {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
            }
            _ => out.push(Candle::new(bucket, bar.open, bar.high, bar.low, bar.close)),
        }
    }

    CandleSeries { candles: out }
}

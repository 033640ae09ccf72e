//! # market-structure
//!
//! Market structure analysis for OHLC candle series: swing pivots,
//! support/resistance levels, trendlines, order blocks and breakout/retest
//! trading signals.
//!
//! ## Quick Start
//!
//! ```rust
//! use market_structure::prelude::*;
//!
//! // Oldest-first bars, one per minute
//! let candles: Vec<Candle> = (0..60i64)
//!     .map(|i| {
//!         let mid = 100.0 + (i as f64 * 0.5).sin() * 5.0;
//!         Candle::new(i * 60_000, mid - 0.2, mid + 1.0, mid - 1.0, mid + 0.2)
//!     })
//!     .collect();
//! let series = CandleSeries::from_bars(&candles, SeriesOrder::OldestFirst);
//!
//! let analyzer = AnalyzerBuilder::new().build().unwrap();
//!
//! // Structure only: no lower-timeframe candles, so no signal
//! let result = analyzer.analyze(&series, None);
//! assert!(result.signal.is_none());
//! assert!(!result.levels.resistance.is_empty());
//! ```
//!
//! Every stage is also available as a free function ([`find_pivots`],
//! [`cluster_levels`], [`detect_trendlines`], [`detect_order_blocks`]) and as a
//! configurable stage struct. No analysis entry point returns an error:
//! insufficient data yields empty results and a `WAIT` signal. Errors are
//! reserved for configuration validation and strict series construction.

pub mod analysis;
pub mod config;
pub mod params;
pub mod result;
pub mod series;

pub mod prelude {
    pub use crate::{
        // Stages
        analysis::*,
        // Configuration
        config::{AnalysisConfig, BoxSource, TimeframeTable, ToleranceBand},
        // Parameters
        params::{get_count, get_period, get_price, get_ratio, ParamMeta, ParamType, ParameterizedStage},
        // Output
        result::{LevelSet, StructureResult, TrendlineSet},
        // Data model
        series::{resample, Candle, CandleRow, CandleSeries, SeriesOrder, Timeframe},
        // Parallel
        analyze_parallel,
        AnalysisReport,
        // Engine
        AnalyzerBuilder,
        StructureAnalyzer,
        // Core traits
        OHLCExt,
        StageConfig,
        OHLC,
        // Validated types
        Period,
        Ratio,
        // Errors
        Result,
        StructureError,
    };
}

pub use analysis::{cluster_levels, detect_order_blocks, detect_trendlines, find_pivots};

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, StructureError>;

/// Errors from configuration validation and strict data construction.
///
/// Analysis itself never fails; these only surface from builders, config
/// loading and [`series::CandleSeries::try_from_rows`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum StructureError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {need} bars, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Malformed candle at index {index}: {reason}")]
    MalformedCandle { index: usize, reason: &'static str },

    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(StructureError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(StructureError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

/// Bar count (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(StructureError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLC TRAITS
// ============================================================

/// Core OHLC data trait
pub trait OHLC {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    /// Epoch milliseconds, if the bar carries one
    fn timestamp(&self) -> Option<i64> {
        None
    }
}

impl<T: OHLC> OHLC for &T {
    fn open(&self) -> f64 {
        (*self).open()
    }

    fn high(&self) -> f64 {
        (*self).high()
    }

    fn low(&self) -> f64 {
        (*self).low()
    }

    fn close(&self) -> f64 {
        (*self).close()
    }

    fn timestamp(&self) -> Option<i64> {
        (*self).timestamp()
    }
}

/// Extension trait with computed properties for OHLC data
pub trait OHLCExt: OHLC {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    /// Green candle
    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    /// Red candle
    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Body as fraction of range; 0.0 for a zero-range bar
    #[inline]
    fn body_ratio(&self) -> f64 {
        let range = self.range();
        if range > 0.0 {
            self.body() / range
        } else {
            0.0
        }
    }

    /// Position of the close inside the bar range (0 = low, 1 = high)
    #[inline]
    fn close_position(&self) -> Option<f64> {
        let range = self.range();
        (range > 0.0).then(|| (self.close() - self.low()) / range)
    }

    /// Validate OHLC consistency: finite prices, high/low enclosing the body
    fn validate(&self) -> Result<()> {
        let prices = [self.open(), self.high(), self.low(), self.close()];
        if prices.iter().any(|p| p.is_nan()) {
            return Err(StructureError::MalformedCandle {
                index: 0,
                reason: "NaN in OHLC",
            });
        }
        if prices.iter().any(|p| p.is_infinite()) {
            return Err(StructureError::MalformedCandle {
                index: 0,
                reason: "Infinite value in OHLC",
            });
        }
        if self.high() < self.open().max(self.close()) {
            return Err(StructureError::MalformedCandle {
                index: 0,
                reason: "high below body",
            });
        }
        if self.low() > self.open().min(self.close()) {
            return Err(StructureError::MalformedCandle {
                index: 0,
                reason: "low above body",
            });
        }
        Ok(())
    }
}

impl<T: OHLC> OHLCExt for T {}

// ============================================================
// STAGE CONFIGURATION TRAIT
// ============================================================

/// Common surface of every configurable analysis stage
pub trait StageConfig {
    fn stage_name(&self) -> &'static str;

    fn validate_config(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================
// STRUCTURE ANALYZER
// ============================================================

use analysis::{BreakoutBox, Pivots, Signal, ZoneScanOutcome};
use config::{AnalysisConfig, BoxSource};
use result::{LevelSet, StructureResult, TrendlineSet};
use series::{CandleSeries, Timeframe};

/// Runs the whole pipeline with one validated configuration.
///
/// Stateless: every call recomputes from the given candles, so one analyzer
/// can be shared across threads.
#[derive(Debug, Clone)]
pub struct StructureAnalyzer {
    config: AnalysisConfig,
}

impl StructureAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // ===========================================
    // LOW-LEVEL: Individual stages
    // ===========================================

    pub fn pivots(&self, series: &CandleSeries) -> Pivots {
        self.config.pivots.detect(series)
    }

    /// Resistance from swing highs, support from swing lows
    pub fn levels(&self, pivots: &Pivots, band: f64) -> LevelSet {
        let clusterer = &self.config.levels;
        LevelSet {
            resistance: clusterer.cluster_with_band(&pivots.high_prices(), band),
            support: clusterer.cluster_with_band(&pivots.low_prices(), band),
        }
    }

    /// Up lines through swing lows, down lines through swing highs
    pub fn trendlines(&self, pivots: &Pivots, tolerance: f64) -> TrendlineSet {
        let fitter = &self.config.trendlines;
        TrendlineSet {
            up: fitter.fit_with_tolerance(&pivots.lows, tolerance),
            down: fitter.fit_with_tolerance(&pivots.highs, tolerance),
        }
    }

    pub fn order_blocks(&self, series: &CandleSeries, pivots: &Pivots) -> Vec<analysis::OrderBlock> {
        self.config.order_blocks.detect(series, pivots)
    }

    /// Breakout box for the configured [`BoxSource`].
    ///
    /// `None` when the series is too short or no level brackets the price.
    pub fn breakout_box(
        &self,
        series: &CandleSeries,
        levels: &LevelSet,
        lower_tf: &CandleSeries,
    ) -> Option<BreakoutBox> {
        match self.config.box_source {
            BoxSource::LastCandle => series.last().map(BreakoutBox::from_candle),
            BoxSource::PreviousCandle => series.last_two().map(|(prev, _)| BreakoutBox::from_candle(prev)),
            BoxSource::Levels => {
                let (prev, _) = lower_tf.last_two()?;
                BreakoutBox::from_levels(levels, prev.close)
            }
        }
    }

    pub fn signal(&self, bx: &BreakoutBox, lower_tf: &CandleSeries) -> Signal {
        self.config.breakout.analyze(bx, lower_tf)
    }

    // ===========================================
    // HIGH-LEVEL: Full pipeline
    // ===========================================

    /// Full analysis with the configured band and tolerance.
    ///
    /// `lower_tf` are the recent lower-timeframe candles; without them the
    /// result carries no signal.
    pub fn analyze(&self, series: &CandleSeries, lower_tf: Option<&CandleSeries>) -> StructureResult {
        self.analyze_with(
            series,
            lower_tf,
            self.config.levels.band,
            self.config.trendlines.tolerance,
        )
    }

    /// Full analysis using the timeframe table's band and tolerance
    pub fn analyze_timeframe(
        &self,
        timeframe: Timeframe,
        series: &CandleSeries,
        lower_tf: Option<&CandleSeries>,
    ) -> StructureResult {
        let preset = self.config.timeframes.get(timeframe);
        tracing::debug!(%timeframe, band = preset.band, tol = preset.tol, "Using timeframe preset");
        self.analyze_with(series, lower_tf, preset.band, preset.tol)
    }

    /// Multi-timeframe zone breakout scan over M5 candles
    pub fn scan_zones(&self, m5: &CandleSeries) -> ZoneScanOutcome {
        self.config.zone_scan.scan(m5)
    }

    fn analyze_with(
        &self,
        series: &CandleSeries,
        lower_tf: Option<&CandleSeries>,
        band: f64,
        tolerance: f64,
    ) -> StructureResult {
        if let Err(err) = series.ensure_len(self.config.pivots.min_bars()) {
            tracing::debug!(%err, "Series too short for swing structure");
        }
        let pivots = self.pivots(series);
        let levels = self.levels(&pivots, band);
        let trendlines = self.trendlines(&pivots, tolerance);
        let order_blocks = self.order_blocks(series, &pivots);

        let signal = lower_tf.map(|lower| {
            self.breakout_box(series, &levels, lower)
                .map(|bx| self.signal(&bx, lower))
                .unwrap_or(Signal::Wait)
        });

        tracing::debug!(
            bars = series.len(),
            pivot_highs = pivots.highs.len(),
            pivot_lows = pivots.lows.len(),
            resistance = levels.resistance.len(),
            support = levels.support.len(),
            up_lines = trendlines.up.len(),
            down_lines = trendlines.down.len(),
            order_blocks = order_blocks.len(),
            signal = ?signal.as_ref().map(Signal::status),
            "Structure analysis complete"
        );

        StructureResult {
            levels,
            trendlines,
            order_blocks,
            signal,
        }
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for [`StructureAnalyzer`] instances
#[derive(Debug, Clone, Default)]
pub struct AnalyzerBuilder {
    config: AnalysisConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a complete configuration
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Pivot window sizes on each side
    pub fn pivot_window(mut self, left: usize, right: usize) -> Result<Self> {
        self.config.pivots.left = Period::new(left)?;
        self.config.pivots.right = Period::new(right)?;
        Ok(self)
    }

    /// Level clustering band (price units)
    pub fn band(mut self, band: f64) -> Self {
        self.config.levels.band = band;
        self
    }

    /// Trendline inlier tolerance (price units)
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.trendlines.tolerance = tolerance;
        self
    }

    /// Order-block lookback in bars
    pub fn lookback(mut self, lookback: usize) -> Result<Self> {
        self.config.order_blocks.lookback = Period::new(lookback)?;
        Ok(self)
    }

    pub fn breakout(mut self, engine: analysis::BreakoutSignalEngine) -> Self {
        self.config.breakout = engine;
        self
    }

    pub fn box_source(mut self, source: BoxSource) -> Self {
        self.config.box_source = source;
        self
    }

    pub fn timeframes(mut self, table: config::TimeframeTable) -> Self {
        self.config.timeframes = table;
        self
    }

    pub fn zone_scan(mut self, zone_scan: analysis::ZoneScanConfig) -> Self {
        self.config.zone_scan = zone_scan;
        self
    }

    /// Build the analyzer, validating every stage
    pub fn build(self) -> Result<StructureAnalyzer> {
        StructureAnalyzer::new(self.config)
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Result of analyzing a single instrument
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub result: StructureResult,
}

/// Analyze many instruments in parallel.
///
/// Each item is `(symbol, series, lower-timeframe candles)`. Output order
/// follows input order.
pub fn analyze_parallel<'a, I>(analyzer: &StructureAnalyzer, instruments: I) -> Vec<AnalysisReport>
where
    I: IntoParallelIterator<Item = (&'a str, &'a CandleSeries, Option<&'a CandleSeries>)>,
{
    instruments
        .into_par_iter()
        .map(|(symbol, series, lower_tf)| AnalysisReport {
            symbol: symbol.to_string(),
            result: analyzer.analyze(series, lower_tf),
        })
        .collect()
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{SignalStatus, Side};
    use crate::series::{Candle, SeriesOrder};

    /// Test OHLC bar without timestamp
    #[derive(Debug, Clone)]
    struct Bar {
        o: f64,
        h: f64,
        l: f64,
        c: f64,
    }

    impl Bar {
        fn new(o: f64, h: f64, l: f64, c: f64) -> Self {
            Self { o, h, l, c }
        }
    }

    impl OHLC for Bar {
        fn open(&self) -> f64 {
            self.o
        }

        fn high(&self) -> f64 {
            self.h
        }

        fn low(&self) -> f64 {
            self.l
        }

        fn close(&self) -> f64 {
            self.c
        }
    }

    fn wave_series(n: i64) -> CandleSeries {
        let candles: Vec<Candle> = (0..n)
            .map(|i| {
                let mid = 100.0 + (i as f64 * 0.4).sin() * 8.0;
                Candle::new(i * 3_600_000, mid - 0.3, mid + 1.0, mid - 1.0, mid + 0.3)
            })
            .collect();
        CandleSeries::from_bars(&candles, SeriesOrder::OldestFirst)
    }

    fn lower(closes: &[f64]) -> CandleSeries {
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i as i64 * 300_000, c, c + 0.1, c - 0.1, c))
            .collect();
        CandleSeries::from_bars(&candles, SeriesOrder::OldestFirst)
    }

    #[test]
    fn test_ratio_validation() {
        assert!(Ratio::new(0.0).is_ok());
        assert!(Ratio::new(1.0).is_ok());
        assert!(Ratio::new(0.5).is_ok());
        assert!(Ratio::new(-0.1).is_err());
        assert!(Ratio::new(1.1).is_err());
        assert!(Ratio::new(f64::NAN).is_err());
        assert!(Ratio::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(100).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_ohlc_ext() {
        let bar = Bar::new(100.0, 110.0, 90.0, 105.0);
        assert_eq!(bar.body(), 5.0);
        assert_eq!(bar.range(), 20.0);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
        assert!((bar.body_ratio() - 0.25).abs() < 1e-9);
        assert!((bar.close_position().unwrap() - 0.75).abs() < 1e-9);
        assert!(bar.validate().is_ok());
        assert!(Bar::new(100.0, 99.0, 90.0, 95.0).validate().is_err());
        assert!(Bar::new(100.0, 110.0, 101.0, 105.0).validate().is_err());
        assert_eq!(Bar::new(1.0, 1.0, 1.0, 1.0).body_ratio(), 0.0);
    }

    #[test]
    fn test_builder_defaults() {
        assert!(AnalyzerBuilder::new().build().is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        assert!(AnalyzerBuilder::new().pivot_window(0, 2).is_err());
        assert!(AnalyzerBuilder::new().band(-1.0).build().is_err());
        assert!(AnalyzerBuilder::new().tolerance(f64::NAN).build().is_err());
    }

    #[test]
    fn test_empty_series_analysis() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let empty = CandleSeries::default();
        let result = analyzer.analyze(&empty, Some(&empty));

        assert!(result.levels.resistance.is_empty());
        assert!(result.levels.support.is_empty());
        assert!(result.trendlines.up.is_empty());
        assert!(result.trendlines.down.is_empty());
        assert!(result.order_blocks.is_empty());
        assert_eq!(result.signal, Some(Signal::Wait));
    }

    #[test]
    fn test_analyze_wave_finds_structure() {
        let analyzer = AnalyzerBuilder::new()
            .pivot_window(2, 2)
            .unwrap()
            .band(2.0)
            .build()
            .unwrap();
        let result = analyzer.analyze(&wave_series(120), None);

        assert!(!result.levels.resistance.is_empty());
        assert!(!result.levels.support.is_empty());
        assert!(result.signal.is_none());
        let top = &result.levels.resistance[0];
        assert!(top.price > 105.0, "resistance near the wave top, got {}", top.price);
    }

    #[test]
    fn test_previous_candle_box_breakout() {
        // Previous H1 bar spans 95..=105; the M5 closes cross 105
        let series = CandleSeries::from_bars(
            &[
                Candle::new(0, 100.0, 105.0, 95.0, 101.0),
                Candle::new(3_600_000, 101.0, 103.0, 100.0, 102.0),
            ],
            SeriesOrder::OldestFirst,
        );
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let result = analyzer.analyze(&series, Some(&lower(&[104.0, 105.5])));

        let signal = result.signal.unwrap();
        assert_eq!(signal.status(), SignalStatus::EntryReady);
        assert_eq!(signal.side(), Some(Side::Long));
        assert_eq!(signal.plan().unwrap().entry, 105.0);
    }

    #[test]
    fn test_levels_box_source() {
        let analyzer = AnalyzerBuilder::new()
            .pivot_window(2, 2)
            .unwrap()
            .box_source(BoxSource::Levels)
            .build()
            .unwrap();
        let series = wave_series(120);
        let result = analyzer.analyze(&series, None);
        let top = result
            .levels
            .resistance
            .iter()
            .map(|l| l.price)
            .fold(f64::MIN, f64::max);

        // Far above every level: no resistance above the reference, so WAIT
        let result = analyzer.analyze(&series, Some(&lower(&[top + 50.0, top + 51.0])));
        assert_eq!(result.signal, Some(Signal::Wait));
    }

    #[test]
    fn test_analyze_timeframe_uses_preset() {
        let analyzer = AnalyzerBuilder::new().pivot_window(2, 2).unwrap().build().unwrap();
        let series = wave_series(120);
        let h1 = analyzer.analyze_timeframe(Timeframe::H1, &series, None);

        let preset = config::TimeframeTable::default().get(Timeframe::H1);
        let explicit = AnalyzerBuilder::new()
            .pivot_window(2, 2)
            .unwrap()
            .band(preset.band)
            .tolerance(preset.tol)
            .build()
            .unwrap();
        assert_eq!(h1, explicit.analyze(&series, None));
        assert!(!h1.levels.resistance.is_empty());
    }

    #[test]
    fn test_parallel_analysis() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let a = wave_series(80);
        let b = wave_series(40);
        let m5 = lower(&[100.0, 100.5]);

        let instruments: Vec<(&str, &CandleSeries, Option<&CandleSeries>)> =
            vec![("XAUUSD", &a, Some(&m5)), ("EURUSD", &b, None)];
        let reports = analyze_parallel(&analyzer, instruments);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].symbol, "XAUUSD");
        assert!(reports[0].result.signal.is_some());
        assert!(reports[1].result.signal.is_none());
        assert_eq!(reports[1].result, analyzer.analyze(&b, None));
    }

    #[test]
    fn test_bars_without_timestamps() {
        let bars = vec![
            Bar::new(10.0, 11.0, 9.0, 10.5),
            Bar::new(10.5, 12.0, 10.0, 11.5),
            Bar::new(11.5, 11.6, 8.0, 8.5),
        ];
        let series = CandleSeries::from_bars(&bars, SeriesOrder::NewestFirst);
        assert_eq!(series.len(), 3);
        assert_eq!(series.candles()[0].close, 8.5);
        assert_eq!(series.candles()[0].timestamp, 0);
        assert_eq!(series.candles()[2].timestamp, 2);
    }
}

//! Analysis configuration
//!
//! One [`AnalysisConfig`] composes every stage configuration. All fields have
//! defaults, so a TOML file only needs the values it changes:
//!
//! ```toml
//! box_source = "levels"
//!
//! [pivots]
//! left = 5
//! right = 5
//!
//! [breakout]
//! point_size = 0.1
//! entry = "last_close"
//!
//! [timeframes.h1]
//! band = 3.5
//! tol = 2.5
//! ```

use crate::{
    analysis::{BreakoutSignalEngine, LevelClusterer, OrderBlockDetector, PivotDetector, TrendlineFitter, ZoneScanConfig},
    params::check_price,
    series::Timeframe,
    Result, StageConfig, StructureError,
};

/// Source of the breakout box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxSource {
    /// High/low of the last closed higher-timeframe candle
    #[default]
    PreviousCandle,
    /// High/low of the newest higher-timeframe candle
    LastCandle,
    /// Nearest resistance above and support below the reference price, which
    /// is the close of the second-newest lower-timeframe candle
    Levels,
}

/// Level band and trendline tolerance for one timeframe
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToleranceBand {
    pub band: f64,
    pub tol: f64,
}

impl ToleranceBand {
    pub const fn new(band: f64, tol: f64) -> Self {
        Self { band, tol }
    }

    fn validate(&self, timeframe: Timeframe) -> Result<()> {
        check_price(&format!("timeframes.{}.band", timeframe.as_str().to_lowercase()), self.band)?;
        check_price(&format!("timeframes.{}.tol", timeframe.as_str().to_lowercase()), self.tol)
    }
}

/// Per-timeframe presets, wider for slower charts
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimeframeTable {
    pub m5: ToleranceBand,
    pub m15: ToleranceBand,
    pub h1: ToleranceBand,
    pub h4: ToleranceBand,
    pub d1: ToleranceBand,
}

impl Default for TimeframeTable {
    fn default() -> Self {
        Self {
            m5: ToleranceBand::new(1.5, 1.0),
            m15: ToleranceBand::new(2.5, 1.5),
            h1: ToleranceBand::new(4.0, 3.0),
            h4: ToleranceBand::new(8.0, 6.0),
            d1: ToleranceBand::new(15.0, 10.0),
        }
    }
}

impl TimeframeTable {
    pub fn get(&self, timeframe: Timeframe) -> ToleranceBand {
        match timeframe {
            Timeframe::M5 => self.m5,
            Timeframe::M15 => self.m15,
            Timeframe::H1 => self.h1,
            Timeframe::H4 => self.h4,
            Timeframe::D1 => self.d1,
        }
    }

    pub fn set(&mut self, timeframe: Timeframe, preset: ToleranceBand) {
        match timeframe {
            Timeframe::M5 => self.m5 = preset,
            Timeframe::M15 => self.m15 = preset,
            Timeframe::H1 => self.h1 = preset,
            Timeframe::H4 => self.h4 = preset,
            Timeframe::D1 => self.d1 = preset,
        }
    }
}

/// Complete analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub box_source: BoxSource,
    pub pivots: PivotDetector,
    pub levels: LevelClusterer,
    pub trendlines: TrendlineFitter,
    pub order_blocks: OrderBlockDetector,
    pub breakout: BreakoutSignalEngine,
    pub zone_scan: ZoneScanConfig,
    pub timeframes: TimeframeTable,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| StructureError::ConfigParse(e.to_string()))?;
        config.validate()?;
        tracing::debug!(box_source = ?config.box_source, "Loaded analysis config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| StructureError::ConfigParse(e.to_string()))
    }

    /// Validate every stage
    pub fn validate(&self) -> Result<()> {
        let stages: [&dyn StageConfig; 6] = [
            &self.pivots,
            &self.levels,
            &self.trendlines,
            &self.order_blocks,
            &self.breakout,
            &self.zone_scan,
        ];
        for stage in stages {
            stage.validate_config().inspect_err(|error| {
                tracing::warn!(stage = stage.stage_name(), %error, "Invalid stage configuration");
            })?;
        }
        for timeframe in Timeframe::ALL {
            self.timeframes.get(timeframe).validate(timeframe)?;
        }
        Ok(())
    }
}

//! Market structure analysis stages
//!
//! # Pipeline
//!
//! - **pivots**: strict windowed swing highs/lows
//! - **levels**: greedy single-pass clustering of pivot prices
//! - **trendlines**: pairwise line fitting with inlier tolerance
//! - **order_blocks**: last opposite-colored candle before a break of structure
//! - **breakout**: stateless WAIT / BREAKOUT / ENTRY_READY classifier
//!
//! Supporting modules: **indicators** (ATR, EMA), **confirm** (confirmation
//! candles) and **zone_scan** (H1 zone → M15 breakout → M5 retest scan).

pub mod helpers;

/// Generate `with_defaults()` -> `Self::default()` for multiple stage types.
macro_rules! impl_with_defaults {
  ($($stage:ty),* $(,)?) => {
    $(impl $stage {
      pub fn with_defaults() -> Self { Self::default() }
    })*
  };
}

pub mod breakout;
pub mod confirm;
pub mod indicators;
pub mod levels;
pub mod order_blocks;
pub mod pivots;
pub mod trendlines;
pub mod zone_scan;

pub use breakout::*;
pub use confirm::*;
pub use helpers::*;
pub use indicators::*;
pub use levels::*;
pub use order_blocks::*;
pub use pivots::*;
pub use trendlines::*;
pub use zone_scan::*;

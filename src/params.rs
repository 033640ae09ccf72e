//! Parameter metadata for analysis stages
//!
//! Every configurable stage describes its numeric parameters, enabling:
//! - Grid search over pivot windows, bands and tolerances
//! - Parameter documentation
//! - Construction from loosely-typed key/value maps
//!
//! # Example
//!
//! ```rust
//! use market_structure::params::{ParamMeta, ParameterizedStage};
//! use market_structure::prelude::*;
//!
//! for param in LevelClusterer::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{Period, Ratio, Result, StructureError};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Ratio value in 0.0..=1.0
  Ratio,
  /// Period value (positive integer)
  Period,
  /// Count value (non-negative integer, zero allowed)
  Count,
  /// Price distance or point count (finite, non-negative)
  Price,
}

/// Metadata for a single stage parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "band")
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn ratio(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Ratio, default, range, description }
  }

  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  pub const fn count(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Count, default, range, description }
  }

  pub const fn price(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Price, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    if step <= 0.0 {
      return vec![min];
    }
    let steps = ((max - min) / step + 1e-9).floor() as usize;
    (0..=steps).map(|i| min + step * i as f64).collect()
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if !value.is_finite() {
      return Err(StructureError::InvalidValue("parameter must be finite"));
    }
    if value < min || value > max {
      return Err(StructureError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Ratio | ParamType::Price => Ok(()),
      ParamType::Period | ParamType::Count => {
        if value.fract() != 0.0 {
          return Err(StructureError::InvalidValue("integer parameter has a fractional part"));
        }
        if self.param_type == ParamType::Period && value < 1.0 {
          return Err(StructureError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED STAGE TRAIT
// ============================================================

/// Stages constructible from a name → value map.
///
/// Missing parameters use their default values; non-numeric settings
/// (strategy variants) keep their defaults.
pub trait ParameterizedStage: Sized {
  fn param_meta() -> &'static [ParamMeta];

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;

  /// Enumerate every combination of the parameter grids.
  ///
  /// Combinations rejected by [`ParameterizedStage::with_params`] are skipped.
  fn grid() -> Vec<Self> {
    let metas = Self::param_meta();
    let grids: Vec<Vec<f64>> = metas.iter().map(ParamMeta::generate_grid).collect();
    let mut combos: Vec<Vec<f64>> = vec![Vec::new()];
    for grid in &grids {
      combos = combos
        .into_iter()
        .flat_map(|prefix| {
          grid.iter().map(move |v| {
            let mut next = prefix.clone();
            next.push(*v);
            next
          })
        })
        .collect();
    }
    combos
      .into_iter()
      .filter_map(|values| {
        let params: HashMap<&str, f64> =
          metas.iter().map(|m| m.name).zip(values).collect();
        Self::with_params(&params).ok()
      })
      .collect()
  }
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

pub fn get_ratio(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Ratio> {
  let value = params.get(key).copied().unwrap_or(default);
  Ratio::new(value)
}

pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if !value.is_finite() || value < 1.0 {
    return Err(StructureError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

pub fn get_count(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<usize> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if !value.is_finite() || value < 0.0 {
    return Err(StructureError::InvalidValue("count must be a non-negative integer"));
  }
  Ok(value as usize)
}

/// Finite, non-negative price distance (or point count)
pub fn get_price(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<f64> {
  let value = params.get(key).copied().unwrap_or(default);
  check_price(key, value)?;
  Ok(value)
}

pub(crate) fn check_price(field: &str, value: f64) -> Result<()> {
  if !value.is_finite() || value < 0.0 {
    return Err(StructureError::InvalidConfig(format!(
      "{field} must be a finite non-negative number, got {value}"
    )));
  }
  Ok(())
}

// ============================================================
// TESTS
// ============================================================

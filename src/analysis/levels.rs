//! Support/resistance level clustering
//!
//! Prices are sorted and merged in one greedy pass: a price joins the current
//! cluster when it sits within `band` of the previous price, otherwise it
//! opens a new cluster. Members are never reassigned.

use std::collections::HashMap;

use super::helpers::{mean, serialize_price};
use crate::{
    params::{check_price, get_count, get_price, ParamMeta, ParameterizedStage},
    Result, StageConfig, StructureError,
};

impl_with_defaults!(LevelClusterer);

/// Representative price of a cluster and its member count
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Level {
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    #[serde(rename = "hits")]
    pub touch_count: usize,
}

/// Cluster `prices` into levels.
///
/// Clusters with fewer than `min_hits` members are dropped. Output is sorted
/// by touch count (descending) then price (ascending) and truncated to
/// `max_levels`. Non-finite prices are ignored.
pub fn cluster_levels(prices: &[f64], band: f64, min_hits: usize, max_levels: usize) -> Vec<Level> {
    let mut levels: Vec<Level> = greedy_clusters(prices, band)
        .iter()
        .filter(|members| members.len() >= min_hits)
        .filter_map(|members| {
            Some(Level {
                price: mean(members)?,
                touch_count: members.len(),
            })
        })
        .collect();

    levels.sort_by(|a, b| {
        b.touch_count
            .cmp(&a.touch_count)
            .then_with(|| a.price.total_cmp(&b.price))
    });
    levels.truncate(max_levels);
    levels
}

/// Number of clusters before the `min_hits` filter
pub fn cluster_count(prices: &[f64], band: f64) -> usize {
    greedy_clusters(prices, band).len()
}

fn greedy_clusters(prices: &[f64], band: f64) -> Vec<Vec<f64>> {
    let mut sorted: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let mut clusters: Vec<Vec<f64>> = Vec::new();
    let mut previous: Option<f64> = None;
    for price in sorted {
        match (clusters.last_mut(), previous) {
            (Some(current), Some(prev)) if price - prev <= band => current.push(price),
            _ => clusters.push(vec![price]),
        }
        previous = Some(price);
    }
    clusters
}

// ============================================================
// STAGE
// ============================================================

/// Level clusterer configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LevelClusterer {
    /// Maximum gap between neighbouring prices of one cluster
    pub band: f64,
    pub min_hits: usize,
    pub max_levels: usize,
}

impl Default for LevelClusterer {
    fn default() -> Self {
        Self {
            band: 2.0,
            min_hits: 2,
            max_levels: 5,
        }
    }
}

impl LevelClusterer {
    pub fn cluster(&self, prices: &[f64]) -> Vec<Level> {
        self.cluster_with_band(prices, self.band)
    }

    /// Cluster with an overriding band (timeframe presets)
    pub fn cluster_with_band(&self, prices: &[f64], band: f64) -> Vec<Level> {
        cluster_levels(prices, band, self.min_hits, self.max_levels)
    }
}

impl StageConfig for LevelClusterer {
    fn stage_name(&self) -> &'static str {
        "levels"
    }

    fn validate_config(&self) -> Result<()> {
        check_price("levels.band", self.band)?;
        if self.max_levels == 0 {
            return Err(StructureError::InvalidConfig(
                "levels.max_levels must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

static LEVEL_PARAMS: &[ParamMeta] = &[
    ParamMeta::price("band", 2.0, (0.5, 5.0, 0.5), "Clustering band in price units"),
    ParamMeta::count("min_hits", 2.0, (1.0, 4.0, 1.0), "Minimum pivots per level"),
    ParamMeta::count("max_levels", 5.0, (3.0, 8.0, 1.0), "Levels kept per side"),
];

impl ParameterizedStage for LevelClusterer {
    fn param_meta() -> &'static [ParamMeta] {
        LEVEL_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let stage = Self {
            band: get_price(params, "band", 2.0)?,
            min_hits: get_count(params, "min_hits", 2)?,
            max_levels: get_count(params, "max_levels", 5)?,
        };
        stage.validate_config()?;
        Ok(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tight_cluster_and_singleton_dropped() {
        let levels = cluster_levels(&[100.0, 100.2, 100.1, 150.0], 0.5, 2, 5);
        assert_eq!(levels.len(), 1);
        assert!((levels[0].price - 100.1).abs() < 1e-9);
        assert_eq!(levels[0].touch_count, 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_levels(&[], 1.0, 1, 5).is_empty());
        assert_eq!(cluster_count(&[], 1.0), 0);
    }

    #[test]
    fn test_chained_merge_uses_previous_price() {
        // each gap is 0.4 <= band even though the ends are 1.2 apart
        let levels = cluster_levels(&[1.0, 1.4, 1.8, 2.2], 0.5, 1, 5);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].touch_count, 4);
    }

    #[test]
    fn test_ordering_and_truncation() {
        let prices = [10.0, 10.1, 20.0, 20.1, 30.0, 30.1, 30.2, 5.0];
        let levels = cluster_levels(&prices, 0.5, 1, 3);
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].touch_count, 3); // ~30.1
        assert!((levels[1].price - 10.05).abs() < 1e-9); // 2 hits, lower price first
        assert!((levels[2].price - 20.05).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_ignored() {
        let levels = cluster_levels(&[f64::NAN, 1.0, 1.1, f64::INFINITY], 0.5, 2, 5);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].touch_count, 2);
    }

    #[test]
    fn test_validate_config() {
        assert!(LevelClusterer::with_defaults().validate_config().is_ok());
        let bad = LevelClusterer {
            band: -0.1,
            ..Default::default()
        };
        assert!(bad.validate_config().is_err());
        let mut params = HashMap::new();
        params.insert("max_levels", 0.0);
        assert!(LevelClusterer::with_params(&params).is_err());
    }
}

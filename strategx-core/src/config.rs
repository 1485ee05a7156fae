//! Indicator pipeline configuration.
//!
//! Every field has a default, so an empty TOML document is a complete
//! configuration. `validate()` runs before any computation.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PipelineError;
use crate::indicators::EmaRibbon;

/// Errors loading or saving a configuration file (not validation).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Options recognized by `compute_indicators`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorConfig {
    /// Channel band smoothing length.
    pub channel_length: usize,
    /// Span of the long-term trend EMA.
    pub trend_ema_span: usize,
    /// Spans of the EMA ribbon, one column each.
    pub ribbon_spans: BTreeSet<usize>,
    /// Prior closes consulted by the neighbor predictor.
    pub knn_window: usize,
    /// Neighbors averaged (clamped to `knn_window`).
    pub knn_neighbors: usize,
    /// True-range averaging window.
    pub atr_length: usize,
    /// Stop distance in volatility units.
    pub atr_multiplier_sl: f64,
    /// Target distance in volatility units.
    pub atr_multiplier_tp: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            channel_length: 5,
            trend_ema_span: 200,
            ribbon_spans: EmaRibbon::DEFAULT_SPANS.into_iter().collect(),
            knn_window: 10,
            knn_neighbors: 100,
            atr_length: 14,
            atr_multiplier_sl: 2.0,
            atr_multiplier_tp: 4.0,
        }
    }
}

impl IndicatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject non-positive windows/spans and non-positive or non-finite multipliers.
    ///
    /// Reports the first offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let positive = [
            ("channel_length", self.channel_length),
            ("trend_ema_span", self.trend_ema_span),
            ("knn_window", self.knn_window),
            ("knn_neighbors", self.knn_neighbors),
            ("atr_length", self.atr_length),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(PipelineError::invalid_config(field, "must be > 0"));
            }
        }

        if self.ribbon_spans.contains(&0) {
            return Err(PipelineError::invalid_config(
                "ribbon_spans",
                "must not contain 0",
            ));
        }

        let multipliers = [
            ("atr_multiplier_sl", self.atr_multiplier_sl),
            ("atr_multiplier_tp", self.atr_multiplier_tp),
        ];
        for (field, value) in multipliers {
            if !value.is_finite() || value <= 0.0 {
                return Err(PipelineError::invalid_config(
                    field,
                    format!("must be a finite number > 0 (got {value})"),
                ));
            }
        }

        Ok(())
    }

    /// BLAKE3 hex digest of the canonical JSON form.
    ///
    /// `ribbon_spans` is an ordered set, so equal configurations hash equally.
    pub fn full_hash(&self) -> String {
        let json = serde_json::to_string(self).expect("IndicatorConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

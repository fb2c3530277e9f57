//! Engine configuration: tuning constants and the default pad seed.
//!
//! Every field has a default, so an empty JSON object (or no file at all) yields the stock
//! tuning. Values are validated once at load time; the per-frame path trusts them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::mapping::PadMapping;

/// Numeric tuning shared by every pad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    /// Upper bound of the raw smoothing control.
    pub smoothing_max: f32,
    /// Cap applied to the normalized smoothing factor (keeps the filter moving).
    pub smoothing_cap: f32,
    /// Relative-mode scale: a full sweep moves the parameter by `range * strength`.
    pub relative_strength: f32,
    /// Spread window mapped onto [0, 1] by the spread gesture.
    pub minimum_spread: f32,
    pub maximum_spread: f32,
    /// Velocity gesture scale, in output units per (normalized unit / second).
    pub velocity_scale: f32,
    /// Pressure assumed when a device reports none.
    pub default_pressure: f32,
    /// Tolerance for smoothing comparisons during template matching.
    pub template_tolerance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            smoothing_max: 1.0,
            smoothing_cap: 0.95,
            relative_strength: 0.4,
            minimum_spread: 0.05,
            maximum_spread: 0.65,
            velocity_scale: 0.5,
            default_pressure: 0.5,
            template_tolerance: 0.015,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("smoothingMax", self.smoothing_max),
            ("smoothingCap", self.smoothing_cap),
            ("relativeStrength", self.relative_strength),
            ("minimumSpread", self.minimum_spread),
            ("maximumSpread", self.maximum_spread),
            ("velocityScale", self.velocity_scale),
            ("defaultPressure", self.default_pressure),
            ("templateTolerance", self.template_tolerance),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{name} must be a finite, non-negative number (got {v})"));
            }
        }
        if self.smoothing_max <= 0.0 {
            return Err("smoothingMax must be > 0".to_string());
        }
        if self.smoothing_cap >= 1.0 {
            return Err("smoothingCap must be < 1".to_string());
        }
        if self.maximum_spread <= self.minimum_spread {
            return Err("maximumSpread must be greater than minimumSpread".to_string());
        }
        if self.default_pressure > 1.0 {
            return Err("defaultPressure must be within [0, 1]".to_string());
        }
        Ok(())
    }
}

/// Top-level engine configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub tuning: Tuning,
    /// Seed for pads created without explicit bindings.
    pub default_mapping: PadMapping,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let cfg: EngineConfig = serde_json::from_str(json)?;
        cfg.tuning.validate().map_err(|msg| MapError::InvalidConfig {
            path: PathBuf::from("<memory>"),
            msg,
        })?;
        Ok(cfg)
    }
}

/// Read and deserialize any JSON document, reporting the path on failure.
pub fn load_typed_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, MapError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate an `EngineConfig` from disk.
pub fn load_engine_config_from(path: impl AsRef<Path>) -> Result<EngineConfig, MapError> {
    let path = path.as_ref();
    let cfg: EngineConfig = load_typed_json(path)?;
    cfg.tuning.validate().map_err(|msg| MapError::InvalidConfig {
        path: path.to_path_buf(),
        msg,
    })?;
    tracing::debug!(path = %path.display(), "engine config loaded");
    Ok(cfg)
}

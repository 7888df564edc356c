//! Tolerance and behavior configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cps_core::Tolerance;
use cps_core::tolerance::{
    DEGENERATE_TOLERANCE, MERGE_TOLERANCE, NORMAL_EPSILON, PLANE_TOLERANCE, POINT_TOLERANCE,
};

/// Configuration for coplanar sketch operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Distance below which two points are the same (vertex dedup, v3 search)
    pub point_tolerance: f64,
    /// Maximum distance from the plane for an endpoint to count as on it
    pub plane_tolerance: f64,
    /// Distance below which two sketch endpoints share a vertex
    pub merge_tolerance: f64,
    /// Edges shorter than this are skipped
    pub degenerate_tolerance: f64,
    /// Lengths at or below this do not define a direction
    pub normal_epsilon: f64,
    /// Hide block constraints in the sketch UI
    pub hide_block_constraints: bool,
    /// Warn when more than this share of valid edges is coplanar
    pub coplanar_warning_ratio: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            point_tolerance: POINT_TOLERANCE,
            plane_tolerance: PLANE_TOLERANCE,
            merge_tolerance: MERGE_TOLERANCE,
            degenerate_tolerance: DEGENERATE_TOLERANCE,
            normal_epsilon: NORMAL_EPSILON,
            hide_block_constraints: true,
            coplanar_warning_ratio: 0.5,
        }
    }
}

impl SketchConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_ron_str(&content)?;
        tracing::info!("Loaded sketch configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from RON text
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Check that every tolerance is positive and the ratio is in `[0, 1]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerances = [
            ("point_tolerance", self.point_tolerance),
            ("plane_tolerance", self.plane_tolerance),
            ("merge_tolerance", self.merge_tolerance),
            ("degenerate_tolerance", self.degenerate_tolerance),
            ("normal_epsilon", self.normal_epsilon),
        ];
        for (name, value) in tolerances {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.coplanar_warning_ratio) {
            return Err(ConfigError::Invalid(format!(
                "coplanar_warning_ratio must be within [0, 1], got {}",
                self.coplanar_warning_ratio
            )));
        }
        Ok(())
    }

    pub fn point(&self) -> Tolerance {
        Tolerance::new(self.point_tolerance)
    }

    pub fn merge(&self) -> Tolerance {
        Tolerance::new(self.merge_tolerance)
    }

    /// Set the vertex merge tolerance
    pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
        self.merge_tolerance = tolerance;
        self
    }

    /// Show or hide block constraints
    pub fn with_hidden_blocks(mut self, hide: bool) -> Self {
        self.hide_block_constraints = hide;
        self
    }

    /// Set the coplanar share above which a warning is logged
    pub fn with_coplanar_warning_ratio(mut self, ratio: f64) -> Self {
        self.coplanar_warning_ratio = ratio;
        self
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

//! Autotile configuration
//!
//! Controls how cell constraints are derived and how ties between matching
//! tiles are broken. Loadable from TOML:
//!
//! ```toml
//! world_seed = 1234
//! corner_rule = "vertex"
//! boundary = "ignore"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which neighbors contribute to a corner slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CornerRule {
    /// The cell and the two orthogonal neighbors sharing the corner
    #[default]
    Orthogonal,
    /// The cell and all three neighbors sharing the corner vertex, diagonal included
    Vertex,
}

/// How out-of-grid neighbors affect a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Out-of-grid neighbors do not contribute; in-grid contributors decide the slot
    #[default]
    Ignore,
    /// Any out-of-grid contributor forces the slot to none (0)
    None,
}

/// Configuration for resolving a terrain grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AutotileConfig {
    /// Mixed with cell coordinates to seed the weighted tie-break
    pub world_seed: u64,
    pub corner_rule: CornerRule,
    pub boundary: BoundaryPolicy,
}

impl AutotileConfig {
    pub fn new(world_seed: u64) -> Self {
        Self {
            world_seed,
            ..Self::default()
        }
    }

    pub fn with_corner_rule(mut self, corner_rule: CornerRule) -> Self {
        self.corner_rule = corner_rule;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML string
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AutotileConfig::default();
        assert_eq!(config.world_seed, 0);
        assert_eq!(config.corner_rule, CornerRule::Orthogonal);
        assert_eq!(config.boundary, BoundaryPolicy::Ignore);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = AutotileConfig::from_toml_str("world_seed = 42\ncorner_rule = \"vertex\"").unwrap();
        assert_eq!(config.world_seed, 42);
        assert_eq!(config.corner_rule, CornerRule::Vertex);
        assert_eq!(config.boundary, BoundaryPolicy::Ignore);
    }

    #[test]
    fn test_parse_rejects_unknown_variant() {
        let result = AutotileConfig::from_toml_str("boundary = \"wrap\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "world_seed = 7").unwrap();
        writeln!(file, "boundary = \"none\"").unwrap();

        let config = AutotileConfig::load(file.path()).unwrap();
        assert_eq!(config, AutotileConfig::new(7).with_boundary(BoundaryPolicy::None));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AutotileConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AutotileConfig::new(99).with_corner_rule(CornerRule::Vertex);
        let text = config.to_toml_string().unwrap();
        assert_eq!(AutotileConfig::from_toml_str(&text).unwrap(), config);
    }
}

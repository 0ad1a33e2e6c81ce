//! Machine configuration and game definition loading

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paytable::Paytable;
use crate::symbols::DEFAULT_REEL_COUNT;
use crate::timing::TimingConfig;

/// Errors raised while loading or validating a game definition
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unsupported definition format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Reel layout and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Number of reels (columns); rows are fixed at three
    pub reels: u8,
    /// Number of distinct symbols N
    pub symbol_count: u32,
    /// Step pacing
    pub timing: TimingConfig,
}

impl MachineConfig {
    /// Classic 5-reel, 6-symbol machine
    pub fn classic() -> Self {
        Self {
            reels: DEFAULT_REEL_COUNT,
            symbol_count: 6,
            timing: TimingConfig::normal(),
        }
    }

    /// Builder: set reel count
    pub fn with_reels(mut self, reels: u8) -> Self {
        self.reels = reels;
        self
    }

    /// Builder: set symbol count
    pub fn with_symbol_count(mut self, symbol_count: u32) -> Self {
        self.symbol_count = symbol_count;
        self
    }

    /// Builder: set timing
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reels == 0 {
            return Err(ConfigError::Validation("reels must be at least 1".into()));
        }
        if self.symbol_count == 0 {
            return Err(ConfigError::Validation(
                "symbol_count must be at least 1".into(),
            ));
        }
        if !self.timing.step_duration_ms.is_finite() || self.timing.step_duration_ms < 0.0 {
            return Err(ConfigError::Validation(format!(
                "step_duration_ms must be finite and non-negative, got {}",
                self.timing.step_duration_ms
            )));
        }
        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Everything needed to build a machine: layout plus optional paytable
///
/// A definition without a paytable runs in degraded mode (uniform symbols,
/// zero payouts).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDefinition {
    #[serde(default)]
    pub machine: MachineConfig,
    #[serde(default)]
    pub paytable: Option<Paytable>,
}

impl GameDefinition {
    pub fn new(machine: MachineConfig, paytable: Option<Paytable>) -> Self {
        Self { machine, paytable }
    }

    /// Classic machine with the candy paytable
    pub fn classic() -> Self {
        Self::new(MachineConfig::classic(), Some(Paytable::classic()))
    }

    /// Parse and validate a JSON definition
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let definition: Self = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Parse and validate a YAML definition
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let definition: Self = serde_yml::from_str(yaml)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load a definition file; the extension picks the format
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Self::from_json(&text),
            "yaml" | "yml" => Self::from_yaml(&text),
            other => Err(ConfigError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            })),
        }
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.machine.validate()?;
        if let Some(paytable) = &self.paytable {
            paytable.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimingProfile;

    #[test]
    fn test_default_config() {
        let config = MachineConfig::default();
        assert_eq!(config.reels, 5);
        assert_eq!(config.symbol_count, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = MachineConfig::default()
            .with_reels(3)
            .with_symbol_count(4)
            .with_timing(TimingConfig::turbo());

        assert_eq!(config.reels, 3);
        assert_eq!(config.symbol_count, 4);
        assert_eq!(config.timing.profile, TimingProfile::Turbo);
    }

    #[test]
    fn test_parse_json_definition() {
        let json = r#"{
            "machine": { "reels": 5, "symbol_count": 3 },
            "paytable": {
                "weights": [5, 3, 1],
                "mult3": [1, 2, 5],
                "mult4": [2, 4, 10],
                "mult5": [5, 10, 50]
            }
        }"#;
        let def = GameDefinition::from_json(json).unwrap();
        assert_eq!(def.machine.symbol_count, 3);
        // Missing timing falls back to normal pacing
        assert_eq!(def.machine.timing, TimingConfig::normal());
        let paytable = def.paytable.unwrap();
        assert_eq!(paytable.multiplier(2, 5), 50.0);
        assert!(paytable.symbol_names.is_empty());
    }

    #[test]
    fn test_parse_yaml_definition() {
        let yaml = "
machine:
  reels: 5
  symbol_count: 2
  timing:
    base_steps: 10
    step_duration_ms: 0
paytable:
  symbol_names: [cherry, seven]
  weights: [3, 1]
  mult3: [2, 20]
";
        let def = GameDefinition::from_yaml(yaml).unwrap();
        assert_eq!(def.machine.timing.base_steps, 10);
        assert_eq!(def.machine.timing.step_offset_per_reel, 5);
        let paytable = def.paytable.unwrap();
        assert_eq!(paytable.symbol_name(1), "seven");
        assert_eq!(paytable.multiplier(1, 4), 0.0);
    }

    #[test]
    fn test_definition_without_paytable() {
        let def = GameDefinition::from_json(r#"{ "machine": { "reels": 5 } }"#).unwrap();
        assert!(def.paytable.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let err = GameDefinition::from_json(r#"{ "machine": { "reels": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = GameDefinition::from_json(r#"{ "paytable": { "weights": [1, -2] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = GameDefinition::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("definition.toml");
        std::fs::write(&path, "machine = {}").unwrap();
        let err = GameDefinition::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_json_export_roundtrip() {
        let def = GameDefinition::classic();
        let json = def.to_json().unwrap();
        assert_eq!(GameDefinition::from_json(&json).unwrap(), def);
    }
}

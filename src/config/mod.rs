mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::collections::HashSet;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            roster: default_roster(),
            store_dir: default_store_dir(),
            report_dir: default_report_dir(),
            admin_role: default_admin_role(),
            scale: ScaleConfig::default(),
            competencies: Vec::new(),
            retry: RetryConfig::default(),
            timeout_sec: default_timeout_sec(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config if the file exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            tracing::info!("Loading config from {:?}", path);
            Self::load(path)
        } else {
            tracing::info!("No config found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale.min > self.scale.max {
            return Err(ConfigError::InvalidScale {
                min: self.scale.min,
                max: self.scale.max,
            });
        }

        let mut seen = HashSet::new();
        for competency in &self.competencies {
            if !seen.insert(competency.id.as_str()) {
                return Err(ConfigError::DuplicateCompetency(competency.id.clone()));
            }
        }

        Ok(())
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Employee directory (YAML or JSON)
    #[serde(default = "default_roster")]
    pub roster: PathBuf,

    /// Where the assignment store lives
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Viewers holding this role see every assignment in the team inbox
    #[serde(default = "default_admin_role")]
    pub admin_role: String,

    #[serde(default)]
    pub scale: ScaleConfig,

    #[serde(default)]
    pub competencies: Vec<Competency>,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

/// Inclusive bounds for a single competency rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ScaleConfig {
    #[serde(default = "default_scale_min")]
    pub min: u8,

    #[serde(default = "default_scale_max")]
    pub max: u8,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min: default_scale_min(),
            max: default_scale_max(),
        }
    }
}

impl ScaleConfig {
    pub fn contains(&self, score: u8) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Competency {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

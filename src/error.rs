use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Competency '{0}' is defined more than once")]
    DuplicateCompetency(String),

    #[error("Invalid rating scale {min}..={max} (min must not exceed max)")]
    InvalidScale { min: u8, max: u8 },
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML roster: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON roster: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Unsupported roster format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Structurally malformed planning requests. Nothing is planned when one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid request: unknown evaluation type '{0}' (expected 180 or 360)")]
    UnknownEvaluationType(String),

    #[error("Invalid request: missing target role")]
    MissingTargetRole,

    #[error("Invalid request: missing period")]
    MissingPeriod,
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Assignment id '{0}' already exists")]
    DuplicateId(String),

    #[error("Assignment '{0}' not found")]
    NotFound(String),

    #[error("Assignment '{0}' is already completed")]
    AlreadyCompleted(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("Missing scores for competencies: {}", .0.join(", "))]
    MissingScores(Vec<String>),

    #[error("Unknown competency '{0}'")]
    UnknownCompetency(String),

    #[error("Score {score} for '{competency}' is outside {min}..={max}")]
    ScoreOutOfRange {
        competency: String,
        score: u8,
        min: u8,
        max: u8,
    },

    #[error("Malformed or repeated score '{0}' (expected competency=value, once per competency)")]
    MalformedScore(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

//! Employee directory: the read-only input of every planning run.
//!
//! Rosters are loaded from YAML or JSON files and indexed by [`RosterIndex`],
//! which never trusts the manager links to form a forest.

mod index;

pub use index::{ManagerLink, RosterIndex};

use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A person in the organization
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Employee {
    pub id: String,

    /// Display name, only used in messages
    #[serde(default)]
    pub name: Option<String>,

    #[serde(alias = "roleId", alias = "role")]
    pub role_id: String,

    /// Absent for the roots of the hierarchy
    #[serde(default, alias = "managerId")]
    pub manager_id: Option<String>,
}

impl Employee {
    pub fn new(id: &str, role_id: &str, manager_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            role_id: role_id.to_string(),
            manager_id: manager_id.map(str::to_string),
        }
    }

    /// Name for display, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Source of the employee directory
pub trait RosterStore {
    fn load(&self) -> Result<Vec<Employee>, RosterError>;
}

/// Roster kept in a YAML (`.yaml`/`.yml`) or JSON (`.json`) file
pub struct FileRoster {
    pub path: PathBuf,
}

impl FileRoster {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RosterStore for FileRoster {
    fn load(&self) -> Result<Vec<Employee>, RosterError> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let content = std::fs::read_to_string(&self.path).map_err(|e| RosterError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;

        let employees: Vec<Employee> = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => return Err(RosterError::UnsupportedFormat(self.path.clone())),
        };

        tracing::debug!(
            "Loaded {} employees from {}",
            employees.len(),
            self.path.display()
        );
        Ok(employees)
    }
}

use super::{apply_response, merge_batch, AssignmentResponse, InsertSummary, PersistenceGateway};
use crate::error::PersistenceError;
use crate::planner::EvaluationAssignment;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

const STORE_FILE: &str = "assignments.json";

/// Assignments kept as one JSON document under a store directory.
///
/// Every write replaces the document atomically, so a failed insert leaves
/// the previous contents intact.
pub struct JsonFileGateway {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileGateway {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    fn read(&self) -> Result<Vec<EvaluationAssignment>, PersistenceError> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, assignments: &[EvaluationAssignment]) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, assignments)?;
        tmp.flush()?;
        tmp.persist(self.path()).map_err(|e| e.error)?;

        debug!(
            "Wrote {} assignments to {}",
            assignments.len(),
            self.path().display()
        );
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for JsonFileGateway {
    fn name(&self) -> &'static str {
        "json_file"
    }

    async fn insert_assignments(
        &self,
        assignments: &[EvaluationAssignment],
    ) -> Result<InsertSummary, PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut stored = self.read()?;
        let summary = merge_batch(&mut stored, assignments)?;
        if summary.inserted > 0 {
            self.write(&stored)?;
        }
        Ok(summary)
    }

    async fn update_assignment(
        &self,
        id: &str,
        response: &AssignmentResponse,
    ) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut stored = self.read()?;
        apply_response(&mut stored, id, response)?;
        self.write(&stored)
    }

    async fn list_assignments(&self) -> Result<Vec<EvaluationAssignment>, PersistenceError> {
        let _guard = self.lock.lock().await;
        self.read()
    }
}

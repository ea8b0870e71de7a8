use super::{apply_response, merge_batch, AssignmentResponse, InsertSummary, PersistenceGateway};
use crate::error::PersistenceError;
use crate::planner::EvaluationAssignment;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// In-process gateway, used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryGateway {
    assignments: Mutex<Vec<EvaluationAssignment>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a snapshot of another store
    pub fn with_assignments(assignments: Vec<EvaluationAssignment>) -> Self {
        Self {
            assignments: Mutex::new(assignments),
        }
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_assignments(
        &self,
        assignments: &[EvaluationAssignment],
    ) -> Result<InsertSummary, PersistenceError> {
        let mut stored = self.assignments.lock().await;
        merge_batch(&mut stored, assignments)
    }

    async fn update_assignment(
        &self,
        id: &str,
        response: &AssignmentResponse,
    ) -> Result<(), PersistenceError> {
        let mut stored = self.assignments.lock().await;
        apply_response(&mut stored, id, response)
    }

    async fn list_assignments(&self) -> Result<Vec<EvaluationAssignment>, PersistenceError> {
        Ok(self.assignments.lock().await.clone())
    }
}

//! Persistence gateway for evaluation assignments.
//!
//! Inserts are decided as a unit: either the whole batch lands or nothing
//! does. Each assignment is updated at most once, when its response arrives.

mod file;
mod memory;
mod retry;

pub use file::JsonFileGateway;
pub use memory::MemoryGateway;
pub use retry::CallPolicy;

use crate::error::PersistenceError;
use crate::planner::{AssignmentStatus, EvaluationAssignment};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// The answer that closes out one assignment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssignmentResponse {
    pub scores: BTreeMap<String, u8>,
    pub comments: String,
    pub completed_at: DateTime<Utc>,
}

/// Counts reported by a successful insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    pub inserted: usize,
    /// Equivalent assignments already stored (same fingerprint)
    pub skipped: usize,
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn insert_assignments(
        &self,
        assignments: &[EvaluationAssignment],
    ) -> Result<InsertSummary, PersistenceError>;

    /// Mark one assignment completed with its scores and comments
    async fn update_assignment(
        &self,
        id: &str,
        response: &AssignmentResponse,
    ) -> Result<(), PersistenceError>;

    async fn list_assignments(&self) -> Result<Vec<EvaluationAssignment>, PersistenceError>;
}

/// Fold `batch` into `existing`, or reject it whole.
///
/// Assignments whose fingerprint is already stored are skipped, so a batch
/// that was re-sent after an ambiguous failure is harmless. When part of a
/// 360 group is skipped, the remaining members join the stored group; a
/// member whose evaluator already rates the same employee in that group is
/// skipped too, keeping one assignment per evaluator per group.
fn merge_batch(
    existing: &mut Vec<EvaluationAssignment>,
    batch: &[EvaluationAssignment],
) -> Result<InsertSummary, PersistenceError> {
    let stored: HashMap<String, &EvaluationAssignment> = existing
        .iter()
        .map(|a| (a.fingerprint(), a))
        .collect();
    let mut taken_ids: HashSet<&str> = existing.iter().map(|a| a.id.as_str()).collect();
    let mut occupied: HashSet<(String, String, String)> =
        existing.iter().filter_map(group_slot).collect();

    let mut group_remap: HashMap<String, String> = HashMap::new();
    let mut candidates = Vec::new();
    let mut skipped = 0;

    for assignment in batch {
        match stored.get(&assignment.fingerprint()) {
            Some(previous) => {
                if let (Some(incoming), Some(kept)) = (&assignment.group_id, &previous.group_id) {
                    group_remap
                        .entry(incoming.clone())
                        .or_insert_with(|| kept.clone());
                }
                skipped += 1;
            }
            None => candidates.push(assignment),
        }
    }

    let mut fresh = Vec::new();
    for assignment in candidates {
        let mut assignment = assignment.clone();
        let kept = assignment
            .group_id
            .as_ref()
            .and_then(|g| group_remap.get(g))
            .cloned();

        if let Some(kept) = kept {
            assignment.group_id = Some(kept);
            if let Some(slot) = group_slot(&assignment) {
                if !occupied.insert(slot) {
                    debug!(
                        "Skipping {}: {} already rates {} in the stored group",
                        assignment.id, assignment.evaluator_id, assignment.evaluated_id
                    );
                    skipped += 1;
                    continue;
                }
            }
        }
        fresh.push(assignment);
    }

    for assignment in &fresh {
        if !taken_ids.insert(assignment.id.as_str()) {
            return Err(PersistenceError::DuplicateId(assignment.id.clone()));
        }
    }

    let inserted = fresh.len();
    existing.extend(fresh);
    Ok(InsertSummary { inserted, skipped })
}

/// `(group, evaluator, evaluated)` for grouped assignments
fn group_slot(assignment: &EvaluationAssignment) -> Option<(String, String, String)> {
    assignment.group_id.as_ref().map(|group| {
        (
            group.clone(),
            assignment.evaluator_id.clone(),
            assignment.evaluated_id.clone(),
        )
    })
}

fn apply_response(
    assignments: &mut [EvaluationAssignment],
    id: &str,
    response: &AssignmentResponse,
) -> Result<(), PersistenceError> {
    let assignment = assignments
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;

    if assignment.status == AssignmentStatus::Completed {
        return Err(PersistenceError::AlreadyCompleted(id.to_string()));
    }

    assignment.scores = response.scores.clone();
    assignment.comments = response.comments.clone();
    assignment.status = AssignmentStatus::Completed;
    assignment.completed_at = Some(response.completed_at);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{plan, EvaluationType, PlanRequest, SequentialIds};
    use crate::roster::Employee;

    fn team_plan(prefix: &str) -> Vec<EvaluationAssignment> {
        let roster = vec![
            Employee::new("1", "manager", None),
            Employee::new("2", "employee", Some("1")),
            Employee::new("3", "employee", Some("1")),
        ];
        let request = PlanRequest::new(EvaluationType::ThreeSixty, "employee", "Q1 2025").unwrap();
        plan(&roster, &request, &mut SequentialIds::new(prefix))
            .unwrap()
            .assignments
    }

    #[test]
    fn test_merge_into_empty_store() {
        let mut existing = Vec::new();
        let summary = merge_batch(&mut existing, &team_plan("a")).unwrap();
        assert_eq!(summary, InsertSummary { inserted: 6, skipped: 0 });
        assert_eq!(existing.len(), 6);
    }

    #[test]
    fn test_resent_batch_is_skipped() {
        let batch = team_plan("a");
        let mut existing = Vec::new();
        merge_batch(&mut existing, &batch).unwrap();

        let summary = merge_batch(&mut existing, &batch).unwrap();
        assert_eq!(summary, InsertSummary { inserted: 0, skipped: 6 });

        let replanned = team_plan("b");
        let summary = merge_batch(&mut existing, &replanned).unwrap();
        assert_eq!(summary.skipped, 6);
        assert_eq!(existing.len(), 6);
    }

    #[test]
    fn test_partial_overlap_joins_stored_group() {
        let batch = team_plan("a");
        // Only the first target's group made it into the store
        let mut existing: Vec<_> = batch
            .iter()
            .filter(|a| a.evaluated_id == "2")
            .take(2)
            .cloned()
            .collect();
        let stored_group = existing[0].group_id.clone();

        let summary = merge_batch(&mut existing, &team_plan("b")).unwrap();
        assert_eq!(summary, InsertSummary { inserted: 4, skipped: 2 });

        let groups_for_2: HashSet<_> = existing
            .iter()
            .filter(|a| a.evaluated_id == "2")
            .map(|a| a.group_id.clone())
            .collect();
        assert_eq!(groups_for_2.len(), 1);
        assert!(groups_for_2.contains(&stored_group));
    }

    #[test]
    fn test_reorg_replan_keeps_one_assignment_per_evaluator() {
        let mut existing = team_plan("a");

        // Same period, but 3 now reports to 2
        let roster = vec![
            Employee::new("1", "manager", None),
            Employee::new("2", "employee", Some("1")),
            Employee::new("3", "employee", Some("2")),
        ];
        let request = PlanRequest::new(EvaluationType::ThreeSixty, "employee", "Q1 2025").unwrap();
        let replanned = plan(&roster, &request, &mut SequentialIds::new("b"))
            .unwrap()
            .assignments;

        let summary = merge_batch(&mut existing, &replanned).unwrap();
        assert_eq!(summary, InsertSummary { inserted: 0, skipped: 5 });

        let mut slots = HashSet::new();
        for assignment in &existing {
            assert!(slots.insert((
                assignment.group_id.clone(),
                assignment.evaluator_id.clone(),
                assignment.evaluated_id.clone(),
            )));
        }
        assert_eq!(existing.len(), 6);
    }

    #[test]
    fn test_new_evaluator_joins_stored_group() {
        let mut existing = team_plan("a");

        // A third teammate appears mid-period
        let roster = vec![
            Employee::new("1", "manager", None),
            Employee::new("2", "employee", Some("1")),
            Employee::new("3", "employee", Some("1")),
            Employee::new("4", "employee", Some("1")),
        ];
        let request = PlanRequest::new(EvaluationType::ThreeSixty, "employee", "Q1 2025").unwrap();
        let replanned = plan(&roster, &request, &mut SequentialIds::new("b"))
            .unwrap()
            .assignments;

        let summary = merge_batch(&mut existing, &replanned).unwrap();
        assert_eq!(summary.skipped, 6);
        assert_eq!(summary.inserted, 6);

        let group_of_2 = existing
            .iter()
            .find(|a| a.evaluated_id == "2")
            .and_then(|a| a.group_id.clone());
        let peer_4 = existing
            .iter()
            .find(|a| a.evaluated_id == "2" && a.evaluator_id == "4")
            .unwrap();
        assert_eq!(peer_4.group_id, group_of_2);
    }

    #[test]
    fn test_ids_with_separators_are_distinct() {
        let mut first = team_plan("a").remove(0);
        first.evaluator_id = "x|y".to_string();
        first.evaluated_id = "z".to_string();
        let mut second = first.clone();
        second.id = "b-1".to_string();
        second.evaluator_id = "x".to_string();
        second.evaluated_id = "y|z".to_string();
        second.group_id = None;
        first.group_id = None;

        let mut existing = vec![first];
        let summary = merge_batch(&mut existing, &[second]).unwrap();
        assert_eq!(summary, InsertSummary { inserted: 1, skipped: 0 });
    }

    #[test]
    fn test_id_clash_rejects_whole_batch() {
        let mut existing = team_plan("a");
        let mut clash = team_plan("a");
        for assignment in &mut clash {
            assignment.period = "Q2 2025".to_string();
        }

        assert!(matches!(
            merge_batch(&mut existing, &clash),
            Err(PersistenceError::DuplicateId(_))
        ));
        assert_eq!(existing.len(), 6);
    }

    #[test]
    fn test_apply_response_only_once() {
        let mut assignments = team_plan("a");
        let id = assignments[0].id.clone();
        let response = AssignmentResponse {
            scores: BTreeMap::from([("communication".to_string(), 4)]),
            comments: "Solid quarter".to_string(),
            completed_at: Utc::now(),
        };

        apply_response(&mut assignments, &id, &response).unwrap();
        assert_eq!(assignments[0].status, AssignmentStatus::Completed);
        assert_eq!(assignments[0].scores.get("communication"), Some(&4));
        assert_eq!(assignments[0].completed_at, Some(response.completed_at));

        assert!(matches!(
            apply_response(&mut assignments, &id, &response),
            Err(PersistenceError::AlreadyCompleted(_))
        ));
        assert!(matches!(
            apply_response(&mut assignments, "missing", &response),
            Err(PersistenceError::NotFound(_))
        ));
    }
}

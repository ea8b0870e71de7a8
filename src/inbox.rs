//! Per-viewer view of stored assignments: what I owe, what I received, and
//! what concerns my team.

use crate::planner::{AssignmentStatus, EvaluationAssignment, RelationType};
use crate::roster::RosterIndex;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Default, Serialize)]
pub struct Inbox<'a> {
    /// Assignments the viewer still has to answer
    pub pending: Vec<&'a EvaluationAssignment>,

    /// Assignments the viewer already answered
    pub completed: Vec<&'a EvaluationAssignment>,

    /// Ratings of the viewer, by who gave them
    pub received_self: Vec<&'a EvaluationAssignment>,
    pub received_peer: Vec<&'a EvaluationAssignment>,
    pub received_subordinate: Vec<&'a EvaluationAssignment>,
    pub received_manager: Vec<&'a EvaluationAssignment>,

    /// Assignments rating the viewer's direct reports, or every assignment
    /// for holders of the admin role
    pub team: Vec<&'a EvaluationAssignment>,
}

impl<'a> Inbox<'a> {
    pub fn build(
        assignments: &'a [EvaluationAssignment],
        roster: &RosterIndex<'_>,
        viewer_id: &str,
        admin_role: &str,
    ) -> Self {
        let mut inbox = Inbox::default();
        let is_admin = roster
            .get(viewer_id)
            .map(|v| v.role_id == admin_role)
            .unwrap_or(false);
        let mut team_ids = HashSet::new();

        for assignment in assignments {
            if assignment.evaluator_id == viewer_id {
                match assignment.status {
                    AssignmentStatus::Pending => inbox.pending.push(assignment),
                    AssignmentStatus::Completed => inbox.completed.push(assignment),
                }
            }

            if assignment.evaluated_id == viewer_id {
                let bucket = match assignment.relation_type {
                    RelationType::SelfAssessment => &mut inbox.received_self,
                    RelationType::Peer => &mut inbox.received_peer,
                    RelationType::Subordinate => &mut inbox.received_subordinate,
                    RelationType::Manager => &mut inbox.received_manager,
                };
                bucket.push(assignment);
            }

            let reports_to_viewer = roster
                .get(&assignment.evaluated_id)
                .and_then(|e| e.manager_id.as_deref())
                == Some(viewer_id);
            if (reports_to_viewer || is_admin) && team_ids.insert(assignment.id.as_str()) {
                inbox.team.push(assignment);
            }
        }

        inbox
    }

    pub fn received_count(&self) -> usize {
        self.received_self.len()
            + self.received_peer.len()
            + self.received_subordinate.len()
            + self.received_manager.len()
    }
}

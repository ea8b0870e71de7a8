//! Types for evaluation planning: requests, assignments, and warnings

use crate::error::PlanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Which kind of evaluation cycle is being planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum EvaluationType {
    /// The direct manager rates the employee
    #[serde(rename = "180")]
    OneEighty,

    /// Self, manager, subordinates and peers each rate the employee
    #[serde(rename = "360")]
    ThreeSixty,
}

impl std::fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationType::OneEighty => write!(f, "180"),
            EvaluationType::ThreeSixty => write!(f, "360"),
        }
    }
}

impl std::str::FromStr for EvaluationType {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "180" => Ok(EvaluationType::OneEighty),
            "360" => Ok(EvaluationType::ThreeSixty),
            other => Err(PlanError::UnknownEvaluationType(other.to_string())),
        }
    }
}

/// The evaluator's relationship to the evaluated employee.
///
/// Variant order is tag precedence: when one person qualifies for several
/// relations, the earliest variant is the one recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    #[serde(rename = "self")]
    SelfAssessment,
    Manager,
    Subordinate,
    Peer,
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationType::SelfAssessment => write!(f, "self"),
            RelationType::Manager => write!(f, "manager"),
            RelationType::Subordinate => write!(f, "subordinate"),
            RelationType::Peer => write!(f, "peer"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Completed,
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Pending => write!(f, "pending"),
            AssignmentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One evaluator owing one rating of one employee
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvaluationAssignment {
    pub id: String,

    /// The employee being rated
    pub evaluated_id: String,

    /// The employee who must produce the rating
    pub evaluator_id: String,

    #[serde(rename = "type")]
    pub evaluation_type: EvaluationType,

    pub relation_type: RelationType,

    /// Shared by every assignment spawned for one 360 target; `None` for 180
    pub group_id: Option<String>,

    /// Evaluation cycle label, e.g. "Q3 2025"
    pub period: String,

    pub status: AssignmentStatus,

    /// Competency id to rating
    pub scores: BTreeMap<String, u8>,

    pub comments: String,

    pub completed_at: Option<DateTime<Utc>>,
}

impl EvaluationAssignment {
    /// Deterministic fingerprint, independent of generated ids.
    /// Uses: period, type, evaluator, evaluated, relation; each field is
    /// length-prefixed so ids containing separators cannot collide.
    pub fn fingerprint(&self) -> String {
        let evaluation_type = self.evaluation_type.to_string();
        let relation_type = self.relation_type.to_string();
        let fields = [
            self.period.as_str(),
            evaluation_type.as_str(),
            self.evaluator_id.as_str(),
            self.evaluated_id.as_str(),
            relation_type.as_str(),
        ];

        let mut hasher = Sha256::new();
        for field in fields {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        format!("{:x}", hasher.finalize())[..16].to_string()
    }

    pub fn is_pending(&self) -> bool {
        self.status == AssignmentStatus::Pending
    }
}

/// A validated planning request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub evaluation_type: EvaluationType,

    /// Employees holding this role are the ones evaluated
    pub target_role_id: String,

    pub period: String,

    pub initial_comments: Option<String>,
}

impl PlanRequest {
    pub fn new(
        evaluation_type: EvaluationType,
        target_role_id: &str,
        period: &str,
    ) -> Result<Self, PlanError> {
        let request = Self {
            evaluation_type,
            target_role_id: target_role_id.to_string(),
            period: period.to_string(),
            initial_comments: None,
        };
        request.validate()?;
        Ok(request)
    }

    /// Fields are public, so the planner re-checks them before every run
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.target_role_id.trim().is_empty() {
            return Err(PlanError::MissingTargetRole);
        }
        if self.period.trim().is_empty() {
            return Err(PlanError::MissingPeriod);
        }
        Ok(())
    }
}

/// Loosely typed request as received from a caller. Unrecognized fields are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestDraft {
    #[serde(default, alias = "evaluationType", alias = "type")]
    pub evaluation_type: Option<String>,

    #[serde(default, alias = "targetRoleId")]
    pub target_role_id: Option<String>,

    #[serde(default)]
    pub period: Option<String>,

    #[serde(default, alias = "initialComments")]
    pub initial_comments: Option<String>,
}

impl TryFrom<RequestDraft> for PlanRequest {
    type Error = PlanError;

    fn try_from(draft: RequestDraft) -> Result<Self, Self::Error> {
        let evaluation_type = draft
            .evaluation_type
            .as_deref()
            .unwrap_or("")
            .parse::<EvaluationType>()?;

        let request = PlanRequest {
            evaluation_type,
            target_role_id: draft.target_role_id.unwrap_or_default().trim().to_string(),
            period: draft.period.unwrap_or_default().trim().to_string(),
            initial_comments: draft.initial_comments,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Non-fatal data-quality notices collected during planning
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanningWarning {
    /// Nobody in the roster holds the target role
    NoTargetEmployees { role_id: String },

    /// A 180 target whose manager cannot be resolved; no assignment made
    MissingManager { employee_id: String },

    /// The reporting line above an employee loops back on itself
    CyclicManagerChain {
        employee_id: String,
        cycle_at: String,
    },

    /// The roster lists this id more than once; only the first entry is used
    DuplicateEmployee { employee_id: String },

    /// Targets existed but none of them produced an assignment
    NoEvaluationsGenerated,
}

impl std::fmt::Display for PlanningWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanningWarning::NoTargetEmployees { role_id } => {
                write!(f, "no employees hold role '{}'", role_id)
            }
            PlanningWarning::MissingManager { employee_id } => {
                write!(f, "no manager found for employee '{}'", employee_id)
            }
            PlanningWarning::CyclicManagerChain {
                employee_id,
                cycle_at,
            } => write!(
                f,
                "reporting line of '{}' loops back at '{}'",
                employee_id, cycle_at
            ),
            PlanningWarning::DuplicateEmployee { employee_id } => {
                write!(f, "employee id '{}' appears more than once", employee_id)
            }
            PlanningWarning::NoEvaluationsGenerated => {
                write!(f, "no evaluations were generated")
            }
        }
    }
}

/// Output of one planning run
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlanOutcome {
    pub assignments: Vec<EvaluationAssignment>,

    #[serde(default)]
    pub warnings: Vec<PlanningWarning>,
}

impl PlanOutcome {
    pub fn relation_counts(&self) -> BTreeMap<RelationType, usize> {
        let mut counts = BTreeMap::new();
        for assignment in &self.assignments {
            *counts.entry(assignment.relation_type).or_insert(0) += 1;
        }
        counts
    }

    /// Number of distinct employees being evaluated
    pub fn evaluated_count(&self) -> usize {
        let mut evaluated: Vec<&str> = self
            .assignments
            .iter()
            .map(|a| a.evaluated_id.as_str())
            .collect();
        evaluated.sort_unstable();
        evaluated.dedup();
        evaluated.len()
    }
}

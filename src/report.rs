//! Score summary for one evaluated employee, over completed assignments.

use crate::planner::{EvaluationAssignment, RelationType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Performance band of an overall mean score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    Good,
    Regular,
    NeedsImprovement,
}

impl Band {
    pub fn from_mean(mean: f64) -> Option<Self> {
        if mean >= 4.5 {
            Some(Band::Excellent)
        } else if mean >= 3.5 {
            Some(Band::Good)
        } else if mean >= 2.5 {
            Some(Band::Regular)
        } else if mean > 0.0 {
            Some(Band::NeedsImprovement)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Excellent => write!(f, "excellent"),
            Band::Good => write!(f, "good"),
            Band::Regular => write!(f, "regular"),
            Band::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSummary {
    pub employee_id: String,

    /// Completed assignments rating this employee
    pub completed: usize,

    /// Assignments still waiting on their evaluator
    pub pending: usize,

    /// Mean of every score given under each relation
    pub by_relation: BTreeMap<RelationType, f64>,

    /// Mean of every score received
    pub overall: Option<f64>,

    pub band: Option<Band>,
}

#[derive(Default)]
struct Tally {
    sum: u64,
    count: u64,
}

impl Tally {
    fn add(&mut self, score: u8) {
        self.sum += u64::from(score);
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

impl EmployeeSummary {
    pub fn build(assignments: &[EvaluationAssignment], employee_id: &str) -> Self {
        let mut completed = 0;
        let mut pending = 0;
        let mut overall = Tally::default();
        let mut per_relation: BTreeMap<RelationType, Tally> = BTreeMap::new();

        for assignment in assignments.iter().filter(|a| a.evaluated_id == employee_id) {
            if assignment.is_pending() {
                pending += 1;
                continue;
            }
            completed += 1;

            let tally = per_relation.entry(assignment.relation_type).or_default();
            for &score in assignment.scores.values() {
                tally.add(score);
                overall.add(score);
            }
        }

        let by_relation = per_relation
            .into_iter()
            .filter_map(|(relation, tally)| tally.mean().map(|mean| (relation, mean)))
            .collect();
        let overall = overall.mean();

        Self {
            employee_id: employee_id.to_string(),
            completed,
            pending,
            by_relation,
            overall,
            band: overall.and_then(Band::from_mean),
        }
    }
}

//! Evaluation fan-out: who rates whom for one planning run.
//!
//! Pure computation over a borrowed roster. Data-quality problems become
//! [`PlanningWarning`]s; only a malformed request is an error.

use crate::error::PlanError;
use crate::roster::{Employee, ManagerLink, RosterIndex};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

use super::ids::IdGenerator;
use super::types::{
    AssignmentStatus, EvaluationAssignment, EvaluationType, PlanOutcome, PlanRequest,
    PlanningWarning, RelationType,
};

/// Evaluators for one target, in insertion order. The first relation
/// recorded for a person is kept.
struct EvaluatorSet<'a> {
    entries: Vec<(&'a str, RelationType)>,
    seen: HashSet<&'a str>,
}

impl<'a> EvaluatorSet<'a> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn insert(&mut self, evaluator_id: &'a str, relation: RelationType) {
        if self.seen.insert(evaluator_id) {
            self.entries.push((evaluator_id, relation));
        }
    }
}

/// Compute the assignments for `request` against `roster`.
///
/// The roster is never modified; identifiers come from `ids`, so two runs
/// with different generators differ only in `id` and `group_id` values.
pub fn plan(
    roster: &[Employee],
    request: &PlanRequest,
    ids: &mut dyn IdGenerator,
) -> Result<PlanOutcome, PlanError> {
    request.validate()?;

    let index = RosterIndex::new(roster);
    let mut warnings: Vec<PlanningWarning> = index
        .duplicate_ids()
        .iter()
        .map(|id| PlanningWarning::DuplicateEmployee {
            employee_id: id.to_string(),
        })
        .collect();

    let targets: Vec<&Employee> = index
        .employees()
        .filter(|e| e.role_id == request.target_role_id)
        .collect();

    if targets.is_empty() {
        warnings.push(PlanningWarning::NoTargetEmployees {
            role_id: request.target_role_id.clone(),
        });
        log_warnings(&warnings);
        return Ok(PlanOutcome {
            assignments: Vec::new(),
            warnings,
        });
    }

    let mut assignments = Vec::new();

    for &target in &targets {
        let chain = index.manager_chain(target);
        if let Some(cycle_at) = chain.cycle_at {
            warnings.push(PlanningWarning::CyclicManagerChain {
                employee_id: target.id.clone(),
                cycle_at: cycle_at.to_string(),
            });
        }

        let manager = match index.resolve_manager(target) {
            ManagerLink::Resolved(manager) => Some(manager),
            ManagerLink::Dangling(missing) => {
                debug!("Manager '{}' of {} is not in the roster", missing, target.id);
                None
            }
            ManagerLink::Root | ManagerLink::SelfManaged => None,
        };

        let evaluators = match request.evaluation_type {
            EvaluationType::OneEighty => match manager {
                Some(manager) => vec![(manager.id.as_str(), RelationType::Manager)],
                None => {
                    warnings.push(PlanningWarning::MissingManager {
                        employee_id: target.id.clone(),
                    });
                    Vec::new()
                }
            },
            EvaluationType::ThreeSixty => {
                three_sixty_evaluators(&index, target, manager, &request.target_role_id)
            }
        };

        debug!(
            "Planned {} evaluator(s) for {} ({}, {} level(s) below the top)",
            evaluators.len(),
            target.display_name(),
            request.evaluation_type,
            chain.managers.len()
        );

        let group_id = match request.evaluation_type {
            EvaluationType::ThreeSixty if !evaluators.is_empty() => Some(ids.next_id()),
            _ => None,
        };

        for (evaluator_id, relation_type) in evaluators {
            assignments.push(EvaluationAssignment {
                id: ids.next_id(),
                evaluated_id: target.id.clone(),
                evaluator_id: evaluator_id.to_string(),
                evaluation_type: request.evaluation_type,
                relation_type,
                group_id: group_id.clone(),
                period: request.period.clone(),
                status: AssignmentStatus::Pending,
                scores: BTreeMap::new(),
                comments: request.initial_comments.clone().unwrap_or_default(),
                completed_at: None,
            });
        }
    }

    if assignments.is_empty() {
        warnings.push(PlanningWarning::NoEvaluationsGenerated);
    }

    info!(
        "Planned {} {} assignment(s) for {} target(s) in role '{}' with {} warning(s)",
        assignments.len(),
        request.evaluation_type,
        targets.len(),
        request.target_role_id,
        warnings.len()
    );
    log_warnings(&warnings);

    Ok(PlanOutcome {
        assignments,
        warnings,
    })
}

/// Self, then manager, then direct reports, then same-role peers
fn three_sixty_evaluators<'a>(
    index: &RosterIndex<'a>,
    target: &'a Employee,
    manager: Option<&'a Employee>,
    target_role_id: &str,
) -> Vec<(&'a str, RelationType)> {
    let mut set = EvaluatorSet::new();

    set.insert(target.id.as_str(), RelationType::SelfAssessment);

    if let Some(manager) = manager {
        set.insert(manager.id.as_str(), RelationType::Manager);
    }

    for &subordinate in index.direct_reports(&target.id) {
        set.insert(subordinate.id.as_str(), RelationType::Subordinate);
    }

    for peer in index.employees() {
        if peer.id != target.id && peer.role_id == target_role_id {
            set.insert(peer.id.as_str(), RelationType::Peer);
        }
    }

    set.entries
}

fn log_warnings(warnings: &[PlanningWarning]) {
    for warning in warnings {
        warn!("Planning: {}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ids::SequentialIds;
    use std::collections::HashMap;

    fn employee(id: &str, role: &str, manager: Option<&str>) -> Employee {
        Employee::new(id, role, manager)
    }

    fn request(evaluation_type: EvaluationType, role: &str) -> PlanRequest {
        PlanRequest::new(evaluation_type, role, "Q1 2025").unwrap()
    }

    fn run(roster: &[Employee], request: &PlanRequest) -> PlanOutcome {
        plan(roster, request, &mut SequentialIds::new("id")).unwrap()
    }

    /// (evaluator, evaluated, relation) triples, sorted
    fn triples(outcome: &PlanOutcome) -> Vec<(String, String, RelationType)> {
        let mut triples: Vec<_> = outcome
            .assignments
            .iter()
            .map(|a| (a.evaluator_id.clone(), a.evaluated_id.clone(), a.relation_type))
            .collect();
        triples.sort();
        triples
    }

    fn small_team() -> Vec<Employee> {
        vec![
            employee("1", "manager", None),
            employee("2", "employee", Some("1")),
            employee("3", "employee", Some("1")),
        ]
    }

    #[test]
    fn test_example_team_360() {
        let roster = small_team();
        let outcome = run(&roster, &request(EvaluationType::ThreeSixty, "employee"));

        assert!(outcome.warnings.is_empty());
        assert_eq!(
            triples(&outcome),
            vec![
                ("1".into(), "2".into(), RelationType::Manager),
                ("1".into(), "3".into(), RelationType::Manager),
                ("2".into(), "2".into(), RelationType::SelfAssessment),
                ("2".into(), "3".into(), RelationType::Peer),
                ("3".into(), "2".into(), RelationType::Peer),
                ("3".into(), "3".into(), RelationType::SelfAssessment),
            ]
        );
        assert!(outcome
            .assignments
            .iter()
            .all(|a| a.relation_type != RelationType::Subordinate));
    }

    #[test]
    fn test_shared_fields() {
        let roster = small_team();
        let mut req = request(EvaluationType::ThreeSixty, "employee");
        req.initial_comments = Some("Be specific".to_string());
        let outcome = run(&roster, &req);

        for assignment in &outcome.assignments {
            assert_eq!(assignment.period, "Q1 2025");
            assert_eq!(assignment.evaluation_type, EvaluationType::ThreeSixty);
            assert_eq!(assignment.status, AssignmentStatus::Pending);
            assert!(assignment.scores.is_empty());
            assert_eq!(assignment.comments, "Be specific");
            assert_eq!(assignment.completed_at, None);
        }

        let unique: HashSet<_> = outcome.assignments.iter().map(|a| &a.id).collect();
        assert_eq!(unique.len(), outcome.assignments.len());
    }

    #[test]
    fn test_one_self_assessment_per_360_target() {
        let roster = vec![
            employee("1", "manager", None),
            employee("2", "employee", Some("1")),
            employee("3", "employee", Some("1")),
            employee("4", "employee", Some("2")),
            employee("5", "employee", None),
        ];
        let outcome = run(&roster, &request(EvaluationType::ThreeSixty, "employee"));

        for target in ["2", "3", "4", "5"] {
            let selfs: Vec<_> = outcome
                .assignments
                .iter()
                .filter(|a| a.evaluated_id == target && a.relation_type == RelationType::SelfAssessment)
                .collect();
            assert_eq!(selfs.len(), 1, "target {}", target);
            assert_eq!(selfs[0].evaluator_id, target);
        }

        for assignment in &outcome.assignments {
            if assignment.relation_type != RelationType::SelfAssessment {
                assert_ne!(assignment.evaluator_id, assignment.evaluated_id);
            }
        }
    }

    #[test]
    fn test_manager_tag_beats_peer_tag() {
        // "lead" shares the target role and manages "dev"
        let roster = vec![
            employee("lead", "engineer", None),
            employee("dev", "engineer", Some("lead")),
        ];
        let outcome = run(&roster, &request(EvaluationType::ThreeSixty, "engineer"));

        let lead_on_dev: Vec<_> = outcome
            .assignments
            .iter()
            .filter(|a| a.evaluated_id == "dev" && a.evaluator_id == "lead")
            .collect();
        assert_eq!(lead_on_dev.len(), 1);
        assert_eq!(lead_on_dev[0].relation_type, RelationType::Manager);

        let dev_on_lead: Vec<_> = outcome
            .assignments
            .iter()
            .filter(|a| a.evaluated_id == "lead" && a.evaluator_id == "dev")
            .collect();
        assert_eq!(dev_on_lead.len(), 1);
        assert_eq!(dev_on_lead[0].relation_type, RelationType::Subordinate);
    }

    #[test]
    fn test_subordinates_of_a_manager_target() {
        let roster = vec![
            employee("boss", "director", None),
            employee("m1", "manager", Some("boss")),
            employee("m2", "manager", Some("boss")),
            employee("e1", "employee", Some("m1")),
            employee("e2", "employee", Some("m1")),
        ];
        let outcome = run(&roster, &request(EvaluationType::ThreeSixty, "manager"));

        let for_m1: Vec<_> = outcome
            .assignments
            .iter()
            .filter(|a| a.evaluated_id == "m1")
            .map(|a| (a.evaluator_id.as_str(), a.relation_type))
            .collect();
        assert_eq!(
            for_m1,
            vec![
                ("m1", RelationType::SelfAssessment),
                ("boss", RelationType::Manager),
                ("e1", RelationType::Subordinate),
                ("e2", RelationType::Subordinate),
                ("m2", RelationType::Peer),
            ]
        );
    }

    #[test]
    fn test_180_completeness() {
        let roster = vec![
            employee("1", "manager", None),
            employee("2", "employee", Some("1")),
            employee("3", "employee", None),
            employee("4", "employee", Some("ghost")),
        ];
        let outcome = run(&roster, &request(EvaluationType::OneEighty, "employee"));

        assert_eq!(
            triples(&outcome),
            vec![("1".into(), "2".into(), RelationType::Manager)]
        );
        assert_eq!(outcome.assignments[0].group_id, None);
        assert_eq!(
            outcome.warnings,
            vec![
                PlanningWarning::MissingManager {
                    employee_id: "3".into()
                },
                PlanningWarning::MissingManager {
                    employee_id: "4".into()
                },
            ]
        );
    }

    #[test]
    fn test_180_without_any_manager_reports_empty_outcome() {
        let roster = vec![
            employee("1", "employee", None),
            employee("2", "employee", None),
        ];
        let outcome = run(&roster, &request(EvaluationType::OneEighty, "employee"));

        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.warnings.len(), 3);
        assert_eq!(
            outcome.warnings.last(),
            Some(&PlanningWarning::NoEvaluationsGenerated)
        );
    }

    #[test]
    fn test_no_target_employees() {
        let outcome = run(&small_team(), &request(EvaluationType::ThreeSixty, "intern"));
        assert!(outcome.assignments.is_empty());
        assert_eq!(
            outcome.warnings,
            vec![PlanningWarning::NoTargetEmployees {
                role_id: "intern".into()
            }]
        );

        let outcome = run(&[], &request(EvaluationType::OneEighty, "employee"));
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_group_cohesion() {
        let roster = vec![
            employee("1", "manager", None),
            employee("2", "employee", Some("1")),
            employee("3", "employee", Some("1")),
            employee("4", "employee", Some("3")),
        ];
        let outcome = run(&roster, &request(EvaluationType::ThreeSixty, "employee"));

        let mut groups: HashMap<&str, HashSet<&str>> = HashMap::new();
        for assignment in &outcome.assignments {
            let group = assignment.group_id.as_deref().expect("360 assignments carry a group");
            groups
                .entry(assignment.evaluated_id.as_str())
                .or_default()
                .insert(group);
        }

        assert_eq!(groups.len(), 3);
        let mut all_groups = HashSet::new();
        for group_ids in groups.values() {
            assert_eq!(group_ids.len(), 1);
            assert!(all_groups.insert(*group_ids.iter().next().unwrap()));
        }

        let mut seen = HashSet::new();
        for assignment in &outcome.assignments {
            assert!(seen.insert((
                assignment.evaluator_id.as_str(),
                assignment.evaluated_id.as_str(),
                assignment.group_id.as_deref()
            )));
        }
    }

    #[test]
    fn test_replanning_is_equivalent_up_to_ids() {
        let roster = vec![
            employee("1", "manager", None),
            employee("2", "employee", Some("1")),
            employee("3", "employee", Some("1")),
            employee("4", "employee", Some("2")),
        ];
        let req = request(EvaluationType::ThreeSixty, "employee");

        let first = plan(&roster, &req, &mut SequentialIds::new("a")).unwrap();
        let second = plan(&roster, &req, &mut crate::planner::UuidGenerator).unwrap();

        assert_eq!(triples(&first), triples(&second));
        assert_eq!(first.warnings, second.warnings);

        // Group ids map one-to-one between the runs
        let mut mapping: HashMap<&str, &str> = HashMap::new();
        for (a, b) in first.assignments.iter().zip(&second.assignments) {
            let ga = a.group_id.as_deref().unwrap();
            let gb = b.group_id.as_deref().unwrap();
            assert_eq!(*mapping.entry(ga).or_insert(gb), gb);
        }
        let distinct: HashSet<_> = mapping.values().collect();
        assert_eq!(distinct.len(), mapping.len());
    }

    #[test]
    fn test_cycle_is_reported_not_followed() {
        let roster = vec![
            employee("a", "employee", Some("b")),
            employee("b", "lead", Some("a")),
        ];

        for evaluation_type in [EvaluationType::OneEighty, EvaluationType::ThreeSixty] {
            let outcome = run(&roster, &request(evaluation_type, "employee"));
            assert!(outcome.warnings.contains(&PlanningWarning::CyclicManagerChain {
                employee_id: "a".into(),
                cycle_at: "a".into(),
            }));
            assert!(outcome
                .assignments
                .iter()
                .any(|x| x.evaluator_id == "b" && x.relation_type == RelationType::Manager));
        }
    }

    #[test]
    fn test_self_managed_employee() {
        let roster = vec![employee("solo", "employee", Some("solo"))];

        let outcome = run(&roster, &request(EvaluationType::OneEighty, "employee"));
        assert!(outcome.assignments.is_empty());
        assert!(outcome.warnings.contains(&PlanningWarning::CyclicManagerChain {
            employee_id: "solo".into(),
            cycle_at: "solo".into(),
        }));
        assert!(outcome.warnings.contains(&PlanningWarning::MissingManager {
            employee_id: "solo".into()
        }));

        let outcome = run(&roster, &request(EvaluationType::ThreeSixty, "employee"));
        assert_eq!(
            triples(&outcome),
            vec![("solo".into(), "solo".into(), RelationType::SelfAssessment)]
        );
    }

    #[test]
    fn test_duplicate_roster_entries_plan_once() {
        let roster = vec![
            employee("1", "manager", None),
            employee("2", "employee", Some("1")),
            employee("2", "employee", Some("1")),
        ];
        let outcome = run(&roster, &request(EvaluationType::OneEighty, "employee"));

        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(
            outcome.warnings,
            vec![PlanningWarning::DuplicateEmployee {
                employee_id: "2".into()
            }]
        );
    }

    #[test]
    fn test_invalid_request_is_rejected_before_planning() {
        let mut req = request(EvaluationType::OneEighty, "employee");
        req.period = "  ".to_string();
        assert_eq!(
            plan(&small_team(), &req, &mut SequentialIds::new("x")).unwrap_err(),
            PlanError::MissingPeriod
        );
    }

    #[test]
    fn test_roster_is_left_untouched() {
        let roster = small_team();
        let before = roster.clone();
        run(&roster, &request(EvaluationType::ThreeSixty, "employee"));
        assert_eq!(roster, before);
    }
}

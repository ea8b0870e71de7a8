//! Planning module: evaluation fan-out for 180 and 360 cycles
//!
//! Given the roster and a request naming the evaluation type, target role
//! and period, the planner decides who rates whom:
//! 1. Select every employee holding the target role
//! 2. For 180, pair each one with their direct manager
//! 3. For 360, collect self, manager, direct reports and same-role peers,
//!    keeping the first relation found for each evaluator
//!
//! Planning never touches storage; callers persist the outcome through a
//! [`crate::store::PersistenceGateway`].

pub mod fanout;
pub mod ids;
pub mod period;
pub mod types;

pub use fanout::plan;
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use period::current_period;
pub use types::{
    AssignmentStatus, EvaluationAssignment, EvaluationType, PlanOutcome, PlanRequest,
    PlanningWarning, RelationType, RequestDraft,
};

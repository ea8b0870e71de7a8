use crate::error::OutputError;
use crate::planner::{PlanOutcome, PlanRequest, PlanningWarning};
use crate::store::InsertSummary;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanSummary {
    pub timestamp: String,
    pub evaluation_type: String,
    pub target_role_id: String,
    pub period: String,
    pub evaluated: usize,
    pub assignments: usize,
    pub by_relation: BTreeMap<String, usize>,
    pub warnings: Vec<PlanningWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<StoredCounts>,
    pub dry_run: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredCounts {
    pub inserted: usize,
    pub skipped: usize,
}

/// File stem for one planning cohort: `Q3 2025`, 360 for `manager` becomes
/// `plan-q3-2025-360-manager`
pub fn summary_stem(request: &PlanRequest) -> String {
    let label = format!(
        "{} {} {}",
        request.period, request.evaluation_type, request.target_role_id
    );
    let mut stem = String::from("plan-");
    let mut last_dash = true;
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            stem.push('-');
            last_dash = true;
        }
    }
    stem.trim_end_matches('-').to_string()
}

/// Write `<stem>.json` and `<stem>.md`, returning the JSON path
pub fn write_plan_summary(
    report_dir: &Path,
    request: &PlanRequest,
    outcome: &PlanOutcome,
    stored: Option<InsertSummary>,
    dry_run: bool,
) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let summary = build_summary(request, outcome, stored, dry_run);
    let stem = summary_stem(request);

    let json_path = report_dir.join(format!("{}.json", stem));
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(&json_path, json).map_err(OutputError::WriteReport)?;

    let md_path = report_dir.join(format!("{}.md", stem));
    fs::write(&md_path, build_summary_markdown(&summary)).map_err(OutputError::WriteReport)?;

    Ok(json_path)
}

fn build_summary(
    request: &PlanRequest,
    outcome: &PlanOutcome,
    stored: Option<InsertSummary>,
    dry_run: bool,
) -> PlanSummary {
    let by_relation = outcome
        .relation_counts()
        .into_iter()
        .map(|(relation, count)| (relation.to_string(), count))
        .collect();

    PlanSummary {
        timestamp: Utc::now().to_rfc3339(),
        evaluation_type: request.evaluation_type.to_string(),
        target_role_id: request.target_role_id.clone(),
        period: request.period.clone(),
        evaluated: outcome.evaluated_count(),
        assignments: outcome.assignments.len(),
        by_relation,
        warnings: outcome.warnings.clone(),
        stored: stored.map(|s| StoredCounts {
            inserted: s.inserted,
            skipped: s.skipped,
        }),
        dry_run,
    }
}

fn build_summary_markdown(summary: &PlanSummary) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# {} evaluation plan: {}\n\n",
        summary.evaluation_type, summary.period
    ));
    md.push_str(&format!("**Generated:** {}\n", summary.timestamp));
    md.push_str(&format!("**Target role:** {}\n", summary.target_role_id));
    md.push_str(&format!("**Employees evaluated:** {}\n", summary.evaluated));
    if summary.dry_run {
        md.push_str("**Dry run:** nothing was stored\n");
    }
    md.push('\n');

    md.push_str("## Assignments\n\n");
    md.push_str("| Relation | Count |\n");
    md.push_str("|----------|-------|\n");
    for (relation, count) in &summary.by_relation {
        md.push_str(&format!("| {} | {} |\n", relation, count));
    }
    md.push_str(&format!("| **total** | {} |\n\n", summary.assignments));

    if let Some(stored) = &summary.stored {
        md.push_str(&format!(
            "Stored {} new assignments, {} already present.\n\n",
            stored.inserted, stored.skipped
        ));
    }

    if !summary.warnings.is_empty() {
        md.push_str("## Warnings\n\n");
        for warning in &summary.warnings {
            md.push_str(&format!("- {}\n", warning));
        }
    }

    md
}

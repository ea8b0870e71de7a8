//! CLI handler for the `plan` subcommand
//!
//! Builds the request, fans it out over the roster, writes the summary and
//! stores the assignments.

use crate::cli::PlanArgs;
use crate::config::Config;
use crate::output::write_plan_summary;
use crate::planner::{
    current_period, plan, IdGenerator, PlanOutcome, PlanRequest, RequestDraft, SequentialIds,
    UuidGenerator,
};
use crate::roster::{FileRoster, RosterStore};
use crate::store::{CallPolicy, JsonFileGateway, MemoryGateway, PersistenceGateway};
use chrono::Local;
use std::path::Path;
use tracing::info;

pub async fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(&args.config)?;

    // Apply CLI overrides
    if let Some(roster) = args.roster.clone() {
        config.roster = roster;
    }
    if let Some(report_dir) = args.report_dir.clone() {
        config.report_dir = report_dir;
    }
    config.validate()?;

    let request = build_request(&args)?;
    let employees = FileRoster::new(&config.roster).load()?;
    info!(
        "Loaded {} employees from {:?}",
        employees.len(),
        config.roster
    );

    let mut ids: Box<dyn IdGenerator> = match &args.id_prefix {
        Some(prefix) => Box::new(SequentialIds::new(prefix)),
        None => Box::new(UuidGenerator),
    };
    let outcome = plan(&employees, &request, ids.as_mut())?;

    print_outcome(&request, &outcome);

    if outcome.assignments.is_empty() {
        println!(
            "No evaluations generated for role '{}' in {}; nothing to store",
            request.target_role_id, request.period
        );
        write_plan_summary(&config.report_dir, &request, &outcome, None, args.dry_run)?;
        return Ok(());
    }

    let store = JsonFileGateway::new(&config.store_dir);
    let policy = CallPolicy::from_config(&config);

    let stored = if args.dry_run {
        info!("DRY RUN - previewing against {:?}", store.path());
        let existing = policy.run(|| store.list_assignments()).await?;
        let preview = MemoryGateway::with_assignments(existing);
        preview.insert_assignments(&outcome.assignments).await?
    } else {
        policy
            .run(|| store.insert_assignments(&outcome.assignments))
            .await?
    };

    let summary_path =
        write_plan_summary(&config.report_dir, &request, &outcome, Some(stored), args.dry_run)?;
    info!("Summary written to {:?}", summary_path);

    if args.dry_run {
        println!(
            "Dry run: {} would be stored, {} already present",
            stored.inserted, stored.skipped
        );
    } else {
        println!(
            "Stored {} assignments in {:?} ({} already present)",
            stored.inserted,
            store.path(),
            stored.skipped
        );
    }

    Ok(())
}

/// Merge the optional request file with the command-line flags
fn build_request(args: &PlanArgs) -> anyhow::Result<PlanRequest> {
    let mut draft = match &args.request {
        Some(path) => load_draft(path)?,
        None => RequestDraft::default(),
    };

    if let Some(evaluation_type) = &args.evaluation_type {
        draft.evaluation_type = Some(evaluation_type.clone());
    }
    if let Some(role) = &args.role {
        draft.target_role_id = Some(role.clone());
    }
    if let Some(period) = &args.period {
        draft.period = Some(period.clone());
    }
    if let Some(comments) = &args.comments {
        draft.initial_comments = Some(comments.clone());
    }
    if draft.period.is_none() {
        draft.period = Some(current_period(Local::now().date_naive()));
    }

    Ok(PlanRequest::try_from(draft)?)
}

fn load_draft(path: &Path) -> anyhow::Result<RequestDraft> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read request file {:?}: {}", path, e))?;

    let draft = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(draft)
}

fn print_outcome(request: &PlanRequest, outcome: &PlanOutcome) {
    println!(
        "\n=== {} evaluation: role '{}', {} ===\n",
        request.evaluation_type, request.target_role_id, request.period
    );

    for warning in &outcome.warnings {
        println!("  warning: {}", warning);
    }
    if !outcome.warnings.is_empty() {
        println!();
    }

    println!(
        "{} assignments for {} employees",
        outcome.assignments.len(),
        outcome.evaluated_count()
    );
    for (relation, count) in outcome.relation_counts() {
        println!("  - {}: {}", relation, count);
    }
    println!();
}

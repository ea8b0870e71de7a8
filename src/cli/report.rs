use crate::cli::ReportArgs;
use crate::config::Config;
use crate::report::EmployeeSummary;
use crate::store::{CallPolicy, JsonFileGateway, PersistenceGateway};

pub async fn execute(args: ReportArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    let store = JsonFileGateway::new(&config.store_dir);
    let assignments = CallPolicy::from_config(&config)
        .run(|| store.list_assignments())
        .await?;

    let summary = EmployeeSummary::build(&assignments, &args.employee);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\n=== Evaluation summary: {} ===\n", summary.employee_id);
    println!(
        "Completed: {}  Pending: {}",
        summary.completed, summary.pending
    );

    for (relation, mean) in &summary.by_relation {
        println!("  - {}: {:.2}", relation, mean);
    }

    match (summary.overall, summary.band) {
        (Some(overall), Some(band)) => println!("\nOverall: {:.2} ({})", overall, band),
        _ => println!("\nNo completed evaluations yet"),
    }
    println!();

    Ok(())
}

use crate::cli::InboxArgs;
use crate::config::Config;
use crate::inbox::Inbox;
use crate::planner::EvaluationAssignment;
use crate::roster::{FileRoster, RosterIndex, RosterStore};
use crate::store::{CallPolicy, JsonFileGateway, PersistenceGateway};

pub async fn execute(args: InboxArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    let employees = FileRoster::new(&config.roster).load()?;
    let index = RosterIndex::new(&employees);
    if index.get(&args.viewer).is_none() {
        anyhow::bail!("Employee '{}' is not in the roster", args.viewer);
    }

    let store = JsonFileGateway::new(&config.store_dir);
    let assignments = CallPolicy::from_config(&config)
        .run(|| store.list_assignments())
        .await?;

    let inbox = Inbox::build(&assignments, &index, &args.viewer, &config.admin_role);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inbox)?);
        return Ok(());
    }

    let name = |id: &str| {
        index
            .get(id)
            .map(|e| e.display_name().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    let line = |a: &EvaluationAssignment, who: &str| {
        format!(
            "  [{}] {} ({}, {} {}, {})",
            a.id, who, a.relation_type, a.evaluation_type, a.period, a.status
        )
    };

    println!("\n=== Inbox: {} ===\n", name(&args.viewer));

    println!("To evaluate ({}):", inbox.pending.len());
    for a in &inbox.pending {
        println!("{}", line(a, &name(&a.evaluated_id)));
    }

    println!("\nCompleted ({}):", inbox.completed.len());
    for a in &inbox.completed {
        println!("{}", line(a, &name(&a.evaluated_id)));
    }

    println!("\nReceived ({}):", inbox.received_count());
    let received = [
        ("self", &inbox.received_self),
        ("peer", &inbox.received_peer),
        ("subordinate", &inbox.received_subordinate),
        ("manager", &inbox.received_manager),
    ];
    for (label, bucket) in received {
        if bucket.is_empty() {
            continue;
        }
        println!("  {}:", label);
        for a in bucket {
            println!("  {}", line(a, &name(&a.evaluator_id)));
        }
    }

    if !inbox.team.is_empty() {
        println!("\nTeam ({}):", inbox.team.len());
        for a in &inbox.team {
            let who = format!("{} -> {}", name(&a.evaluator_id), name(&a.evaluated_id));
            println!("{}", line(a, &who));
        }
    }
    println!();

    Ok(())
}

use crate::cli::RespondArgs;
use crate::config::Config;
use crate::response::{parse_scores, ResponseCollector};
use crate::store::JsonFileGateway;

pub async fn execute(args: RespondArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    let scores = parse_scores(&args.scores)?;
    let store = JsonFileGateway::new(&config.store_dir);
    let collector = ResponseCollector::from_config(&config);

    let response = collector
        .submit(&store, &args.id, scores, &args.comments)
        .await?;

    println!(
        "Assignment {} completed with {} scores at {}",
        args.id,
        response.scores.len(),
        response.completed_at.to_rfc3339()
    );
    Ok(())
}

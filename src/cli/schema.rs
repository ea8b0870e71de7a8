use crate::cli::SchemaArgs;
use crate::config::Config;
use schemars::schema_for;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let schema = schema_for!(Config);
    let json = serde_json::to_string_pretty(&schema)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Config schema written to {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

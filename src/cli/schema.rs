use crate::config::Registry;
use schemars::schema_for;

pub fn execute() -> anyhow::Result<()> {
    let schema = schema_for!(Registry);
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{}", json);
    Ok(())
}

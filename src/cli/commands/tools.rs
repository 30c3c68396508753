//! Tool listing and direct invocation.

use crate::cli::Output;
use crate::config::Settings;
use crate::lookup::ToolRegistry;
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

/// Print every tool definition as JSON.
pub fn run_tools(settings: Settings) -> Result<()> {
    let registry = ToolRegistry::from_settings(&settings)?;
    println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
    Ok(())
}

/// Invoke a tool by name and print its rendered output.
pub async fn run_call(tool: &str, args: Option<&str>, settings: Settings) -> Result<()> {
    let registry = ToolRegistry::from_settings(&settings)?;
    let args = parse_args(args)?;

    let spinner = Output::spinner(&format!("Calling {}...", tool));
    let result = registry.call(tool, &args).await;
    spinner.finish_and_clear();

    println!("{}", result?);
    Ok(())
}

fn parse_args(args: Option<&str>) -> Result<Value> {
    let value: Value = match args {
        Some(raw) => serde_json::from_str(raw).context("Tool arguments must be JSON")?,
        None => json!({}),
    };
    if !value.is_object() {
        bail!("Tool arguments must be a JSON object");
    }
    Ok(value)
}

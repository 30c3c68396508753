//! CLI command implementations.

mod ask;
mod config;
mod mcp;
mod pdf;
mod scholar;
mod search;
mod tools;

pub use ask::run_ask;
pub use config::run_config;
pub use mcp::run_mcp;
pub use pdf::run_pdf;
pub use scholar::run_scholar;
pub use search::run_search;
pub use tools::{run_call, run_tools};

use crate::cli::Output;
use crate::lookup::ToolRegistry;
use anyhow::{anyhow, Result};
use serde_json::Value;

/// Run one registry tool behind a spinner and print its records.
async fn lookup_and_print(registry: &ToolRegistry, name: &str, args: Value) -> Result<()> {
    let tool = registry
        .get(name)
        .ok_or_else(|| anyhow!("Unknown tool: {}", name))?;

    let spinner = Output::spinner("Looking up...");
    let result = tool.call(&args).await;
    spinner.finish_and_clear();

    match result {
        Ok(records) => {
            Output::records(&records);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("{} failed: {}", name, e));
            Err(e.into())
        }
    }
}

//! Search command implementation.

use super::lookup_and_print;
use crate::config::Settings;
use crate::lookup::ToolRegistry;
use anyhow::Result;
use serde_json::json;

/// Run the web search command.
pub async fn run_search(query: &str, num_results: Option<usize>, settings: Settings) -> Result<()> {
    let registry = ToolRegistry::from_settings(&settings)?;
    let num_results = num_results.unwrap_or(settings.web_search.default_results);

    lookup_and_print(
        &registry,
        "web_search",
        json!({ "query": query, "num_results": num_results }),
    )
    .await
}

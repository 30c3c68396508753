//! Scholar command implementation.

use super::lookup_and_print;
use crate::cli::ScholarAction;
use crate::config::Settings;
use crate::lookup::ToolRegistry;
use anyhow::Result;
use serde_json::{json, Value};

/// Run a Google Scholar lookup.
pub async fn run_scholar(action: &ScholarAction, settings: Settings) -> Result<()> {
    let registry = ToolRegistry::from_settings(&settings)?;
    let (tool, args) = tool_call(action);
    lookup_and_print(&registry, tool, args).await
}

/// Map a subcommand onto the tool name and arguments it invokes.
fn tool_call(action: &ScholarAction) -> (&'static str, Value) {
    match action {
        ScholarAction::Author { name, top_k } => (
            "search_author_by_name",
            json!({ "author": name, "top_k": top_k }),
        ),
        ScholarAction::Interests { interests, top_k } => (
            "search_author_by_interests",
            json!({ "interests": interests, "top_k": top_k }),
        ),
        ScholarAction::Papers { uid, sort, top_k } => (
            "author_uid2paper",
            json!({ "uid": uid, "sort_by": sort, "top_k": top_k }),
        ),
        ScholarAction::Paper { title, sort, top_k } => (
            "search_paper",
            json!({ "title": title, "sort_by": sort, "top_k": top_k }),
        ),
        ScholarAction::Single { title } => ("search_single_paper", json!({ "title": title })),
        ScholarAction::Related { title, top_k } => (
            "search_related_paper",
            json!({ "title": title, "top_k": top_k }),
        ),
        ScholarAction::Cites { title, top_k } => (
            "search_cite_paper",
            json!({ "title": title, "top_k": top_k }),
        ),
    }
}

//! Named registry of lookup tools.

use super::scholar::{ScholarTool, SerpApiScholar};
use super::web::WebSearch;
use super::{input_schema, render, LookupTool};
use crate::config::Settings;
use crate::error::{Result, ScoutError};
use crate::http::{build_client, RetryPolicy};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Tool metadata handed to calling agents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Lookup tools in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn LookupTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the web search tool and every scholar tool, sharing one HTTP
    /// client and retry policy.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = build_client(&settings.http)?;
        let retry = RetryPolicy::from_settings(&settings.http);

        let mut registry = Self::new();
        registry.register(Arc::new(WebSearch::new(
            client.clone(),
            retry.clone(),
            &settings.web_search,
        )));

        let scholar = Arc::new(SerpApiScholar::new(client, retry, &settings.scholar));
        for tool in ScholarTool::all(scholar) {
            registry.register(Arc::new(tool));
        }

        info!("Registered {} lookup tools", registry.len());
        Ok(registry)
    }

    /// Add a tool. A tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, tool: Arc<dyn LookupTool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn LookupTool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Metadata for every registered tool.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: input_schema(&t.parameters()),
            })
            .collect()
    }

    /// Run a tool by name and render its records as text.
    pub async fn call(&self, name: &str, args: &Value) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| ScoutError::UnknownTool(name.to_string()))?;

        debug!("Calling tool {} with {}", name, args);
        let records = tool.call(args).await?;
        Ok(render(&records))
    }
}

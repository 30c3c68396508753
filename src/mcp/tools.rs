//! MCP tool definitions for Scout.

use super::protocol::Tool;
use crate::lookup::ToolRegistry;
use serde_json::json;

/// Registry tools plus the local PDF and canned-answer tools.
pub fn get_tools(registry: &ToolRegistry) -> Vec<Tool> {
    let mut tools: Vec<Tool> = registry
        .definitions()
        .into_iter()
        .map(|d| Tool {
            name: d.name,
            description: d.description,
            input_schema: d.input_schema,
        })
        .collect();

    tools.push(Tool {
        name: "read_pdf".to_string(),
        description: "Extract the text of a local PDF file, pages concatenated in order."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the PDF file"
                }
            },
            "required": ["path"]
        }),
    });
    tools.push(Tool {
        name: "ask".to_string(),
        description: "Answer a question from the canned-answer table. \
            Returns a fixed fallback when the question is not known."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The exact question to ask"
                }
            },
            "required": ["question"]
        }),
    });

    tools
}

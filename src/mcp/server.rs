//! MCP server implementation.

use super::protocol::*;
use super::tools::get_tools;
use crate::config::Settings;
use crate::document::extract_text;
use crate::lookup::ToolRegistry;
use crate::responder::CannedResponder;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "scout";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Scout.
pub struct McpServer {
    registry: ToolRegistry,
    responder: CannedResponder,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(registry: ToolRegistry, responder: CannedResponder) -> Self {
        Self {
            registry,
            responder,
        }
    }

    pub fn from_settings(settings: &Settings) -> crate::error::Result<Self> {
        Ok(Self::new(
            ToolRegistry::from_settings(settings)?,
            CannedResponder::from_settings(&settings.responder),
        ))
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        // Logs go to stderr so they don't interfere with JSON-RPC
        info!("Scout MCP server starting");

        for line in stdin.lock().lines() {
            let line = line?;
            if let Some(response) = self.handle_line(&line).await {
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Handle one input line. Notifications and blank lines produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        if line.trim().is_empty() {
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
            }
        };

        if request.id.is_none() {
            debug!("Notification: {}", request.method);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" | "notifications/initialized" | "ping" => {
                JsonRpcResponse::success(request.id, json!({}))
            }
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };
        respond_with(id, &result)
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: get_tools(&self.registry),
        };
        respond_with(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        &format!("Invalid params: {}", e),
                    )
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let args = params.arguments.unwrap_or_else(|| json!({}));
        let result = match params.name.as_str() {
            "read_pdf" => self.tool_read_pdf(&args).await,
            "ask" => self.tool_ask(&args),
            name => match self.registry.call(name, &args).await {
                Ok(text) => ToolCallResult::text(text),
                Err(e) => ToolCallResult::error(format!("{} failed: {}", name, e)),
            },
        };

        respond_with(id, &result)
    }

    async fn tool_read_pdf(&self, args: &Value) -> ToolCallResult {
        let path = match args.get("path").and_then(|v| v.as_str()) {
            Some(p) if !p.trim().is_empty() => Settings::expand_path(p),
            _ => return ToolCallResult::error("Missing 'path' argument".to_string()),
        };

        match read_pdf_blocking(path).await {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => ToolCallResult::error(format!("read_pdf failed: {}", e)),
        }
    }

    fn tool_ask(&self, args: &Value) -> ToolCallResult {
        match args.get("question").and_then(|v| v.as_str()) {
            Some(q) => ToolCallResult::text(self.responder.respond(q).to_string()),
            None => ToolCallResult::error("Missing 'question' argument".to_string()),
        }
    }
}

async fn read_pdf_blocking(path: PathBuf) -> anyhow::Result<String> {
    let text = tokio::task::spawn_blocking(move || extract_text(&path)).await??;
    Ok(text)
}

fn respond_with<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::scholar::tests::{paper, FakeProvider};
    use crate::lookup::scholar::ScholarTool;
    use std::sync::Arc;

    fn server() -> McpServer {
        let mut registry = ToolRegistry::new();
        let provider = Arc::new(FakeProvider {
            papers: vec![paper("GenTopia")],
            ..Default::default()
        });
        for tool in ScholarTool::all(provider) {
            registry.register(Arc::new(tool));
        }
        McpServer::new(registry, CannedResponder::default())
    }

    async fn call(server: &McpServer, line: &str) -> Value {
        let response = server.handle_line(line).await.expect("response");
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = call(
            &server(),
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        )
        .await;
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "scout");
    }

    #[tokio::test]
    async fn test_tools_list_includes_local_tools() {
        let response = call(&server(), r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        let names: Vec<_> = response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"search_paper".to_string()));
        assert!(names.contains(&"read_pdf".to_string()));
        assert!(names.contains(&"ask".to_string()));
        assert!(response["result"]["tools"][0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_registry_tool() {
        let response = call(
            &server(),
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"search_single_paper","arguments":{"title":"GenTopia"}}}"#,
        )
        .await;
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"title\":\"GenTopia\""));
        assert!(response["result"].get("isError").is_none());
    }

    #[tokio::test]
    async fn test_tools_call_ask_and_errors() {
        let s = server();
        let response = call(
            &s,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"ask","arguments":{"question":"unknown"}}}"#,
        )
        .await;
        assert_eq!(
            response["result"]["content"][0]["text"],
            "Sorry, I don't have information on that."
        );

        let response = call(
            &s,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"search_paper","arguments":{"title":"x","sort_by":"year"}}}"#,
        )
        .await;
        assert_eq!(response["result"]["isError"], true);

        let response = call(
            &s,
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"read_pdf","arguments":{"path":"/definitely/not/here.pdf"}}}"#,
        )
        .await;
        assert_eq!(response["result"]["isError"], true);
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let s = server();
        let response = call(&s, "not json").await;
        assert_eq!(response["error"]["code"], PARSE_ERROR);

        let response = call(&s, r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#).await;
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);

        let response = call(&s, r#"{"jsonrpc":"2.0","id":8,"method":"tools/call"}"#).await;
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let s = server();
        assert!(s
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
        assert!(s.handle_line("   ").await.is_none());
    }
}

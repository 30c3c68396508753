//! Scout - web, scholar and document lookups
//!
//! A small toolkit that answers questions from three kinds of source: the web,
//! Google Scholar and local PDF files. Every lookup is a named tool with a
//! JSON-schema description, so the same tools serve the CLI and AI assistants
//! over MCP.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `http` - Shared HTTP client and retry policy
//! - `lookup` - Lookup tools (web search, Google Scholar) and their registry
//! - `responder` - Canned answers keyed by exact question
//! - `document` - PDF text extraction
//! - `mcp` - MCP server over stdio
//!
//! # Example
//!
//! ```rust,no_run
//! use scout::config::Settings;
//! use scout::lookup::ToolRegistry;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let registry = ToolRegistry::from_settings(&settings)?;
//!
//!     let text = registry
//!         .call("search_paper", &json!({ "title": "GenTopia", "top_k": 3 }))
//!         .await?;
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod lookup;
pub mod mcp;
pub mod responder;

pub use error::{Result, ScoutError};

//! MCP (Model Context Protocol) server for Scout.
//!
//! Lets AI assistants call the lookup tools, the PDF reader and the canned
//! responder. Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;

//! The lookup tool contract.
//!
//! Every backend (web search, Google Scholar) is exposed as a [`LookupTool`]:
//! it declares a name, a description and a parameter schema for calling
//! agents, takes JSON arguments, makes its provider request(s) and returns a
//! bounded, provider-ordered list of [`LookupRecord`]s. [`render`] turns those
//! records into the text handed back to the caller, substituting
//! [`NO_RESULTS`] for an empty list.

mod record;
mod registry;
pub mod scholar;
mod sort;
pub mod web;

pub use record::{render, LookupRecord, NO_RESULTS};
pub use registry::{ToolDefinition, ToolRegistry};
pub use sort::{PaperSort, PublicationSort};

use crate::error::{Result, ScoutError};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// Result count used when the caller does not specify one.
pub const DEFAULT_LIMIT: usize = 5;

/// A single request to a lookup tool.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupQuery<S = ()> {
    /// Query text or provider identifier.
    pub target: String,
    pub sort: S,
    pub limit: usize,
}

impl LookupQuery<()> {
    /// Build an unsorted query, rejecting blank targets.
    pub fn new(target: impl Into<String>, limit: usize) -> Result<Self> {
        LookupQuery::sorted(target, (), limit)
    }
}

impl<S> LookupQuery<S> {
    /// Build a query with a sort criterion, rejecting blank targets.
    pub fn sorted(target: impl Into<String>, sort: S, limit: usize) -> Result<Self> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(ScoutError::InvalidInput(
                "query must not be empty".to_string(),
            ));
        }
        Ok(Self {
            target,
            sort,
            limit,
        })
    }
}

/// JSON type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
}

impl ParamType {
    fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
        }
    }
}

/// Declared parameter of a lookup tool.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<Value>,
    /// Accepted values, for enumerated string parameters.
    pub allowed: Option<&'static [&'static str]>,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            default: None,
            allowed: None,
        }
    }

    pub fn optional(
        name: &'static str,
        kind: ParamType,
        description: &'static str,
        default: Value,
    ) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            default: Some(default),
            allowed: None,
        }
    }

    /// Restrict the parameter to a fixed set of values.
    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }
}

/// Build a JSON-schema object from parameter declarations.
pub fn input_schema(params: &[ParamSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for p in params {
        let mut prop = json!({
            "type": p.kind.as_str(),
            "description": p.description,
        });
        if let Some(default) = &p.default {
            prop["default"] = default.clone();
        }
        if let Some(allowed) = p.allowed {
            prop["enum"] = json!(allowed);
        }
        if p.required {
            required.push(Value::String(p.name.to_string()));
        }
        properties.insert(p.name.to_string(), prop);
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// A tool that forwards a structured request to an external provider.
#[async_trait]
pub trait LookupTool: Send + Sync {
    /// Name agents use to call the tool.
    fn name(&self) -> &'static str;

    /// Free-text description for calling agents.
    fn description(&self) -> &'static str;

    /// Declared parameters.
    fn parameters(&self) -> Vec<ParamSpec>;

    /// Run the tool with JSON arguments.
    async fn call(&self, args: &Value) -> Result<Vec<LookupRecord>>;
}

/// Read a required, non-empty string argument.
pub(crate) fn string_arg(args: &Value, name: &str) -> Result<String> {
    match args.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(ScoutError::InvalidInput(format!(
            "'{}' must not be empty",
            name
        ))),
        Some(_) => Err(ScoutError::InvalidInput(format!(
            "'{}' must be a string",
            name
        ))),
        None => Err(ScoutError::InvalidInput(format!(
            "Missing '{}' argument",
            name
        ))),
    }
}

/// Read an optional string argument.
pub(crate) fn optional_string_arg(args: &Value, name: &str) -> Result<Option<String>> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ScoutError::InvalidInput(format!(
            "'{}' must be a string",
            name
        ))),
    }
}

/// Read a non-negative count argument, falling back to `default`.
pub(crate) fn limit_arg(args: &Value, name: &str, default: usize) -> Result<usize> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_u64().map(|n| n as usize).ok_or_else(|| {
            ScoutError::InvalidInput(format!("'{}' must be a non-negative integer", name))
        }),
    }
}

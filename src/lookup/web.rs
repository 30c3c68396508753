//! Web search tool backed by the DuckDuckGo HTML endpoint.

use super::{limit_arg, string_arg, LookupQuery, LookupRecord, LookupTool, ParamSpec, ParamType};
use crate::config::WebSearchSettings;
use crate::error::{Result, ScoutError};
use crate::http::{get_text, RetryPolicy};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};
use tracing::{debug, instrument};

const PROVIDER: &str = "duckduckgo";

/// Web search over DuckDuckGo's HTML results page.
pub struct WebSearch {
    client: Client,
    retry: RetryPolicy,
    endpoint: String,
    default_results: usize,
}

impl WebSearch {
    pub fn new(client: Client, retry: RetryPolicy, settings: &WebSearchSettings) -> Self {
        Self {
            client,
            retry,
            endpoint: settings.endpoint.clone(),
            default_results: settings.default_results,
        }
    }

    /// Search the web and return at most `query.limit` results in page order.
    #[instrument(skip(self, query), fields(target = %query.target, limit = query.limit))]
    pub async fn search(&self, query: &LookupQuery) -> Result<Vec<LookupRecord>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }

        let html = get_text(&self.retry, PROVIDER, || {
            self.client
                .get(&self.endpoint)
                .query(&[("q", query.target.as_str())])
        })
        .await?;

        let records = parse_results(&html, query.limit)?;
        debug!("Web search returned {} results", records.len());
        Ok(records)
    }
}

#[async_trait]
impl LookupTool for WebSearch {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        "Search the web. Input a query, return a list of pages with title, URL and snippet."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("query", ParamType::String, "Search query"),
            ParamSpec::optional(
                "num_results",
                ParamType::Integer,
                "Number of results to return",
                json!(self.default_results),
            ),
        ]
    }

    async fn call(&self, args: &Value) -> Result<Vec<LookupRecord>> {
        let target = string_arg(args, "query")?;
        let limit = limit_arg(args, "num_results", self.default_results)?;
        self.search(&LookupQuery::new(target, limit)?).await
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScoutError::decode(PROVIDER, e.to_string()))
}

/// Extract organic results from a DuckDuckGo HTML page.
pub fn parse_results(html: &str, limit: usize) -> Result<Vec<LookupRecord>> {
    let document = Html::parse_document(html);
    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut records = Vec::new();
    for result in document.select(&result_sel) {
        if records.len() >= limit {
            break;
        }
        if is_ad(&result) {
            continue;
        }
        let Some(anchor) = result.select(&title_sel).next() else {
            continue;
        };
        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| ScoutError::decode(PROVIDER, "result link has no href"))?;

        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(|s| collapse_text(&s))
            .unwrap_or_default();

        records.push(
            LookupRecord::new()
                .with("title", collapse_text(&anchor))
                .with("url", unwrap_redirect(href))
                .with("snippet", snippet),
        );
    }

    Ok(records)
}

fn is_ad(result: &ElementRef<'_>) -> bool {
    result.value().classes().any(|c| c == "result--ad")
}

fn collapse_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// DuckDuckGo wraps targets as `//duckduckgo.com/l/?uddg=<encoded>`.
fn unwrap_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    match url::Url::parse(&absolute) {
        Ok(parsed) if parsed.path() == "/l/" => parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
            .unwrap_or(absolute),
        _ => absolute,
    }
}

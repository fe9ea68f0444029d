//! spider_search tool implementation.
//!
//! Runs a web search through Spider and optionally crawls each result.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spindle_client::{SearchRequest, SpiderClient};
use spindle_core::{AppConfig, Error};

use crate::tools::{options::PageOptionsParams, respond};

/// Input parameters for spider_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Search query (required).
    pub search: String,

    /// Maximum number of result URLs to crawl.
    #[serde(default)]
    pub search_limit: Option<u32>,

    /// Fetch the content of each result page (default: false).
    #[serde(default)]
    pub fetch_page_content: Option<bool>,

    /// Country of the search engine (ISO 3166-1 alpha-2, e.g., "us").
    #[serde(default)]
    pub country: Option<String>,

    /// Result language (ISO 639-1, e.g., "en").
    #[serde(default)]
    pub language: Option<String>,

    /// Number of results per page (1-100).
    #[serde(default)]
    pub num: Option<u32>,

    /// Result page, starting at 1.
    #[serde(default)]
    pub page: Option<u32>,

    /// Stream results as JSONL (defaults to the server setting).
    #[serde(default)]
    pub stream: Option<bool>,

    #[serde(flatten)]
    pub options: PageOptionsParams,
}

/// Implementation of the spider_search tool.
pub async fn search_impl(
    client: &SpiderClient, config: &AppConfig, params: SearchParams,
) -> Result<CallToolResult, McpError> {
    if params.search.trim().is_empty() {
        return Err(Error::InvalidInput("search cannot be empty".into()).into());
    }

    let stream = params.stream.unwrap_or(config.stream);
    let req = SearchRequest {
        search: params.search.trim().to_string(),
        search_limit: params.search_limit,
        fetch_page_content: params.fetch_page_content,
        country: params.country.map(|c| c.to_ascii_lowercase()),
        language: params.language.map(|l| l.to_ascii_lowercase()),
        num: params.num,
        page: params.page,
        options: params.options.into_options()?,
    };

    tracing::debug!(query = %req.search, "search requested");

    let response = client.send(&req, stream).await.map_err(Error::from)?;
    respond(response)
}

//! spider_scrape tool implementation.
//!
//! Fetches exactly the given page(s) without following links.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spindle_client::{ScrapeRequest, SpiderClient};
use spindle_core::{AppConfig, Error};

use crate::tools::{options::PageOptionsParams, respond, target_url};

/// Input parameters for spider_scrape tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeParams {
    /// Page URL, or several comma-separated URLs (required).
    pub url: String,

    /// Stream results as JSONL (defaults to the server setting).
    #[serde(default)]
    pub stream: Option<bool>,

    #[serde(flatten)]
    pub options: PageOptionsParams,
}

/// Implementation of the spider_scrape tool.
pub async fn scrape_impl(
    client: &SpiderClient, config: &AppConfig, params: ScrapeParams,
) -> Result<CallToolResult, McpError> {
    let stream = params.stream.unwrap_or(config.stream);
    let req = ScrapeRequest { url: target_url(&params.url)?, options: params.options.into_options()? };

    let response = client.send(&req, stream).await.map_err(Error::from)?;
    respond(response)
}

//! spider_crawl tool implementation.
//!
//! Crawls a site starting from one or more URLs and returns every page found.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spindle_client::{CrawlRequest, SpiderClient};
use spindle_core::{AppConfig, Error};

use crate::tools::{options::PageOptionsParams, respond, target_url};

/// Input parameters for spider_crawl tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CrawlParams {
    /// Start URL, or several comma-separated URLs (required).
    pub url: String,

    /// Maximum number of pages to crawl (0 = no limit).
    #[serde(default)]
    pub limit: Option<u32>,

    /// Maximum link depth from the start URL (0-250).
    #[serde(default)]
    pub depth: Option<u32>,

    /// Stream results as JSONL (defaults to the server setting).
    #[serde(default)]
    pub stream: Option<bool>,

    #[serde(flatten)]
    pub options: PageOptionsParams,
}

impl CrawlParams {
    /// Build the request body shared by crawl and links.
    pub(crate) fn into_request(self) -> Result<CrawlRequest, Error> {
        Ok(CrawlRequest {
            url: target_url(&self.url)?,
            limit: self.limit,
            depth: self.depth,
            options: self.options.into_options()?,
        })
    }
}

/// Implementation of the spider_crawl tool.
pub async fn crawl_impl(
    client: &SpiderClient, config: &AppConfig, params: CrawlParams,
) -> Result<CallToolResult, McpError> {
    let stream = params.stream.unwrap_or(config.stream);
    let req = params.into_request()?;

    tracing::debug!(url = %req.url, limit = ?req.limit, "crawl requested");

    let response = client.send(&req, stream).await.map_err(Error::from)?;
    respond(response)
}

//! spider_links tool implementation.
//!
//! Crawls like spider_crawl but only returns the discovered links.

use rmcp::{ErrorData as McpError, model::*};
use spindle_client::{LinksRequest, SpiderClient};
use spindle_core::{AppConfig, Error};

use crate::tools::{crawl::CrawlParams, respond};

/// Input parameters for spider_links tool; same fields as spider_crawl.
pub type LinksParams = CrawlParams;

/// Implementation of the spider_links tool.
pub async fn links_impl(
    client: &SpiderClient, config: &AppConfig, params: LinksParams,
) -> Result<CallToolResult, McpError> {
    let stream = params.stream.unwrap_or(config.stream);
    let req = LinksRequest(params.into_request()?);

    let response = client.send(&req, stream).await.map_err(Error::from)?;
    respond(response)
}

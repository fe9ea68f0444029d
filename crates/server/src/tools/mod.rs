//! MCP tool implementations.
//!
//! Each tool maps its parameters onto one Spider endpoint and returns the
//! response as pretty-printed JSON text.

pub mod crawl;
pub mod links;
pub mod options;
pub mod scrape;
pub mod screenshot;
pub mod search;
pub mod transform;

pub use crawl::{CrawlParams, crawl_impl};
pub use links::{LinksParams, links_impl};
pub use scrape::{ScrapeParams, scrape_impl};
pub use screenshot::{ScreenshotParams, screenshot_impl};
pub use search::{SearchParams, search_impl};
pub use transform::{TransformParams, transform_impl};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use spindle_client::{SpiderResponse, canonicalize_list};
use spindle_core::Error;

/// Canonicalize the `url` argument (one URL or a comma-separated list).
pub(crate) fn target_url(url: &str) -> Result<String, Error> {
    canonicalize_list(url).map_err(|e| Error::InvalidUrl(format!("{e}: {url}")))
}

/// Render a Spider response as the tool result.
pub(crate) fn respond(response: SpiderResponse) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(&response.into_value())
        .map_err(|e| Error::Parse(format!("Failed to serialize response: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

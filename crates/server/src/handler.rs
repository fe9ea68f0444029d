//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    CrawlParams, LinksParams, ScrapeParams, ScreenshotParams, SearchParams, TransformParams, crawl_impl, links_impl,
    scrape_impl, screenshot_impl, search_impl, transform_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use spindle_client::SpiderClient;
use spindle_core::AppConfig;

/// The main MCP server handler for mcp-spider.
#[derive(Clone)]
pub struct McpSpiderServer {
    tool_router: ToolRouter<Self>,
    client: SpiderClient,
    config: Arc<AppConfig>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl McpSpiderServer {
    /// Create a new server handler around a configured client.
    pub fn new(client: SpiderClient, config: AppConfig) -> Self {
        Self { tool_router: Self::tool_router(), client, config: Arc::new(config) }
    }

    #[tool(
        description = "Crawl a website starting from a URL and return the content of every page found. \
                       Use limit and depth to bound the crawl."
    )]
    async fn spider_crawl(&self, params: Parameters<CrawlParams>) -> Result<CallToolResult, McpError> {
        crawl_impl(&self.client, &self.config, params.0).await
    }

    #[tool(description = "Scrape a single page (or comma-separated pages) without following links.")]
    async fn spider_scrape(&self, params: Parameters<ScrapeParams>) -> Result<CallToolResult, McpError> {
        scrape_impl(&self.client, &self.config, params.0).await
    }

    #[tool(description = "Search the web and optionally crawl each result for its content.")]
    async fn spider_search(&self, params: Parameters<SearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.client, &self.config, params.0).await
    }

    #[tool(description = "Crawl a website and return only the links discovered on each page.")]
    async fn spider_links(&self, params: Parameters<LinksParams>) -> Result<CallToolResult, McpError> {
        links_impl(&self.client, &self.config, params.0).await
    }

    #[tool(description = "Capture screenshots of one or more pages. Images are returned base64-encoded.")]
    async fn spider_screenshot(&self, params: Parameters<ScreenshotParams>) -> Result<CallToolResult, McpError> {
        screenshot_impl(&self.client, &self.config, params.0).await
    }

    /// No network fetch of the pages themselves; the HTML is supplied by the caller.
    #[tool(description = "Convert HTML to markdown or plain text. No pages are fetched.")]
    async fn spider_transform(&self, params: Parameters<TransformParams>) -> Result<CallToolResult, McpError> {
        transform_impl(&self.client, params.0).await
    }
}

impl ServerHandler for McpSpiderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-spider".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Crawl, scrape, search and screenshot the web through the Spider API. \
                 Results are returned as JSON."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

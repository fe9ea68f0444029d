//! spider_transform tool implementation.
//!
//! Converts caller-supplied HTML to markdown or text. No crawling happens, so
//! the response is always read as a single document.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spindle_client::{SpiderClient, TransformInput, TransformRequest};
use spindle_core::Error;

use crate::tools::{options::parse_return_format, respond};

/// One HTML document to transform.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TransformItem {
    /// Raw HTML content.
    pub html: String,

    /// Source URL used to resolve relative links (optional).
    #[serde(default)]
    pub url: Option<String>,
}

/// Input parameters for spider_transform tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TransformParams {
    /// Documents to transform (at least one).
    pub data: Vec<TransformItem>,

    /// Output format: markdown (default), commonmark, raw, text, html2text, bytes, empty.
    #[serde(default)]
    pub return_format: Option<String>,

    /// Keep only the main content.
    #[serde(default)]
    pub readability: Option<bool>,

    /// Strip unwanted attributes.
    #[serde(default)]
    pub clean: Option<bool>,

    /// Also strip navigation, footers and other boilerplate.
    #[serde(default)]
    pub clean_full: Option<bool>,
}

/// Implementation of the spider_transform tool.
pub async fn transform_impl(client: &SpiderClient, params: TransformParams) -> Result<CallToolResult, McpError> {
    let req = TransformRequest {
        data: params
            .data
            .into_iter()
            .map(|item| TransformInput { html: item.html, url: item.url })
            .collect(),
        return_format: parse_return_format(params.return_format.as_deref())?,
        readability: params.readability,
        clean: params.clean,
        clean_full: params.clean_full,
    };

    let response = client.send(&req, false).await.map_err(Error::from)?;
    respond(response)
}

//! spider_screenshot tool implementation.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spindle_client::{ScreenshotRequest, SpiderClient};
use spindle_core::{AppConfig, Error};

use crate::tools::{options::PageOptionsParams, respond, target_url};

/// Input parameters for spider_screenshot tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScreenshotParams {
    /// Page URL, or several comma-separated URLs (required).
    pub url: String,

    /// Maximum number of pages to capture (0 = no limit).
    #[serde(default)]
    pub limit: Option<u32>,

    /// Maximum link depth from the start URL (0-250).
    #[serde(default)]
    pub depth: Option<u32>,

    /// Capture the full scrollable page instead of the viewport.
    #[serde(default)]
    pub full_page: Option<bool>,

    /// Make the default white background transparent.
    #[serde(default)]
    pub omit_background: Option<bool>,

    /// Return raw image bytes instead of base64.
    #[serde(default)]
    pub binary: Option<bool>,

    /// Stream results as JSONL (defaults to the server setting).
    #[serde(default)]
    pub stream: Option<bool>,

    #[serde(flatten)]
    pub options: PageOptionsParams,
}

/// Implementation of the spider_screenshot tool.
pub async fn screenshot_impl(
    client: &SpiderClient, config: &AppConfig, params: ScreenshotParams,
) -> Result<CallToolResult, McpError> {
    let stream = params.stream.unwrap_or(config.stream);
    let req = ScreenshotRequest {
        url: target_url(&params.url)?,
        limit: params.limit,
        depth: params.depth,
        full_page: params.full_page,
        omit_background: params.omit_background,
        binary: params.binary,
        options: params.options.into_options()?,
    };

    let response = client.send(&req, stream).await.map_err(Error::from)?;
    respond(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{client_for, config, result_json};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_screenshot_full_page() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/screenshot"))
            .and(body_json(json!({"url": "https://example.com/", "limit": 1, "full_page": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "{\"url\":\"https://example.com/\",\"content\":\"iVBORw0KGgo=\"}\n",
                "application/jsonl",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let params = ScreenshotParams {
            url: "https://example.com".into(),
            limit: Some(1),
            full_page: Some(true),
            ..Default::default()
        };

        let result = screenshot_impl(&client_for(&server), &config(true), params).await.unwrap();
        assert_eq!(result_json(&result)[0]["content"], "iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_screenshot_invalid_url() {
        let server = MockServer::start().await;
        let params = ScreenshotParams { url: String::new(), ..Default::default() };

        let err = screenshot_impl(&client_for(&server), &config(true), params).await.unwrap_err();
        assert_eq!(err.code.0, -32003);
    }
}

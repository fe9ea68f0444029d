//! Spider API request types and validation.
//!
//! Request bodies are serialized as-is; every optional field is skipped when
//! unset so the service applies its own defaults.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::spider::SpiderError;

/// Spider API endpoints exposed as tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Crawl,
    Scrape,
    Search,
    Links,
    Screenshot,
    Transform,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Crawl => "crawl",
            Endpoint::Scrape => "scrape",
            Endpoint::Search => "search",
            Endpoint::Links => "links",
            Endpoint::Screenshot => "screenshot",
            Endpoint::Transform => "transform",
        }
    }
}

/// Format of the page content returned by Spider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReturnFormat {
    Markdown,
    Commonmark,
    Raw,
    Text,
    Html2text,
    Bytes,
    Empty,
}

impl FromStr for ReturnFormat {
    type Err = SpiderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Self::Markdown),
            "commonmark" => Ok(Self::Commonmark),
            "raw" => Ok(Self::Raw),
            "text" => Ok(Self::Text),
            "html2text" => Ok(Self::Html2text),
            "bytes" => Ok(Self::Bytes),
            "empty" => Ok(Self::Empty),
            other => Err(SpiderError::InvalidRequest(format!(
                "invalid return_format: {other} (expected markdown, commonmark, raw, text, html2text, bytes or empty)"
            ))),
        }
    }
}

/// How Spider fetches each page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Http,
    Chrome,
    Smart,
}

impl FromStr for RequestKind {
    type Err = SpiderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Self::Http),
            "chrome" => Ok(Self::Chrome),
            "smart" => Ok(Self::Smart),
            other => Err(SpiderError::InvalidRequest(format!(
                "invalid request: {other} (expected http, chrome or smart)"
            ))),
        }
    }
}

/// Page options shared by the crawl-style endpoints.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_format: Option<ReturnFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_page_links: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_headers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomains: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tld: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anti_bot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stealth: Option<bool>,
    /// Locale such as "en-US".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// ISO 3166-1 alpha-2 country for the proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Paths or regexes to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<Vec<String>>,
    /// Paths or regexes to restrict the crawl to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,
    /// Per-page timeout in seconds (5-60).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u8>,
    /// Maximum pages per path, e.g. `{"*": 100, "/docs": 10}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BTreeMap<String, u32>>,
}

impl PageOptions {
    /// Validate option ranges.
    pub fn validate(&self) -> Result<(), SpiderError> {
        if let Some(timeout) = self.request_timeout
            && !(5..=60).contains(&timeout)
        {
            return Err(SpiderError::InvalidRequest("request_timeout must be 5-60 seconds".into()));
        }

        if let Some(code) = &self.country_code
            && (code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(SpiderError::InvalidRequest(format!("invalid country_code: {code}")));
        }

        Ok(())
    }
}

/// Maximum crawl depth accepted by the service.
const MAX_DEPTH: u32 = 250;

/// A request body bound to one endpoint.
pub trait SpiderRequest: Serialize {
    const ENDPOINT: Endpoint;

    /// Validate the request before it is sent.
    fn validate(&self) -> Result<(), SpiderError>;
}

fn require_url(url: &str) -> Result<(), SpiderError> {
    if url.trim().is_empty() {
        return Err(SpiderError::InvalidRequest("url cannot be empty".into()));
    }
    Ok(())
}

fn check_depth(depth: Option<u32>) -> Result<(), SpiderError> {
    if let Some(depth) = depth
        && depth > MAX_DEPTH
    {
        return Err(SpiderError::InvalidRequest(format!("depth must be at most {MAX_DEPTH}")));
    }
    Ok(())
}

/// Body for `/crawl`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlRequest {
    /// One URL or several comma-separated URLs.
    pub url: String,
    /// Maximum pages to crawl; 0 means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(flatten)]
    pub options: PageOptions,
}

impl SpiderRequest for CrawlRequest {
    const ENDPOINT: Endpoint = Endpoint::Crawl;

    fn validate(&self) -> Result<(), SpiderError> {
        require_url(&self.url)?;
        check_depth(self.depth)?;
        self.options.validate()
    }
}

/// Body for `/links`; same shape as a crawl, but only links come back.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinksRequest(pub CrawlRequest);

impl SpiderRequest for LinksRequest {
    const ENDPOINT: Endpoint = Endpoint::Links;

    fn validate(&self) -> Result<(), SpiderError> {
        self.0.validate()
    }
}

/// Body for `/scrape` (a single page per URL).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(flatten)]
    pub options: PageOptions,
}

impl SpiderRequest for ScrapeRequest {
    const ENDPOINT: Endpoint = Endpoint::Scrape;

    fn validate(&self) -> Result<(), SpiderError> {
        require_url(&self.url)?;
        self.options.validate()
    }
}

/// Body for `/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchRequest {
    /// Search query.
    pub search: String,
    /// Maximum number of result URLs to crawl.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_limit: Option<u32>,
    /// Crawl each result and include its content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_page_content: Option<bool>,
    /// Country of the search engine (ISO 3166-1 alpha-2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Language of the results (ISO 639-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Results per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
    /// Result page, starting at 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(flatten)]
    pub options: PageOptions,
}

impl SpiderRequest for SearchRequest {
    const ENDPOINT: Endpoint = Endpoint::Search;

    fn validate(&self) -> Result<(), SpiderError> {
        if self.search.trim().is_empty() {
            return Err(SpiderError::InvalidRequest("search cannot be empty".into()));
        }

        if let Some(num) = self.num
            && !(1..=100).contains(&num)
        {
            return Err(SpiderError::InvalidRequest("num must be 1-100".into()));
        }

        if self.page == Some(0) {
            return Err(SpiderError::InvalidRequest("page starts at 1".into()));
        }

        self.options.validate()
    }
}

/// Body for `/screenshot`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScreenshotRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    /// Capture the full scrollable page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_page: Option<bool>,
    /// Transparent background where the page allows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omit_background: Option<bool>,
    /// Return raw image bytes instead of base64.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<bool>,
    #[serde(flatten)]
    pub options: PageOptions,
}

impl SpiderRequest for ScreenshotRequest {
    const ENDPOINT: Endpoint = Endpoint::Screenshot;

    fn validate(&self) -> Result<(), SpiderError> {
        require_url(&self.url)?;
        check_depth(self.depth)?;
        self.options.validate()
    }
}

/// One HTML document for `/transform`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformInput {
    pub html: String,
    /// Source URL, used to resolve relative links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Body for `/transform` (HTML conversion, no crawling).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformRequest {
    pub data: Vec<TransformInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_format: Option<ReturnFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<bool>,
    /// Strip unwanted attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    /// Strip footers, navigation and other boilerplate as well.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_full: Option<bool>,
}

impl SpiderRequest for TransformRequest {
    const ENDPOINT: Endpoint = Endpoint::Transform;

    fn validate(&self) -> Result<(), SpiderError> {
        if self.data.is_empty() {
            return Err(SpiderError::InvalidRequest("data cannot be empty".into()));
        }

        if let Some(idx) = self.data.iter().position(|d| d.html.trim().is_empty()) {
            return Err(SpiderError::InvalidRequest(format!("data[{idx}].html cannot be empty")));
        }

        Ok(())
    }
}

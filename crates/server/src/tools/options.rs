//! Page options shared by the crawl-style tools.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spindle_client::{PageOptions, RequestKind, ReturnFormat};
use spindle_core::Error;

/// Optional page settings accepted by crawl, scrape, search, links and screenshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PageOptionsParams {
    /// Content format: markdown, commonmark, raw (default), text, html2text, bytes, empty.
    #[serde(default)]
    pub return_format: Option<String>,

    /// Fetch strategy: http, chrome, or smart (default; switches to chrome when needed).
    #[serde(default)]
    pub request: Option<String>,

    /// Run readability to keep only the main content.
    #[serde(default)]
    pub readability: Option<bool>,

    /// Include page metadata (title, description, keywords).
    #[serde(default)]
    pub metadata: Option<bool>,

    /// Include the links found on each page.
    #[serde(default)]
    pub return_page_links: Option<bool>,

    /// Include the HTTP response headers of each page.
    #[serde(default)]
    pub return_headers: Option<bool>,

    /// Follow links into subdomains.
    #[serde(default)]
    pub subdomains: Option<bool>,

    /// Follow links into other top-level domains of the same site.
    #[serde(default)]
    pub tld: Option<bool>,

    /// Use Spider's HTTP cache.
    #[serde(default)]
    pub cache: Option<bool>,

    /// Route requests through premium proxies.
    #[serde(default)]
    pub proxy_enabled: Option<bool>,

    /// Enable anti-bot measures.
    #[serde(default)]
    pub anti_bot: Option<bool>,

    /// Use stealth mode for headless browsing.
    #[serde(default)]
    pub stealth: Option<bool>,

    /// Locale, e.g. "en-US".
    #[serde(default)]
    pub locale: Option<String>,

    /// Two-letter proxy country, e.g. "US".
    #[serde(default)]
    pub country_code: Option<String>,

    /// Paths to exclude from the crawl.
    #[serde(default)]
    pub blacklist: Option<Vec<String>>,

    /// Paths to restrict the crawl to.
    #[serde(default)]
    pub whitelist: Option<Vec<String>>,

    /// Per-page timeout in seconds (5-60).
    #[serde(default)]
    pub request_timeout: Option<u8>,

    /// Page budget per path, e.g. {"*": 100, "/blog": 10}.
    #[serde(default)]
    pub budget: Option<BTreeMap<String, u32>>,
}

impl PageOptionsParams {
    /// Convert into request options, rejecting unknown enumerated values.
    pub fn into_options(self) -> Result<PageOptions, Error> {
        Ok(PageOptions {
            return_format: parse_return_format(self.return_format.as_deref())?,
            request: self
                .request
                .as_deref()
                .map(str::parse::<RequestKind>)
                .transpose()?,
            readability: self.readability,
            metadata: self.metadata,
            return_page_links: self.return_page_links,
            return_headers: self.return_headers,
            subdomains: self.subdomains,
            tld: self.tld,
            cache: self.cache,
            proxy_enabled: self.proxy_enabled,
            anti_bot: self.anti_bot,
            stealth: self.stealth,
            locale: self.locale,
            country_code: self.country_code.map(|c| c.to_ascii_uppercase()),
            blacklist: self.blacklist,
            whitelist: self.whitelist,
            request_timeout: self.request_timeout,
            budget: self.budget,
        })
    }
}

/// Parse an optional return format name.
pub fn parse_return_format(value: Option<&str>) -> Result<Option<ReturnFormat>, Error> {
    Ok(value.map(str::parse::<ReturnFormat>).transpose()?)
}

//! Client code for mcp-spider.
//!
//! This crate provides the Spider HTTP client, the incremental JSONL decoder
//! used for streamed responses, and URL canonicalization for crawl targets.

pub mod jsonl;
pub mod spider;
pub mod urls;

pub use jsonl::{JsonlDecoder, decode_jsonl};
pub use spider::{
    CrawlRequest, Endpoint, LinksRequest, PageOptions, RequestKind, ReturnFormat, ScrapeRequest, ScreenshotRequest,
    SearchRequest, SpiderClient, SpiderConfig, SpiderError, SpiderRequest, SpiderResponse, TransformInput,
    TransformRequest,
};
pub use urls::{UrlError, canonicalize, canonicalize_list};

//! Spider API client.
//!
//! Thin HTTP layer over the Spider crawling service.
//!
//! ### Protocol
//!
//! - **Endpoint**: `POST {base_url}/{crawl|scrape|search|links|screenshot|transform}`
//! - **Authentication**: `Authorization: Bearer <api key>`.
//! - **Streaming**: sending `Content-Type: application/jsonl` asks the service to
//!   stream one JSON record per line. Whatever was asked for, the body is decoded
//!   according to the response's own `Content-Type`: line-delimited bodies go
//!   through [`crate::jsonl::decode_jsonl`], anything else is parsed as one document.
//! - **Status mapping**: 401/403 auth, 402 credits, 429 rate limit, other
//!   4xx/5xx carry the status and a truncated body.
//! - **Timeouts**: the configured timeout bounds connecting and every wait for
//!   body data. Streamed crawls run as long as records keep arriving; only
//!   non-streamed requests get a total deadline.

pub mod error;
pub mod request;
pub mod response;

pub use error::SpiderError;
pub use request::{
    CrawlRequest, Endpoint, LinksRequest, PageOptions, RequestKind, ReturnFormat, ScrapeRequest, ScreenshotRequest,
    SearchRequest, SpiderRequest, TransformInput, TransformRequest,
};
pub use response::{SpiderResponse, is_line_delimited};

use reqwest::header;
use serde_json::Value;
use spindle_core::AppConfig;
use spindle_core::config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::jsonl::decode_jsonl;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Content type that asks Spider to stream JSONL.
pub const JSONL_CONTENT_TYPE: &str = "application/jsonl";

/// Longest error body kept in `SpiderError::HttpError`.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Spider client configuration.
#[derive(Debug, Clone)]
pub struct SpiderConfig {
    /// API key.
    pub api_key: String,
    /// Base URL (default: https://api.spider.cloud).
    pub base_url: String,
    /// Connect and idle-read timeout; also the total deadline for non-streamed
    /// requests (default: 120s).
    pub timeout: Duration,
    /// User-agent string (default: mcp-spider/0.x).
    pub user_agent: String,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SpiderConfig {
    /// Build from the loaded application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SpiderError> {
        let api_key = config.require_api_key().map_err(|_| SpiderError::MissingApiKey)?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Spider API client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SpiderClient {
    http: reqwest::Client,
    config: Arc<SpiderConfig>,
}

impl SpiderClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SpiderConfig) -> Result<Self, SpiderError> {
        if config.api_key.trim().is_empty() {
            return Err(SpiderError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| SpiderError::Network(Arc::new(e)))?;

        Ok(Self { http, config: Arc::new(config) })
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint.path())
    }

    /// Validate and send a request, decoding the body by its content type.
    ///
    /// `stream` selects the requested format; the response headers decide how
    /// the body is actually read.
    pub async fn send<R: SpiderRequest>(&self, req: &R, stream: bool) -> Result<SpiderResponse, SpiderError> {
        req.validate()?;

        let start = Instant::now();
        let endpoint = R::ENDPOINT;
        let url = self.endpoint_url(endpoint);
        let body = serde_json::to_vec(req).map_err(|e| SpiderError::InvalidRequest(e.to_string()))?;
        let content_type = if stream { JSONL_CONTENT_TYPE } else { "application/json" };

        tracing::debug!(endpoint = endpoint.path(), stream, "sending Spider request");

        let mut builder = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::ACCEPT, "application/json, application/jsonl")
            .body(body);
        if !stream {
            builder = builder.timeout(self.config.timeout);
        }

        let http_response = builder.send().await?;

        let status = http_response.status();
        tracing::debug!(endpoint = endpoint.path(), %status, "Spider response status");

        match status.as_u16() {
            401 | 403 => return Err(SpiderError::AuthError),
            402 => return Err(SpiderError::InsufficientCredits),
            429 => return Err(SpiderError::RateLimited),
            _ => {}
        }

        if status.is_client_error() || status.is_server_error() {
            let body = http_response.text().await.unwrap_or_else(|e| {
                tracing::debug!(%status, error = %e, "failed to read error body");
                String::new()
            });
            return Err(SpiderError::HttpError {
                status: status.as_u16(),
                body: response::truncate_body(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let response = if is_line_delimited(http_response.headers()) {
            let records = decode_jsonl(http_response.bytes_stream())
                .await
                .map_err(SpiderError::from_body)?;
            SpiderResponse::Records(records)
        } else {
            let bytes = http_response.bytes().await.map_err(SpiderError::from_body)?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                SpiderResponse::Document(Value::Null)
            } else {
                SpiderResponse::Document(serde_json::from_slice(&bytes).map_err(|e| SpiderError::Parse(e.to_string()))?)
            }
        };

        tracing::debug!(
            endpoint = endpoint.path(),
            streamed = response.is_streamed(),
            records = response.record_count(),
            "Spider request completed in {:?}",
            start.elapsed()
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Read one full HTTP request (headers plus content-length body).
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    return;
                }
            }
        }
    }

    const JSONL_HEAD: &[u8] =
        b"HTTP/1.1 200 OK\r\ncontent-type: application/jsonl\r\ntransfer-encoding: chunked\r\n\r\n";

    /// Serve one chunked response, writing each part after its delay, then
    /// close the connection.
    async fn serve_chunked(head: &'static [u8], parts: Vec<(Duration, Vec<u8>)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            if socket.write_all(head).await.is_err() {
                return;
            }
            for (delay, bytes) in parts {
                tokio::time::sleep(delay).await;
                if socket.write_all(&bytes).await.is_err() || socket.flush().await.is_err() {
                    return;
                }
            }
        });

        format!("http://{addr}")
    }

    fn chunk(data: &str) -> Vec<u8> {
        format!("{:x}\r\n{data}\r\n", data.len()).into_bytes()
    }

    fn raw_client(base_url: String, timeout: Duration) -> SpiderClient {
        SpiderClient::new(SpiderConfig { api_key: "test-key".into(), base_url, timeout, ..Default::default() }).unwrap()
    }

    async fn client_for(server: &MockServer) -> SpiderClient {
        SpiderClient::new(SpiderConfig {
            api_key: "test-key".into(),
            base_url: format!("{}/", server.uri()),
            ..Default::default()
        })
        .unwrap()
    }

    fn crawl(url: &str) -> CrawlRequest {
        CrawlRequest { url: url.into(), limit: Some(2), ..Default::default() }
    }

    #[test]
    fn test_client_new_missing_key() {
        let result = SpiderClient::new(SpiderConfig::default());
        assert!(matches!(result, Err(SpiderError::MissingApiKey)));
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { api_key: Some("k".into()), timeout_ms: 5_000, ..Default::default() };
        let config = SpiderConfig::from_app_config(&app).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.base_url, "https://api.spider.cloud");

        let missing = SpiderConfig::from_app_config(&AppConfig::default());
        assert!(matches!(missing, Err(SpiderError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_streamed_crawl_decodes_records() {
        let server = MockServer::start().await;
        let body = "{\"url\":\"https://example.com/\",\"content\":\"# Home\"}\r\n\
                    not json\n\
                    \n\
                    {\"url\":\"https://example.com/about\",\"content\":\"Über\"}";

        Mock::given(method("POST"))
            .and(path("/crawl"))
            .and(header_eq("authorization", "Bearer test-key"))
            .and(header_eq("content-type", JSONL_CONTENT_TYPE))
            .and(body_partial_json(json!({"url": "https://example.com", "limit": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/jsonl"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client.send(&crawl("https://example.com"), true).await.unwrap();

        assert_eq!(
            response,
            SpiderResponse::Records(vec![
                json!({"url": "https://example.com/", "content": "# Home"}),
                json!({"url": "https://example.com/about", "content": "Über"}),
            ])
        );
    }

    #[tokio::test]
    async fn test_single_document_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scrape"))
            .and(header_eq("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"url": "https://example.com/", "status": 200}])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let req = ScrapeRequest { url: "https://example.com/".into(), ..Default::default() };
        let response = client.send(&req, false).await.unwrap();

        assert!(!response.is_streamed());
        assert_eq!(response.into_value(), json!([{"url": "https://example.com/", "status": 200}]));
    }

    #[tokio::test]
    async fn test_jsonl_requested_but_document_returned() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let req = SearchRequest { search: "rust crawler".into(), ..Default::default() };
        let response = client.send(&req, true).await.unwrap();

        assert_eq!(response, SpiderResponse::Document(json!({"content": []})));
    }

    #[tokio::test]
    async fn test_empty_document_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/links"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client.send(&LinksRequest(crawl("https://example.com")), false).await.unwrap();
        assert_eq!(response, SpiderResponse::Document(Value::Null));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases: [(u16, fn(&SpiderError) -> bool); 4] = [
            (401, |e| matches!(e, SpiderError::AuthError)),
            (402, |e| matches!(e, SpiderError::InsufficientCredits)),
            (429, |e| matches!(e, SpiderError::RateLimited)),
            (503, |e| matches!(e, SpiderError::HttpError { status: 503, body } if body == "maintenance")),
        ];

        for (status, check) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/crawl"))
                .respond_with(ResponseTemplate::new(status).set_body_string("maintenance"))
                .mount(&server)
                .await;

            let client = client_for(&server).await;
            let err = client.send(&crawl("https://example.com"), true).await.unwrap_err();
            assert!(check(&err), "status {status} produced {err:?}");
        }
    }

    #[tokio::test]
    async fn test_invalid_document_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/transform"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "application/json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let req = TransformRequest {
            data: vec![TransformInput { html: "<p>hi</p>".into(), url: None }],
            ..Default::default()
        };
        let err = client.send(&req, false).await.unwrap_err();
        assert!(matches!(err, SpiderError::Parse(_)));
    }

    #[tokio::test]
    async fn test_invalid_request_not_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.send(&CrawlRequest::default(), true).await.unwrap_err();
        assert!(matches!(err, SpiderError::InvalidRequest(_)));
    }

    #[test]
    fn test_default_user_agent_matches_app_config() {
        assert_eq!(SpiderConfig::default().user_agent, AppConfig::default().user_agent);
    }

    #[tokio::test]
    async fn test_json_seq_body_is_parsed_as_document() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/crawl"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("\u{1e}{\"a\":1}\n\u{1e}{\"b\":2}\n", "application/json-seq"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.send(&crawl("https://example.com"), true).await.unwrap_err();
        assert!(matches!(err, SpiderError::Parse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_slow_stream_outlives_timeout() {
        let step = Duration::from_millis(150);
        let parts = (0..5)
            .map(|i| (step, chunk(&format!("{{\"page\":{i}}}\n"))))
            .chain(std::iter::once((Duration::ZERO, b"0\r\n\r\n".to_vec())))
            .collect();
        let base_url = serve_chunked(JSONL_HEAD, parts).await;

        let client = raw_client(base_url, Duration::from_millis(400));
        let response = client.send(&crawl("https://example.com"), true).await.unwrap();

        let expected: Vec<Value> = (0..5).map(|i| json!({"page": i})).collect();
        assert_eq!(response, SpiderResponse::Records(expected));
    }

    #[tokio::test]
    async fn test_stalled_stream_times_out() {
        let parts = vec![
            (Duration::ZERO, chunk("{\"page\":0}\n")),
            (Duration::from_secs(3), chunk("{\"page\":1}\n")),
        ];
        let base_url = serve_chunked(JSONL_HEAD, parts).await;

        let client = raw_client(base_url, Duration::from_millis(300));
        let err = client.send(&crawl("https://example.com"), true).await.unwrap_err();

        assert!(matches!(err, SpiderError::Timeout), "got {err:?}");
        assert!(matches!(spindle_core::Error::from(err), spindle_core::Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_connection_closed_mid_stream() {
        let parts = vec![
            (Duration::ZERO, chunk("{\"page\":0}\n")),
            (Duration::ZERO, b"40\r\n{\"page\":1,\"content\":\"trunc".to_vec()),
        ];
        let base_url = serve_chunked(JSONL_HEAD, parts).await;

        let client = raw_client(base_url, Duration::from_secs(5));
        let err = client.send(&crawl("https://example.com"), true).await.unwrap_err();

        assert!(matches!(err, SpiderError::Stream(_)), "got {err:?}");
        assert!(matches!(spindle_core::Error::from(err), spindle_core::Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_unreadable_error_body_keeps_status() {
        let head = b"HTTP/1.1 500 Internal Server Error\r\ncontent-type: text/plain\r\ntransfer-encoding: chunked\r\n\r\n";
        let parts = vec![(Duration::ZERO, b"40\r\npartial".to_vec())];
        let base_url = serve_chunked(head, parts).await;

        let client = raw_client(base_url, Duration::from_secs(5));
        let err = client.send(&crawl("https://example.com"), true).await.unwrap_err();

        assert!(matches!(err, SpiderError::HttpError { status: 500, ref body } if body.is_empty()), "got {err:?}");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = SpiderClient::new(SpiderConfig {
            api_key: "test-key".into(),
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap();

        let err = client.send(&crawl("https://example.com"), true).await.unwrap_err();
        assert!(matches!(err, SpiderError::Network(_) | SpiderError::Timeout));
    }
}

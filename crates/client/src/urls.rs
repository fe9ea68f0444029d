//! URL canonicalization for crawl targets.
//!
//! The Spider API accepts one URL or several comma-separated URLs in its `url`
//! field. Each entry is normalized before it leaves the server.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a single URL.
///
/// 1. Trim whitespace
/// 2. Default scheme to https:// if missing
/// 3. Only http and https are accepted
/// 4. Lowercase the host and drop the fragment
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let with_scheme = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };
    let mut parsed = url::Url::parse(&with_scheme).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    // The url crate already lowercases registered domains; IDNA and IP hosts pass through.
    let host = parsed.host_str().map(str::to_lowercase);
    if let Some(host) = host {
        parsed.set_host(Some(&host)).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Canonicalize a comma-separated URL list into the form Spider expects.
pub fn canonicalize_list(input: &str) -> Result<String, UrlError> {
    let urls = input
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| canonicalize(part).map(|u| u.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    if urls.is_empty() {
        return Err(UrlError::Empty);
    }

    Ok(urls.join(","))
}

use super::{Channel, ChannelCatalog};
use crate::util::strip_control_chars;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Catalog documents above this size are rejected.
const MAX_CATALOG_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Single-request timeout. There is no automatic retry: a failed load is
/// surfaced to the user who can retry manually.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading the channel catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Request timed out")]
    Timeout,
    /// Local catalog file could not be read
    #[error("Failed to read catalog file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Document is not a JSON array of channel records
    #[error("Invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Catalog too large")]
    TooLarge,
    /// Catalog URL uses a scheme other than http/https
    #[error("Unsupported catalog URL: {0}")]
    UnsupportedUrl(String),
}

/// Where the catalog document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(Url),
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a config/CLI string: anything with a URL scheme is fetched
    /// over HTTP(S), everything else is a filesystem path.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let raw = raw.trim();
        if !raw.contains("://") {
            return Ok(Self::File(PathBuf::from(raw)));
        }

        let url = Url::parse(raw).map_err(|e| CatalogError::UnsupportedUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(Self::Url(url)),
            "file" => url
                .to_file_path()
                .map(Self::File)
                .map_err(|_| CatalogError::UnsupportedUrl(raw.to_string())),
            other => Err(CatalogError::UnsupportedUrl(format!(
                "scheme '{}' (only http/https or a file path)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load the catalog once from its source.
///
/// HTTP sources get a `t=<epoch millis>` query parameter so intermediate
/// caches never serve a stale channel list.
pub async fn load(
    client: &reqwest::Client,
    source: &CatalogSource,
) -> Result<ChannelCatalog, CatalogError> {
    let bytes = match source {
        CatalogSource::Url(url) => fetch(client, url).await?,
        CatalogSource::File(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?
        }
    };

    let catalog = parse_catalog(&bytes)?;
    tracing::info!(source = %source, channels = catalog.len(), "Loaded channel catalog");
    Ok(catalog)
}

/// Parse a catalog document: a JSON array of `{id, name, event, src}` records.
///
/// Text fields come from an untrusted source and are stripped of terminal
/// control sequences before they reach the renderer.
pub fn parse_catalog(bytes: &[u8]) -> Result<ChannelCatalog, CatalogError> {
    let records: Vec<Channel> = serde_json::from_slice(bytes)?;
    let records = records
        .into_iter()
        .map(|c| Channel {
            id: c.id.trim().to_string(),
            name: strip_control_chars(c.name.trim()).into_owned(),
            event: strip_control_chars(c.event.trim()).into_owned(),
            src: c.src.trim().to_string(),
        })
        .collect();
    Ok(ChannelCatalog::from_channels(records))
}

fn cache_busted(url: &Url) -> Url {
    let mut url = url.clone();
    url.query_pairs_mut()
        .append_pair("t", &chrono::Utc::now().timestamp_millis().to_string());
    url
}

async fn fetch(client: &reqwest::Client, url: &Url) -> Result<Vec<u8>, CatalogError> {
    let request_url = cache_busted(url);
    tracing::debug!(url = %request_url, "Fetching channel catalog");

    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(request_url).send())
        .await
        .map_err(|_| CatalogError::Timeout)??;

    if !response.status().is_success() {
        return Err(CatalogError::HttpStatus(response.status().as_u16()));
    }

    read_limited_bytes(response, MAX_CATALOG_SIZE).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(CatalogError::TooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::TooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

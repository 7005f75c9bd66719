use thiserror::Error;
use url::Url;

/// Why a stream reference cannot be handed to a player.
#[derive(Error, Debug)]
pub enum StreamUrlError {
    #[error("Stream link is empty")]
    Empty,

    #[error("Invalid stream link: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported stream scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),

    #[error("Stream link has no host")]
    MissingHost,
}

/// Validate a channel's stream reference before launching a player or
/// copying it to the clipboard.
///
/// Stream links come from the remote catalog. Only http(s) URLs with a
/// host are accepted, so a catalog entry cannot make the opener run a
/// `file://` path or a custom URL handler.
///
/// ```
/// use cinema::util::validate_stream_url;
///
/// assert!(validate_stream_url("https://cdn.example.com/live/1.m3u8").is_ok());
/// assert!(validate_stream_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_stream_url(src: &str) -> Result<Url, StreamUrlError> {
    let src = src.trim();
    if src.is_empty() {
        return Err(StreamUrlError::Empty);
    }

    let url = Url::parse(src)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(StreamUrlError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(StreamUrlError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_stream_url("http://example.com/embed/7").is_ok());
        let url = validate_stream_url("  https://example.com/live.m3u8 ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_local_hosts_allowed() {
        // Home media servers are a normal stream source
        assert!(validate_stream_url("http://192.168.1.20:8096/stream").is_ok());
        assert!(validate_stream_url("http://localhost:8080/live").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(validate_stream_url("   "), Err(StreamUrlError::Empty)));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for src in ["file:///etc/passwd", "javascript:alert(1)", "ftp://example.com/x"] {
            assert!(
                matches!(validate_stream_url(src), Err(StreamUrlError::UnsupportedScheme(_))),
                "{} should be rejected",
                src
            );
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            validate_stream_url("not a url"),
            Err(StreamUrlError::InvalidUrl(_))
        ));
    }
}

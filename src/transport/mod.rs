//! Resource transports for rule sets and repository metadata
//!
//! A [`Transport`] fetches the raw bytes behind a URI; [`Transports`] picks the first
//! applicable one. Plain paths and `file:` URIs are read from disk, `http(s):` URIs are
//! fetched with reqwest.

pub mod file;
pub mod http;

use thiserror::Error;

pub use file::FileTransport;
pub use http::HttpTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {uri}")]
    Status { uri: String, status: u16 },

    #[error("No transport for URI scheme of {0}")]
    UnsupportedScheme(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),
}

/// Fetches the resource behind a URI
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Returns true if this transport can download `uri`
    fn is_applicable(&self, uri: &str) -> bool;

    /// Downloads the resource
    ///
    /// # Arguments
    /// * `uri` - Location of the resource
    /// * `server_id` - Id of the server whose credentials apply, if any
    async fn download(&self, uri: &str, server_id: Option<&str>) -> Result<Vec<u8>, TransportError>;
}

/// Scheme of `uri`, or `None` for a plain path
pub fn scheme(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(':')?;
    // single letters are Windows drive prefixes
    let valid = scheme.len() > 1
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Ordered set of transports; the first applicable one serves a URI
pub struct Transports {
    transports: Vec<Box<dyn Transport>>,
}

impl Transports {
    pub fn new(transports: Vec<Box<dyn Transport>>) -> Self {
        Self { transports }
    }

    pub async fn download(&self, uri: &str, server_id: Option<&str>) -> Result<Vec<u8>, TransportError> {
        let transport = self
            .transports
            .iter()
            .find(|t| t.is_applicable(uri))
            .ok_or_else(|| TransportError::UnsupportedScheme(uri.to_string()))?;
        transport.download(uri, server_id).await
    }

    /// Downloads `uri` and hands the bytes to `mapper`
    pub async fn download_with<T, E, F>(&self, uri: &str, server_id: Option<&str>, mapper: F) -> Result<T, E>
    where
        F: FnOnce(&[u8]) -> Result<T, E>,
        E: From<TransportError>,
    {
        let bytes = self.download(uri, server_id).await?;
        mapper(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/rules.json", Some("https"))]
    #[case("file:///tmp/rules.json", Some("file"))]
    #[case("/tmp/rules.json", None)]
    #[case("C:\\rules.json", None)]
    #[case("rules.json", None)]
    fn scheme_detects_uri_schemes(#[case] uri: &str, #[case] expected: Option<&str>) {
        assert_eq!(scheme(uri), expected);
    }

    /// Serves a fixed body for URIs with one scheme
    struct StaticTransport {
        scheme: &'static str,
        body: &'static str,
    }

    #[async_trait::async_trait]
    impl Transport for StaticTransport {
        fn is_applicable(&self, uri: &str) -> bool {
            scheme(uri) == Some(self.scheme)
        }

        async fn download(&self, _uri: &str, _server_id: Option<&str>) -> Result<Vec<u8>, TransportError> {
            Ok(self.body.as_bytes().to_vec())
        }
    }

    #[tokio::test]
    async fn download_uses_first_applicable_transport() {
        let transports = Transports::new(vec![
            Box::new(StaticTransport { scheme: "other", body: "skipped" }),
            Box::new(StaticTransport { scheme: "mem", body: "hello" }),
            Box::new(StaticTransport { scheme: "mem", body: "shadowed" }),
        ]);

        let result = transports
            .download_with("mem://x", None, |bytes| {
                Ok::<_, TransportError>(String::from_utf8_lossy(bytes).into_owned())
            })
            .await
            .unwrap();

        assert_eq!(result, "hello");
    }

    #[tokio::test]
    async fn download_fails_without_applicable_transport() {
        let transports = Transports::new(vec![Box::new(FileTransport)]);

        let result = transports.download("ftp://example.com/rules.json", None).await;

        assert!(matches!(result, Err(TransportError::UnsupportedScheme(_))));
    }
}

//! Local file transport

use std::path::PathBuf;

use tracing::debug;

use crate::transport::{Transport, TransportError, scheme};

/// Reads `file:` URIs and plain paths
pub struct FileTransport;

impl FileTransport {
    fn path(uri: &str) -> Result<PathBuf, TransportError> {
        match scheme(uri) {
            None => Ok(PathBuf::from(uri)),
            Some("file") => {
                let rest = &uri["file:".len()..];
                // file:///abs/path and file://localhost/abs/path carry an authority
                let path = match rest.strip_prefix("//") {
                    Some(with_authority) => match with_authority.find('/') {
                        Some(index) => &with_authority[index..],
                        None => return Err(TransportError::InvalidUri(uri.to_string())),
                    },
                    None => rest,
                };
                Ok(PathBuf::from(path))
            }
            Some(_) => Err(TransportError::UnsupportedScheme(uri.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FileTransport {
    fn is_applicable(&self, uri: &str) -> bool {
        matches!(scheme(uri), None | Some("file"))
    }

    async fn download(&self, uri: &str, _server_id: Option<&str>) -> Result<Vec<u8>, TransportError> {
        let path = Self::path(uri)?;
        debug!("Reading {}", path.display());
        Ok(tokio::fs::read(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn download_reads_file_uri() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "Hello, world!").unwrap();

        let uri = format!("file://{}", path.display());
        let bytes = FileTransport.download(&uri, None).await.unwrap();

        assert_eq!(String::from_utf8(bytes).unwrap(), "Hello, world!");
    }

    #[tokio::test]
    async fn download_reads_plain_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "Hello, world!").unwrap();

        let bytes = FileTransport
            .download(&path.display().to_string(), None)
            .await
            .unwrap();

        assert_eq!(bytes, b"Hello, world!");
    }

    #[tokio::test]
    async fn download_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let uri = dir.path().join("missing.txt").display().to_string();

        let result = FileTransport.download(&uri, None).await;

        assert!(matches!(result, Err(TransportError::Io(_))));
    }

    #[test]
    fn is_applicable_only_for_local_resources() {
        assert!(FileTransport.is_applicable("file:///tmp/x"));
        assert!(FileTransport.is_applicable("/tmp/x"));
        assert!(!FileTransport.is_applicable("https://example.com/x"));
    }
}

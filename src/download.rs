use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;

/// Saves a remote resource to a local path
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, dest: &Path, url: &str) -> Result<(), DownloadError>;
}

/// HTTP GET-to-file downloader. Creates or truncates the destination
/// and streams the body to it; a failed stream leaves the truncated
/// file in place.
pub struct FileDownloader {
    http: Client,
}

impl FileDownloader {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Downloader for FileDownloader {
    async fn download(&self, dest: &Path, url: &str) -> Result<(), DownloadError> {
        debug!("GET {} -> {}", url, dest.display());

        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| DownloadError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let mut file = File::create(dest)
            .await
            .map_err(|source| DownloadError::Create {
                path: dest.to_path_buf(),
                source,
            })?;

        loop {
            let chunk = response
                .chunk()
                .await
                .map_err(|source| DownloadError::Write {
                    path: dest.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, source),
                })?;

            let Some(chunk) = chunk else {
                break;
            };

            file.write_all(&chunk)
                .await
                .map_err(|source| DownloadError::Write {
                    path: dest.to_path_buf(),
                    source,
                })?;
        }

        file.flush().await.map_err(|source| DownloadError::Write {
            path: dest.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_writes_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/in_123.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 fake".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("in_123.pdf");
        let downloader = FileDownloader::new(Client::new());

        downloader
            .download(&dest, &format!("{}/in_123.pdf", server.uri()))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/in_123.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("in_123.pdf");
        std::fs::write(&dest, b"previous longer contents").unwrap();

        let downloader = FileDownloader::new(Client::new());
        downloader
            .download(&dest, &format!("{}/in_123.pdf", server.uri()))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_download_not_found_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.pdf");
        let downloader = FileDownloader::new(Client::new());

        let err = downloader
            .download(&dest, &format!("{}/missing.pdf", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Fetch { .. }));
        // Nothing fetched, nothing created
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_missing_parent_dir_is_create_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/in_1.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("no-such-folder").join("in_1.pdf");
        let downloader = FileDownloader::new(Client::new());

        let err = downloader
            .download(&dest, &format!("{}/in_1.pdf", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Create { .. }));
    }
}

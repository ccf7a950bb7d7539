//! PDF download module
//!
//! Fetches the documents listed in a JSON manifest, an object mapping a document
//! name to its URL, into a folder as `<name>.pdf`. A failed download is logged
//! and reported in the summary; the remaining entries are still fetched.

mod error;

pub use error::DownloadError;

use reqwest::Client;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default timeout for one download in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Document name to URL
pub type Manifest = BTreeMap<String, String>;

/// Result of a download run
#[derive(Debug, Default)]
pub struct DownloadSummary {
    /// Files written, in name order
    pub downloaded: Vec<PathBuf>,
    /// Name and error of every entry that was not saved
    pub failed: Vec<(String, String)>,
}

/// Read a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest, DownloadError> {
    let content = std::fs::read_to_string(path).map_err(|source| DownloadError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// File a manifest entry is saved to
fn target_path(folder: &Path, name: &str) -> Result<PathBuf, DownloadError> {
    let unusable = name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name.contains("..");
    if unusable {
        return Err(DownloadError::InvalidName(name.to_string()));
    }
    Ok(folder.join(format!("{name}.pdf")))
}

/// HTTP downloader for manifest entries
#[derive(Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Create a downloader with the default timeout
    pub fn new() -> Result<Self, DownloadError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a downloader with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DownloadError::Client)?;
        Ok(Self { client })
    }

    /// Fetch `url` and return the response body
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }

    /// Download one manifest entry into `folder`
    async fn download_one(
        &self,
        folder: &Path,
        name: &str,
        url: &str,
    ) -> Result<PathBuf, DownloadError> {
        let path = target_path(folder, name)?;
        let body = self.fetch(url).await?;
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }

    /// Download every manifest entry into `folder`, creating it if needed
    ///
    /// Only a folder that cannot be created is an error; per-entry failures are
    /// collected in the summary.
    #[instrument(skip(self, manifest), fields(entries = manifest.len()))]
    pub async fn download_all(
        &self,
        manifest: &Manifest,
        folder: &Path,
    ) -> Result<DownloadSummary, DownloadError> {
        tokio::fs::create_dir_all(folder).await?;

        let mut summary = DownloadSummary::default();
        for (name, url) in manifest {
            match self.download_one(folder, name, url).await {
                Ok(path) => {
                    info!("Successfully downloaded: {}", path.display());
                    summary.downloaded.push(path);
                }
                Err(e) => {
                    warn!("Failed to download {} ({}): {}", name, url, e);
                    summary.failed.push((name.clone(), e.to_string()));
                }
            }
        }

        info!(
            "Downloaded {} of {} documents",
            summary.downloaded.len(),
            manifest.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_download_all_skips_failures() {
        let mut server = Server::new_async().await;
        let ok = server
            .mock("GET", "/files/report.pdf")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body("%PDF-1.5 report body")
            .expect(1)
            .create_async()
            .await;
        let missing = server
            .mock("GET", "/files/missing.pdf")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let mut manifest = Manifest::new();
        manifest.insert(
            "pdf1".to_string(),
            format!("{}/files/report.pdf", server.url()),
        );
        manifest.insert(
            "pdf2".to_string(),
            format!("{}/files/missing.pdf", server.url()),
        );

        let dir = tempdir().unwrap();
        let folder = dir.path().join("pdfs");
        let summary = Downloader::new()
            .unwrap()
            .download_all(&manifest, &folder)
            .await
            .unwrap();

        assert_eq!(summary.downloaded, vec![folder.join("pdf1.pdf")]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "pdf2");
        assert!(summary.failed[0].1.contains("404"), "{}", summary.failed[0].1);
        assert_eq!(
            std::fs::read(folder.join("pdf1.pdf")).unwrap(),
            b"%PDF-1.5 report body"
        );
        assert!(!folder.join("pdf2.pdf").exists());

        ok.assert_async().await;
        missing.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_url_is_not_fatal() {
        let mut manifest = Manifest::new();
        manifest.insert("gone".to_string(), "http://127.0.0.1:1/gone.pdf".to_string());

        let dir = tempdir().unwrap();
        let summary = Downloader::with_timeout(Duration::from_secs(5))
            .unwrap()
            .download_all(&manifest, dir.path())
            .await
            .unwrap();

        assert!(summary.downloaded.is_empty());
        assert_eq!(summary.failed[0].0, "gone");
    }

    #[tokio::test]
    async fn test_unsafe_name_is_rejected() {
        let mut server = Server::new_async().await;
        let never = server
            .mock("GET", "/escape.pdf")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let mut manifest = Manifest::new();
        manifest.insert("../escape".to_string(), format!("{}/escape.pdf", server.url()));

        let dir = tempdir().unwrap();
        let summary = Downloader::new()
            .unwrap()
            .download_all(&manifest, dir.path())
            .await
            .unwrap();

        assert!(summary.downloaded.is_empty());
        assert!(summary.failed[0].1.contains("unusable document name"));
        never.assert_async().await;
    }

    #[test]
    fn test_load_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pdf.json");
        std::fs::write(
            &path,
            r#"{"pdf1": "https://example.com/a.pdf", "pdf2": "https://example.com/b.pdf"}"#,
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest["pdf1"], "https://example.com/a.pdf");
    }

    #[test]
    fn test_load_manifest_errors() {
        let dir = tempdir().unwrap();
        let missing = load_manifest(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, DownloadError::Manifest { .. }));

        let path = dir.path().join("pdf.json");
        std::fs::write(&path, r#"["https://example.com/a.pdf"]"#).unwrap();
        let invalid = load_manifest(&path).unwrap_err();
        assert!(matches!(invalid, DownloadError::ManifestFormat(_)));
    }
}

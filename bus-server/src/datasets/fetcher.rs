//! Where static datasets come from.

use std::future::Future;
use std::path::PathBuf;

use reqwest::Url;
use tracing::debug;

use super::error::DatasetError;

/// Retrieves the raw text of a named dataset resource.
pub trait DatasetFetcher: Send + Sync {
    fn fetch(&self, resource: &str) -> impl Future<Output = Result<String, DatasetError>> + Send;
}

/// The two places a deployment keeps its datasets.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Resources resolved relative to a base URL.
    Http { http: reqwest::Client, base_url: Url },
    /// Files in a local directory.
    Directory(PathBuf),
}

impl DatasetSource {
    /// Resolve resources against `base_url`.
    ///
    /// A trailing slash is added if missing so that relative resolution keeps
    /// the last path segment.
    pub fn http(base_url: &str) -> Result<Self, DatasetError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| DatasetError::fetch(base_url, e.to_string()))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DatasetError::fetch(base_url.as_str(), e.to_string()))?;
        Ok(DatasetSource::Http { http, base_url })
    }

    /// Read resources from files under `dir`.
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        DatasetSource::Directory(dir.into())
    }
}

impl DatasetFetcher for DatasetSource {
    async fn fetch(&self, resource: &str) -> Result<String, DatasetError> {
        match self {
            DatasetSource::Http { http, base_url } => {
                let url = base_url
                    .join(resource)
                    .map_err(|e| DatasetError::fetch(resource, e.to_string()))?;
                debug!(%url, "fetching dataset");

                let response = http
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| DatasetError::fetch(resource, e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DatasetError::fetch(resource, format!("HTTP {}", status.as_u16())));
                }
                response
                    .text()
                    .await
                    .map_err(|e| DatasetError::fetch(resource, e.to_string()))
            }
            DatasetSource::Directory(dir) => {
                let path = dir.join(resource);
                debug!(path = %path.display(), "reading dataset");
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| DatasetError::fetch(resource, e.to_string()))
            }
        }
    }
}

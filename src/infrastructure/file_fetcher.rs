// File fetcher - Reads dashboard data files from a local directory
use crate::application::text_fetcher::{FetchError, TextFetcher};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches("./").trim_start_matches('/'))
    }
}

#[async_trait]
impl TextFetcher for FileFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());

        tokio::fs::read_to_string(&full_path).await.map_err(|source| {
            tracing::error!("Reading {} failed: {}", full_path.display(), source);
            FetchError::Io {
                path: full_path.display().to_string(),
                source,
            }
        })
    }
}

// Text fetcher trait - Retrieval of CSV and JSON documents by path
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A failed retrieval. Propagated to the caller; the stage that asked aborts.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait TextFetcher: Send + Sync {
    /// Fetch the body at `path` (relative to the fetcher's base) as text.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

/// Fetch `path` and decode it as JSON.
pub async fn fetch_json<T: DeserializeOwned>(fetcher: &dyn TextFetcher, path: &str) -> Result<T, FetchError> {
    let body = fetcher.fetch_text(path).await?;
    serde_json::from_str(&body).map_err(|source| FetchError::Json {
        path: path.to_string(),
        source,
    })
}


#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::*;

    #[tokio::test]
    async fn test_fetch_json_decodes_body() {
        let fetcher = StaticFetcher::default().with("list.json", r#"["a.csv", "b.csv"]"#);
        let files: Vec<String> = fetch_json(&fetcher, "list.json").await.unwrap();
        assert_eq!(files, vec!["a.csv", "b.csv"]);
    }

    #[tokio::test]
    async fn test_fetch_json_reports_bad_json() {
        let fetcher = StaticFetcher::default().with("list.json", "not json");
        let err = fetch_json::<Vec<String>>(&fetcher, "list.json").await.unwrap_err();
        assert!(matches!(err, FetchError::Json { .. }));
    }

    #[tokio::test]
    async fn test_fetch_json_propagates_missing_file() {
        let fetcher = StaticFetcher::default();
        let err = fetch_json::<Vec<String>>(&fetcher, "missing.json").await.unwrap_err();
        assert_eq!(err.to_string(), "missing.json returned status 404");
    }
}

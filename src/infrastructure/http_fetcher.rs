// HTTP fetcher - Reads dashboard data files from a web server
use crate::application::text_fetcher::{FetchError, TextFetcher};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Joins `path` onto the base URL, percent-encoding each segment.
    ///
    /// Export file names carry a literal `+` (`UTC+7`), so segments are always encoded.
    pub fn build_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .trim_start_matches("./")
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.base_url, encoded.join("/"))
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.build_url(path);
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::error!("Fetching {} failed with status {}", url, status);
            return Err(FetchError::Status { url, status });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Transport { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_segments() {
        let fetcher = HttpFetcher::new("http://localhost:8000/");

        assert_eq!(
            fetcher.build_url("./data/subject3/file_list.json"),
            "http://localhost:8000/data/subject3/file_list.json"
        );
        assert_eq!(
            fetcher.build_url("data/csv/1_studentId_7_subject_S_scenario_A_20250325_151618_UTC+7.csv"),
            "http://localhost:8000/data/csv/1_studentId_7_subject_S_scenario_A_20250325_151618_UTC%2B7.csv"
        );
        assert_eq!(
            fetcher.build_url("data//scenarios/1 basic.csv"),
            "http://localhost:8000/data/scenarios/1%20basic.csv"
        );
    }
}

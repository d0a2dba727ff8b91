use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::TmdbConfig;

use super::model::*;
use super::provider::MovieProvider;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// TMDB search-by-title client. The provider's own relevance ranking is
/// trusted: only the first result is ever used.
pub struct TmdbClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl MovieProvider for TmdbClient {
    async fn lookup(&self, title: &str) -> ProviderResult<Option<MovieRecord>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("TMDB_API_KEY"))?;

        let url = format!("{}/search/movie", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", api_key), ("query", title)])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let search: SearchResponse = response.json().await?;
        Ok(search.results.into_iter().next().map(record_from_result))
    }
}

fn record_from_result(result: SearchResult) -> MovieRecord {
    MovieRecord {
        title: result.title.unwrap_or_default(),
        overview: result.overview.unwrap_or_default(),
        primary_genre: result.genre_ids.first().map(|id| id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_full_result() {
        let result = SearchResult {
            title: Some("The Matrix".to_string()),
            overview: Some("A hacker discovers a simulated reality".to_string()),
            genre_ids: vec![28, 878],
        };
        let record = record_from_result(result);
        assert_eq!(record.title, "The Matrix");
        assert_eq!(record.overview, "A hacker discovers a simulated reality");
        assert_eq!(record.primary_genre.as_deref(), Some("28"));
    }

    #[test]
    fn test_record_defaults_when_fields_missing() {
        let result = SearchResult {
            title: None,
            overview: None,
            genre_ids: vec![],
        };
        let record = record_from_result(result);
        assert_eq!(record.overview, "");
        assert!(record.primary_genre.is_none());
    }

    #[test]
    fn test_search_response_parses_sparse_results() {
        let json = r#"{"page":1,"results":[{"title":"Up","genre_ids":[16]},{"overview":"second"}]}"#;
        let search: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(search.results.len(), 2);
        let first = record_from_result(search.results.into_iter().next().unwrap());
        assert_eq!(first.title, "Up");
        assert_eq!(first.primary_genre.as_deref(), Some("16"));
    }
}

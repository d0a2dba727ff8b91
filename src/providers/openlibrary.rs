use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::OpenLibraryConfig;

use super::model::*;
use super::provider::BookProvider;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Open Library catalog client: free-text search over `/search.json` and
/// subject browsing over `/subjects/{slug}.json`. No credentials.
pub struct OpenLibraryClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SubjectResponse {
    #[serde(default)]
    works: Vec<SubjectWork>,
}

#[derive(Debug, Deserialize)]
struct SubjectWork {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<SubjectAuthor>,
}

#[derive(Debug, Deserialize)]
struct SubjectAuthor {
    #[serde(default)]
    name: Option<String>,
}

impl OpenLibraryClient {
    pub fn new(config: &OpenLibraryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl BookProvider for OpenLibraryClient {
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<CatalogBook>> {
        let url = format!("{}/search.json", self.base_url);
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("limit", limit_param.as_str())])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let search: SearchResponse = response.json().await?;
        Ok(search
            .docs
            .into_iter()
            .take(limit)
            .map(book_from_doc)
            .collect())
    }

    async fn browse_subject(&self, subject: &str, limit: usize) -> ProviderResult<Vec<CatalogBook>> {
        let url = format!("{}/subjects/{}.json", self.base_url, subject_slug(subject));
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit_param.as_str())])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let subject: SubjectResponse = response.json().await?;
        Ok(subject
            .works
            .into_iter()
            .take(limit)
            .map(book_from_work)
            .collect())
    }
}

fn book_from_doc(doc: SearchDoc) -> CatalogBook {
    CatalogBook {
        title: doc.title.unwrap_or_default(),
        author: doc.author_name.into_iter().next(),
    }
}

fn book_from_work(work: SubjectWork) -> CatalogBook {
    CatalogBook {
        title: work.title.unwrap_or_default(),
        author: work.authors.into_iter().next().and_then(|a| a.name),
    }
}

fn subject_slug(subject: &str) -> String {
    urlencoding::encode(&subject.replace(' ', "_")).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_slug_replaces_spaces() {
        assert_eq!(subject_slug("science fiction"), "science_fiction");
        assert_eq!(subject_slug("28"), "28");
    }

    #[test]
    fn test_subject_slug_percent_encodes() {
        assert_eq!(subject_slug("crime & law"), "crime_%26_law");
    }

    #[test]
    fn test_book_from_doc_takes_first_author() {
        let json = r#"{"docs":[{"title":"Neuromancer","author_name":["William Gibson","Other"]}]}"#;
        let search: SearchResponse = serde_json::from_str(json).unwrap();
        let book = book_from_doc(search.docs.into_iter().next().unwrap());
        assert_eq!(book.title, "Neuromancer");
        assert_eq!(book.author.as_deref(), Some("William Gibson"));
    }

    #[test]
    fn test_book_from_doc_without_author() {
        let doc = SearchDoc {
            title: Some("Anonymous Work".to_string()),
            author_name: vec![],
        };
        let book = book_from_doc(doc);
        assert!(book.author.is_none());
    }

    #[test]
    fn test_book_from_work_nested_author() {
        let json = r#"{"works":[{"title":"Dune","authors":[{"name":"Frank Herbert"}]}]}"#;
        let subject: SubjectResponse = serde_json::from_str(json).unwrap();
        let book = book_from_work(subject.works.into_iter().next().unwrap());
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author.as_deref(), Some("Frank Herbert"));
    }
}

use serde::{Deserialize, Serialize};

/// Normalized movie metadata, produced once per query by the metadata lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub overview: String,
    pub primary_genre: Option<String>,
}

/// One library catalog result. `author` is the first listed author, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogBook {
    pub title: String,
    pub author: Option<String>,
}

/// One music catalog result. `artist` is the first listed artist, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(u16),
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

use async_trait::async_trait;

use super::model::*;

/// Movie metadata search. `Ok(None)` means the provider answered but had no
/// match; callers above the lookup treat transport errors the same way.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    async fn lookup(&self, title: &str) -> ProviderResult<Option<MovieRecord>>;
}

/// Library catalog: free-text search plus subject browsing.
#[async_trait]
pub trait BookProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<CatalogBook>>;
    async fn browse_subject(&self, subject: &str, limit: usize) -> ProviderResult<Vec<CatalogBook>>;
}

/// Music catalog track search. Authorization is the implementation's concern;
/// an auth failure surfaces as a search failure.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    async fn search_tracks(&self, query: &str, limit: usize) -> ProviderResult<Vec<Track>>;
}

/// Hosted text generation. Returns the raw generated text; prompt building
/// and output parsing live with the caller.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> ProviderResult<String>;
}

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::SpotifyConfig;

use super::model::*;
use super::provider::MusicProvider;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

// Renew the client-credentials token a little before Spotify expires it.
const TOKEN_RENEWAL_MARGIN: Duration = Duration::from_secs(60);

/// Spotify track search client. The client-credentials token is fetched
/// lazily and cached for the process lifetime; callers only see search
/// results or a failure, never the handshake.
pub struct SpotifyClient {
    client: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    accounts_url: String,
    api_url: String,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn needs_renewal(&self, now: Instant) -> bool {
        now + TOKEN_RENEWAL_MARGIN >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: TrackPage,
}

#[derive(Debug, Default, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    #[serde(default)]
    name: String,
}

impl SpotifyClient {
    pub fn new(config: &SpotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            accounts_url: config.accounts_url.clone(),
            api_url: config.api_url.clone(),
            token: RwLock::new(None),
        }
    }

    async fn bearer_token(&self) -> ProviderResult<String> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.needs_renewal(Instant::now()) {
                    return Ok(token.value.clone());
                }
            }
        }

        let mut cached = self.token.write().await;
        // another request may have renewed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.needs_renewal(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        debug!("Spotify token renewed");
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn request_token(&self) -> ProviderResult<CachedToken> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ProviderError::MissingCredential("SPOTIFY_CLIENT_ID"))?;
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or(ProviderError::MissingCredential("SPOTIFY_CLIENT_SECRET"))?;

        let url = format!("{}/api/token", self.accounts_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

#[async_trait]
impl MusicProvider for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: usize) -> ProviderResult<Vec<Track>> {
        let token = self.bearer_token().await?;

        let url = format!("{}/v1/search", self.api_url);
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("q", query), ("type", "track"), ("limit", limit_param.as_str())])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let search: SearchResponse = response.json().await?;
        Ok(search
            .tracks
            .items
            .into_iter()
            .take(limit)
            .map(track_from_item)
            .collect())
    }
}

fn track_from_item(item: TrackItem) -> Track {
    Track {
        name: item.name,
        artist: item.artists.into_iter().next().map(|a| a.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_renewal_margin() {
        let now = Instant::now();
        let fresh = CachedToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(3600),
        };
        assert!(!fresh.needs_renewal(now));

        let stale = CachedToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(30),
        };
        assert!(stale.needs_renewal(now));
    }

    #[test]
    fn test_token_response_default_expiry() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn test_track_mapping_takes_first_artist() {
        let json = r#"{"tracks":{"items":[{"name":"Clubbed to Death","artists":[{"name":"Rob Dougan"},{"name":"Other"}]}]}}"#;
        let search: SearchResponse = serde_json::from_str(json).unwrap();
        let track = track_from_item(search.tracks.items.into_iter().next().unwrap());
        assert_eq!(track.name, "Clubbed to Death");
        assert_eq!(track.artist.as_deref(), Some("Rob Dougan"));
    }

    #[test]
    fn test_track_mapping_without_artists() {
        let item = TrackItem {
            name: "Instrumental".to_string(),
            artists: vec![],
        };
        assert!(track_from_item(item).artist.is_none());
    }
}

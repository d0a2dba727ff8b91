use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub openlibrary: OpenLibraryConfig,
    #[serde(default)]
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub textgen: TextGenConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_tmdb_url")]
    pub base_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenLibraryConfig {
    #[serde(default = "default_openlibrary_url")]
    pub base_url: String,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: default_openlibrary_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_spotify_accounts_url")]
    pub accounts_url: String,
    #[serde(default = "default_spotify_api_url")]
    pub api_url: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            accounts_url: default_spotify_accounts_url(),
            api_url: default_spotify_api_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextGenConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_textgen_model")]
    pub model: String,
    #[serde(default = "default_textgen_url")]
    pub base_url: String,
}

impl Default for TextGenConfig {
    fn default() -> Self {
        Self {
            token: None,
            model: default_textgen_model(),
            base_url: default_textgen_url(),
        }
    }
}

fn default_port() -> String {
    "5000".to_string()
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_openlibrary_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_spotify_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_textgen_model() -> String {
    "google/flan-t5-base".to_string()
}

fn default_textgen_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Load the config file if it exists, fall back to built-in defaults
    /// otherwise, then overlay credentials from the environment. Credentials
    /// already present in the file win over the environment.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Config::default()
        };
        config.providers.overlay_env();
        Ok(config)
    }
}

impl ProvidersConfig {
    pub fn overlay_env(&mut self) {
        if self.tmdb.api_key.is_none() {
            self.tmdb.api_key = env_credential("TMDB_API_KEY");
        }
        if self.spotify.client_id.is_none() {
            self.spotify.client_id = env_credential("SPOTIFY_CLIENT_ID");
        }
        if self.spotify.client_secret.is_none() {
            self.spotify.client_secret = env_credential("SPOTIFY_CLIENT_SECRET");
        }
        if self.textgen.token.is_none() {
            self.textgen.token = env_credential("HUGGINGFACE_API_TOKEN");
        }
    }
}

fn env_credential(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gets_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.listen.port, "5000");
        assert!(config.listen.address.is_none());
        assert!(config.providers.tmdb.api_key.is_none());
        assert_eq!(config.providers.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.providers.textgen.model, "google/flan-t5-base");
    }

    #[test]
    fn test_partial_provider_section() {
        let yaml = r#"
listen:
  port: "8080"
providers:
  tmdb:
    api_key: abc123
  spotify:
    client_id: id1
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen.port, "8080");
        assert_eq!(config.providers.tmdb.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.providers.spotify.client_id.as_deref(), Some("id1"));
        assert!(config.providers.spotify.client_secret.is_none());
        assert_eq!(
            config.providers.spotify.accounts_url,
            "https://accounts.spotify.com"
        );
    }

    #[test]
    fn test_base_url_override() {
        let yaml = r#"
providers:
  openlibrary:
    base_url: "http://localhost:9001"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.providers.openlibrary.base_url, "http://localhost:9001");
    }
}

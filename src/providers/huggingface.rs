use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::TextGenConfig;

use super::model::*;
use super::provider::GenerativeProvider;

// Generation is slow; the wait_for_model flag can add cold-start time on top.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Hugging Face inference API client for the hosted text-generation model.
pub struct HuggingFaceClient {
    client: reqwest::Client,
    token: Option<String>,
    model: String,
    base_url: String,
}

impl HuggingFaceClient {
    pub fn new(config: &TextGenConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: config.token.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl GenerativeProvider for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let token = self
            .token
            .as_deref()
            .ok_or(ProviderError::MissingCredential("HUGGINGFACE_API_TOKEN"))?;

        let url = format!("{}/models/{}", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("wait_for_model", "true")])
            .bearer_auth(token)
            .json(&serde_json::json!({ "inputs": prompt }))
            .timeout(GENERATE_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        generated_text(&body)
            .ok_or_else(|| ProviderError::Malformed("no generated_text in reply".to_string()))
    }
}

// The inference API wraps replies in a single-element list; accept both the
// wrapped and the bare object form.
fn generated_text(body: &Value) -> Option<String> {
    let object = match body.as_array() {
        Some(items) => items.first()?,
        None => body,
    };
    object
        .get("generated_text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    #[serde(default)]
    pub movie: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HomeMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
        }
    }

    pub fn with_details(error: &str, details: String) -> Self {
        Self {
            error: error.to_string(),
            details: Some(details),
        }
    }
}

use serde_json::Value;
use tracing::debug;

use crate::providers::GenerativeProvider;

const LIST_LIMIT: usize = 3;

/// Output of one generative fallback call. Both lists may be empty.
#[derive(Debug, Default, PartialEq)]
pub struct FallbackRecs {
    pub books: Vec<String>,
    pub music: Vec<String>,
}

/// Ask the generation model to invent recommendations for the movie. Never
/// errors outward; anything that goes wrong comes back as empty lists.
pub async fn generate_fallback(textgen: &dyn GenerativeProvider, title: &str) -> FallbackRecs {
    let prompt = build_prompt(title);
    let text = match textgen.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            debug!("generative fallback failed: {}", e);
            return FallbackRecs::default();
        }
    };
    parse_reply(&text)
}

fn build_prompt(title: &str) -> String {
    format!(
        "You are a helpful assistant. Given the movie '{}', \
         suggest 3 book titles and 3 song titles relevant to its theme. \
         Respond ONLY in this exact JSON format:\n\n\
         {{\n\
         \x20 \"book_recommendations\": [\"Book 1\", \"Book 2\", \"Book 3\"],\n\
         \x20 \"music_recommendations\": [\"Song 1\", \"Song 2\", \"Song 3\"]\n\
         }}",
        title
    )
}

// The model tends to wrap the JSON object in prose; take everything from the
// first '{' to the last '}' and parse that.
fn parse_reply(text: &str) -> FallbackRecs {
    let start = match text.find('{') {
        Some(start) => start,
        None => return FallbackRecs::default(),
    };
    let end = match text.rfind('}') {
        Some(end) if end > start => end,
        _ => return FallbackRecs::default(),
    };

    let value: Value = match serde_json::from_str(&text[start..=end]) {
        Ok(value) => value,
        Err(e) => {
            debug!("fallback reply is not valid JSON: {}", e);
            return FallbackRecs::default();
        }
    };

    FallbackRecs {
        books: string_list(&value, "book_recommendations"),
        music: string_list(&value, "music_recommendations"),
    }
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .take(LIST_LIMIT)
                .collect()
        })
        .unwrap_or_default()
}

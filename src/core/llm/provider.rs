//! Google Provider Implementation (API Key-based)
//!
//! Talks to Google's Generative Language API with an API key supplied
//! via the `GEMINI_API_KEY` environment variable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::core::llm::types::{
    ChatRequest, ChatResponse, LlmError, MessageRole, Result,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A remote chat-completion provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn model(&self) -> &str;

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// Google provider (API key-based)
pub struct GoogleProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GoogleProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        // Trim the API key at construction to ensure consistency with validation
        Self {
            api_key: api_key.trim().to_string(),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Check if an API key has valid Google API key format.
    ///
    /// Google API keys typically start with "AIza". This is a pure format
    /// check and does not verify the key is actually valid with Google's API.
    pub fn is_valid_api_key_format(key: &str) -> bool {
        let trimmed = key.trim();
        !trimmed.is_empty() && trimmed.starts_with("AIza")
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_contents(&self, request: &ChatRequest) -> Vec<serde_json::Value> {
        request
            .messages
            .iter()
            .filter_map(|msg| {
                let role = match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                    MessageRole::System => return None,
                };
                Some(serde_json::json!({
                    "role": role,
                    "parts": [{ "text": msg.content }]
                }))
            })
            .collect()
    }

    fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let contents = self.build_contents(request);
        let mut body = serde_json::json!({ "contents": contents });

        let mut gen_config = serde_json::Map::new();
        if let Some(temp) = request.temperature {
            gen_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(schema) = &request.response_schema {
            gen_config.insert(
                "responseMimeType".to_string(),
                serde_json::json!("application/json"),
            );
            gen_config.insert("responseSchema".to_string(), schema.clone());
        }
        if !gen_config.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(gen_config);
        }

        body
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn id(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = self.build_body(&request);

        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: serde_json::Value = resp.json().await?;

        let content = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .ok_or_else(|| LlmError::InvalidResponse("Missing content".to_string()))?
            .to_string();

        Ok(ChatResponse {
            content,
            model: self.model.clone(),
            finish_reason: json["candidates"]
                .as_array()
                .and_then(|arr| arr.first())
                .and_then(|c| c["finishReason"].as_str())
                .map(|s| s.to_string()),
            latency_ms: latency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::types::ChatMessage;

    fn provider() -> GoogleProvider {
        GoogleProvider::new("AIzaTestApiKey".to_string(), "gemini-2.5-flash".to_string())
    }

    #[test]
    fn test_provider_identity() {
        let p = provider();
        assert_eq!(p.id(), "google");
        assert_eq!(p.name(), "Google");
        assert_eq!(p.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_api_key_format_accepts_valid_keys() {
        assert!(GoogleProvider::is_valid_api_key_format("AIzaValidApiKey12345"));
        assert!(GoogleProvider::is_valid_api_key_format("  AIzaSyD_abc  "));
        assert!(GoogleProvider::is_valid_api_key_format("AIza")); // Minimum valid
    }

    #[test]
    fn test_api_key_format_rejects_invalid_keys() {
        assert!(!GoogleProvider::is_valid_api_key_format(""));
        assert!(!GoogleProvider::is_valid_api_key_format("   "));
        assert!(!GoogleProvider::is_valid_api_key_format("BOGUS-KEY"));
        assert!(!GoogleProvider::is_valid_api_key_format("aiza-lowercase"));
    }

    #[test]
    fn test_base_url_override_trims_trailing_slash() {
        let p = provider().with_base_url("http://127.0.0.1:9999/");
        assert_eq!(
            p.endpoint(),
            "http://127.0.0.1:9999/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_build_body_skips_system_messages_in_contents() {
        let p = provider();
        let req = ChatRequest::new(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hello"),
        ]);
        let body = p.build_body(&req);
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
    }

    #[test]
    fn test_build_body_schema_sets_json_mime() {
        let p = provider();
        let req = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_temperature(0.7)
            .with_response_schema(serde_json::json!({"type": "OBJECT"}));
        let body = p.build_body(&req);
        let cfg = &body["generationConfig"];
        assert_eq!(cfg["responseMimeType"], "application/json");
        assert_eq!(cfg["temperature"], 0.7);
        assert!(cfg["responseSchema"].is_object());
    }

    #[test]
    fn test_build_body_temperature_is_exact() {
        let p = provider();
        for temp in [0.7, 0.8] {
            let req = ChatRequest::new(vec![ChatMessage::user("hi")]).with_temperature(temp);
            let body = p.build_body(&req);
            assert_eq!(body["generationConfig"]["temperature"], temp);
            assert_eq!(
                body["generationConfig"]["temperature"].as_f64(),
                Some(temp)
            );
        }
    }

    #[test]
    fn test_build_body_no_generation_config_when_unset() {
        let p = provider();
        let req = ChatRequest::new(vec![ChatMessage::user("hi")]);
        let body = p.build_body(&req);
        assert!(body.get("generationConfig").is_none());
    }
}

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{ChatError, UNKNOWN_DETAIL};

/// Knowledge domain sent with every question
pub const CHAT_CONTEXT: &str = "etcs";

/// Detail reported when the health endpoint answers with a non-2xx status
const HEALTH_UNAVAILABLE: &str = "Backend ikke tilgjengelig";

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub context: &'a str,
}

/// Body of a successful `/api/chat` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    /// Number of cited documents. Any JSON number is accepted, and so is a
    /// numeric string; anything else reads as absent.
    #[serde(default, deserialize_with = "lenient_count")]
    pub sources: Option<f64>,
    #[serde(default)]
    pub confidence: Option<String>,
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Clone)]
pub struct RailAdviceClient {
    client: Client,
    base_url: String,
}

impl RailAdviceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client whose requests give up after `timeout`; expiry surfaces as a
    /// network failure.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask one question. No retry: a failure is final for this call.
    pub async fn chat(&self, message: &str) -> Result<ChatResponse, ChatError> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            message,
            context: CHAT_CONTEXT,
        };

        debug!(%url, chars = message.chars().count(), "sending chat request");

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(ErrorBody { detail: Some(detail) }) if !detail.is_empty() => detail,
                Ok(_) => status.canonical_reason().unwrap_or_default().to_string(),
                Err(_) => UNKNOWN_DETAIL.to_string(),
            };
            return Err(ChatError::from_status(status.as_u16(), detail));
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<ChatResponse>(&body)
            .map_err(|e| ChatError::Decode(e.to_string()))
    }

    /// Probe `/health`; any 2xx counts as healthy.
    pub async fn health(&self) -> Result<(), ChatError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ChatError::from_status(
                response.status().as_u16(),
                HEALTH_UNAVAILABLE,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            message: "Hva er en balise?",
            context: CHAT_CONTEXT,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["message"], "Hva er en balise?");
        assert_eq!(json["context"], "etcs");
    }

    #[test]
    fn test_response_optional_fields() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"response":"Svar"}"#).unwrap();
        assert_eq!(parsed.response.as_deref(), Some("Svar"));
        assert_eq!(parsed.sources, None);
        assert_eq!(parsed.confidence, None);

        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ChatResponse::default());
    }

    #[test]
    fn test_sources_accepts_any_number() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"response":"Svar","sources":2.0}"#).unwrap();
        assert_eq!(parsed.sources, Some(2.0));

        let parsed: ChatResponse = serde_json::from_str(r#"{"sources":-1}"#).unwrap();
        assert_eq!(parsed.sources, Some(-1.0));

        let parsed: ChatResponse = serde_json::from_str(r#"{"sources":"4"}"#).unwrap();
        assert_eq!(parsed.sources, Some(4.0));
    }

    #[test]
    fn test_unusable_sources_reads_as_absent() {
        for body in [
            r#"{"response":"Svar","sources":null}"#,
            r#"{"response":"Svar","sources":"mange"}"#,
            r#"{"response":"Svar","sources":[1,2]}"#,
        ] {
            let parsed: ChatResponse = serde_json::from_str(body).unwrap();
            assert_eq!(parsed.response.as_deref(), Some("Svar"));
            assert_eq!(parsed.sources, None, "{}", body);
        }
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = RailAdviceClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}

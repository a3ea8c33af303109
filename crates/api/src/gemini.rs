//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use nestegg_core::advisor::{GenerationRequest, ReasoningClient, ReasoningError};
use nestegg_shared::ReasoningConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Reasoning client backed by Gemini.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Builds a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: &ReasoningConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody<'a> {
    contents: Vec<Content<'a>>,
    generation_config: WireConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl<'a> From<&'a GenerationRequest> for GenerateBody<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            contents: request
                .contents
                .iter()
                .map(|turn| Content {
                    role: turn.role.as_str(),
                    parts: [Part { text: &turn.text }],
                })
                .collect(),
            generation_config: WireConfig {
                temperature: request.config.temperature,
                top_k: request.config.top_k,
                top_p: request.config.top_p,
                max_output_tokens: request.config.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pulls `candidates[0].content.parts[0].text` out of the response.
fn first_text(response: GenerateResponse) -> Result<String, ReasoningError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ReasoningError::EmptyResponse)
}

fn transport_error(err: &reqwest::Error) -> ReasoningError {
    if err.is_timeout() {
        ReasoningError::Timeout
    } else {
        ReasoningError::Transport(err.to_string())
    }
}

#[async_trait]
impl ReasoningClient for GeminiClient {
    #[instrument(skip_all, fields(turns = request.contents.len()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ReasoningError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateBody::from(request))
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReasoningError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::InvalidResponse(e.to_string()))?;
        let text = first_text(parsed)?;
        debug!(chars = text.len(), "Reasoning response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestegg_core::advisor::{GenerationConfig, Turn};
    use serde_json::json;

    #[test]
    fn test_body_uses_wire_names() {
        let request = GenerationRequest {
            contents: vec![Turn::user("hi"), Turn::model("hello")],
            config: GenerationConfig::split(),
        };

        let body = serde_json::to_value(GenerateBody::from(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][1]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn test_first_text() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"equity\": 70, \"debt\": 30}"}]}}]
        }))
        .unwrap();
        assert_eq!(first_text(response).unwrap(), "{\"equity\": 70, \"debt\": 30}");
    }

    #[test]
    fn test_missing_candidates_is_empty_response() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(first_text(response), Err(ReasoningError::EmptyResponse)));

        let response: GenerateResponse =
            serde_json::from_value(json!({"candidates": [{"content": {"parts": []}}]})).unwrap();
        assert!(matches!(first_text(response), Err(ReasoningError::EmptyResponse)));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = GeminiClient::new(&ReasoningConfig {
            api_url: "http://localhost".into(),
            api_key: "secret".into(),
            model: "m".into(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }
}

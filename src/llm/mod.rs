pub mod reply;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::error::{AppError, Result};

/// What gets sent to the model: plain prompt text, or an inline attachment
/// followed by the instruction text.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRequest {
    Text(String),
    Inline {
        mime_type: String,
        data: String,
        instruction: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl ModelRequest {
    fn to_wire(&self) -> GenerateContentRequest<'_> {
        let parts = match self {
            ModelRequest::Text(text) => vec![Part::Text { text }],
            ModelRequest::Inline {
                mime_type,
                data,
                instruction,
            } => vec![
                Part::Inline {
                    inline_data: InlineData { mime_type, data },
                },
                Part::Text { text: instruction },
            ],
        };

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Sends one request asking for JSON output and returns the raw reply text.
    #[tracing::instrument(skip(self, request, model), fields(model = self.resolve_model(model)))]
    pub async fn generate_json(&self, request: &ModelRequest, model: Option<&str>) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AppError::MissingCredential("GEMINI_API_KEY"))?;
        let model = self.resolve_model(model);
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        let res = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&request.to_wire())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(%status, "Gemini request rejected");
            return Err(classify_failure(status, &body));
        }

        let reply: GenerateContentResponse = res.json().await?;
        let text = reply_text(reply);
        if text.trim().is_empty() {
            return Err(AppError::EmptyUpstreamReply("Empty response from Gemini".to_string()));
        }

        tracing::debug!(reply_len = text.len(), "Gemini reply received");
        Ok(text)
    }

    /// A blank override falls back to the configured model.
    fn resolve_model<'a>(&'a self, model: Option<&'a str>) -> &'a str {
        model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.model.as_str())
    }
}

fn reply_text(reply: GenerateContentResponse) -> String {
    reply
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Overload and rate-limit signals become `UpstreamUnavailable`; the rest is a
/// generic call failure carrying the provider's message.
pub fn classify_failure(status: StatusCode, body: &str) -> AppError {
    let overloaded = status == StatusCode::SERVICE_UNAVAILABLE
        || status == StatusCode::TOO_MANY_REQUESTS
        || body.contains("UNAVAILABLE")
        || body.contains("overloaded");

    let detail = format!("{} {}", status.as_u16(), body.trim());
    if overloaded {
        AppError::UpstreamUnavailable(detail)
    } else {
        AppError::UpstreamCallFailed(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_request_is_a_single_part() {
        let request = ModelRequest::Text("Summarize this".to_string());
        let wire = serde_json::to_value(request.to_wire()).unwrap();

        assert_eq!(
            wire,
            json!({
                "contents": [{ "parts": [{ "text": "Summarize this" }] }],
                "generationConfig": { "responseMimeType": "application/json" }
            })
        );
    }

    #[test]
    fn inline_request_puts_attachment_before_instruction() {
        let request = ModelRequest::Inline {
            mime_type: "image/png".to_string(),
            data: "QUJD".to_string(),
            instruction: "Read this form".to_string(),
        };
        let wire = serde_json::to_value(request.to_wire()).unwrap();

        assert_eq!(
            wire["contents"][0]["parts"],
            json!([
                { "inlineData": { "mimeType": "image/png", "data": "QUJD" } },
                { "text": "Read this form" }
            ])
        );
    }

    #[test]
    fn reply_parts_are_concatenated() {
        let reply: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        }))
        .unwrap();
        assert_eq!(reply_text(reply), "{\"a\":1}");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        let reply: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(reply_text(reply), "");
    }

    #[test]
    fn overload_signals_are_unavailable() {
        assert!(matches!(
            classify_failure(StatusCode::SERVICE_UNAVAILABLE, ""),
            AppError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, "RESOURCE_EXHAUSTED"),
            AppError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "The model is overloaded."),
            AppError::UpstreamUnavailable(_)
        ));
    }

    #[test]
    fn other_rejections_are_generic_failures() {
        let err = classify_failure(StatusCode::BAD_REQUEST, "API key not valid");
        assert!(matches!(err, AppError::UpstreamCallFailed(ref msg) if msg.contains("API key not valid")));
    }

    #[test]
    fn blank_model_override_uses_configured_model() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
        });
        assert_eq!(client.resolve_model(None), "test-model");
        assert_eq!(client.resolve_model(Some("")), "test-model");
        assert_eq!(client.resolve_model(Some("  ")), "test-model");
        assert_eq!(client.resolve_model(Some(" gemini-other ")), "gemini-other");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_call() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
        });
        let err = client
            .generate_json(&ModelRequest::Text("hi".to_string()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingCredential("GEMINI_API_KEY")));
    }
}

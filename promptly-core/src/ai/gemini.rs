use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::ai::{error::AiError, provider::AiProvider, types::*};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Result<Self, AiError> {
        Self::with_options(
            api_key,
            DEFAULT_GEMINI_MODEL.to_string(),
            DEFAULT_GEMINI_BASE_URL.to_string(),
        )
    }

    pub fn with_options(api_key: String, model: String, base_url: String) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::Terminal(anyhow::anyhow!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait::async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, AiError> {
        let body = GenerateContentRequest::from_prompt(&request.prompt);

        debug!(model = %self.model, prompt_len = request.prompt.len(), "Calling Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!(?e, "Gemini API call failed");
                AiError::Network(anyhow::anyhow!("{e}"))
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| AiError::Network(anyhow::anyhow!("Failed to read response: {e}")))?;

        if !status.is_success() {
            debug!(?status, ?response_text, "Gemini API returned error");
            return Err(classify_error(status, &response_text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)?;
        let generated = extract_response(parsed)?;

        info!(
            input_tokens = generated.usage.input_tokens,
            output_tokens = generated.usage.output_tokens,
            "Gemini generation complete"
        );

        Ok(generated)
    }
}

/// Maps a non-success HTTP status plus body into the matching `AiError`.
pub(crate) fn classify_error(status: StatusCode, body: &str) -> AiError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let error = anyhow::anyhow!("Gemini API error {}: {}", status.as_u16(), message);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::Auth(error),
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited(error),
        _ => AiError::Api(error),
    }
}

/// Joins the text parts of the first candidate.
pub(crate) fn extract_response(
    response: GenerateContentResponse,
) -> Result<GenerationResponse, AiError> {
    let usage = response
        .usage_metadata
        .map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
        .unwrap_or_default();

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked ({r})"))
            .unwrap_or_else(|| "response contained no text".to_string());
        return Err(AiError::Api(anyhow::anyhow!("Gemini returned no content: {reason}")));
    }

    Ok(GenerationResponse { text, usage })
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
}

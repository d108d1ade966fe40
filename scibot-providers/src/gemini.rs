//! Gemini HTTP gateway implementation
//!
//! Conversation memory is owned here, behind the context handle: each
//! handle maps to the accumulated request/reply contents for one
//! conversation, replayed on the wire with every exchange. Callers never
//! re-send prior turns themselves. Whether the hosted service would keep
//! that memory durable on its own side is not guaranteed by the provider;
//! owning it at this seam keeps the answer independent of provider
//! internals.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::base::{
    ContextHandle, GatewayError, GatewayResult, GenerationConfig, ModelGateway, SafetySetting,
};
use scibot_core::config::GatewayConfig;

/// One content block in the Gemini wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

impl Content {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// System instruction block; carries no role
#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: [PartRef<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PartRef<'a> {
    text: &'a str,
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    system_instruction: SystemInstruction<'a>,
    generation_config: &'a GenerationConfig,
    safety_settings: &'a [SafetySetting],
}

/// generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Gateway-side state for one conversation
#[derive(Debug, Clone)]
struct ChatContext {
    system_instruction: String,
    generation: GenerationConfig,
    safety: Vec<SafetySetting>,
    contents: Vec<Content>,
}

/// Gemini gateway client
pub struct GeminiGateway {
    http: Client,
    api_base: String,
    api_key: String,
    model: String,
    contexts: Mutex<HashMap<String, ChatContext>>,
}

impl GeminiGateway {
    /// Create a gateway client from the gateway configuration
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            http: Client::builder()
                .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            contexts: Mutex::new(HashMap::new()),
        }
    }

    fn probe_url(&self) -> String {
        format!("{}/models/{}", self.api_base, self.model)
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    async fn generate(
        &self,
        contents: &[Content],
        system_instruction: &str,
        generation: &GenerationConfig,
        safety: &[SafetySetting],
    ) -> GatewayResult<String> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: SystemInstruction {
                parts: [PartRef {
                    text: system_instruction,
                }],
            },
            generation_config: generation,
            safety_settings: safety,
        };

        debug!(model = %self.model, turns = contents.len(), "generateContent request");

        let response = self
            .http
            .post(self.generate_url())
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(GatewayError::Api(format!(
                    "authentication failed (HTTP {}): check the API key",
                    status
                )));
            }
            return Err(GatewayError::Api(format!("HTTP {}: {}", status, text)));
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        Self::extract_reply(parsed)
    }

    fn extract_reply(response: GenerateContentResponse) -> GatewayResult<String> {
        if let Some(feedback) = &response.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(GatewayError::Filtered(format!(
                    "prompt blocked ({})",
                    reason
                )));
            }
        }

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| GatewayError::InvalidResponse("no candidates in response".to_string()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(GatewayError::Filtered(
                "reply blocked (finish reason SAFETY)".to_string(),
            ));
        }

        let text: String = candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GatewayError::InvalidResponse(
                "candidate carries no text".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn create_context(
        &self,
        system_instruction: &str,
        generation: &GenerationConfig,
        safety: &[SafetySetting],
    ) -> GatewayResult<ContextHandle> {
        // Probe the model endpoint so a dead service or a bad key fails
        // here, not on the first exchange.
        let response = self
            .http
            .get(self.probe_url())
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Unavailable(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let handle = Uuid::new_v4().to_string();
        let mut contexts = self.contexts.lock().await;
        contexts.insert(
            handle.clone(),
            ChatContext {
                system_instruction: system_instruction.to_string(),
                generation: generation.clone(),
                safety: safety.to_vec(),
                contents: Vec::new(),
            },
        );

        debug!(model = %self.model, %handle, "conversation context created");
        Ok(ContextHandle::new(handle))
    }

    async fn send_message(&self, handle: &ContextHandle, text: &str) -> GatewayResult<String> {
        let (system_instruction, generation, safety, mut contents) = {
            let contexts = self.contexts.lock().await;
            let context = contexts
                .get(handle.as_str())
                .ok_or_else(|| GatewayError::UnknownContext(handle.to_string()))?;
            (
                context.system_instruction.clone(),
                context.generation.clone(),
                context.safety.clone(),
                context.contents.clone(),
            )
        };

        contents.push(Content::user(text));

        let reply = self
            .generate(&contents, &system_instruction, &generation, &safety)
            .await?;

        // Commit only after a successful exchange; a failed one leaves the
        // conversation exactly as it was before the attempt.
        let mut contexts = self.contexts.lock().await;
        if let Some(context) = contexts.get_mut(handle.as_str()) {
            context.contents.push(Content::user(text));
            context.contents.push(Content::model(&reply));
        }

        Ok(reply)
    }
}

//! Base trait for model gateways

use async_trait::async_trait;
use scibot_core::config::{GenerationDefaults, SafetyRule};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The service could not be reached or rejected the credentials
    /// while starting a conversation
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote service rejected the request
    #[error("API error: {0}")]
    Api(String),

    /// The exchange was blocked by the configured safety thresholds
    #[error("content blocked by safety settings: {0}")]
    Filtered(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The handle does not identify a live conversation
    #[error("unknown context handle: {0}")]
    UnknownContext(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Opaque reference to remote conversation state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextHandle(String);

impl ContextHandle {
    /// Wrap a raw handle id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw handle id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sampling options sent with every exchange
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling randomness; 0 is deterministic
    pub temperature: f64,
    /// Nucleus sampling breadth
    pub top_p: f64,
    /// Top-k sampling breadth
    pub top_k: i32,
    /// Hard cap on reply length
    pub max_output_tokens: u32,
    /// Reply MIME type (plain text vs structured)
    pub response_mime_type: String,
}

impl From<&GenerationDefaults> for GenerationConfig {
    fn from(defaults: &GenerationDefaults) -> Self {
        Self {
            temperature: defaults.temperature,
            top_p: defaults.top_p,
            top_k: defaults.top_k,
            max_output_tokens: defaults.max_output_tokens,
            response_mime_type: defaults.response_mime_type.clone(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::from(&GenerationDefaults::default())
    }
}

/// Harm category, serialized with the wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl FromStr for HarmCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "harassment" => Ok(Self::Harassment),
            "hate_speech" => Ok(Self::HateSpeech),
            "sexually_explicit" => Ok(Self::SexuallyExplicit),
            "dangerous_content" => Ok(Self::DangerousContent),
            other => Err(format!("unknown harm category: {}", other)),
        }
    }
}

/// Block threshold, serialized with the wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmBlockThreshold {
    #[serde(rename = "BLOCK_NONE")]
    BlockNone,
    #[serde(rename = "BLOCK_ONLY_HIGH")]
    BlockOnlyHigh,
    #[serde(rename = "BLOCK_MEDIUM_AND_ABOVE")]
    BlockMediumAndAbove,
    #[serde(rename = "BLOCK_LOW_AND_ABOVE")]
    BlockLowAndAbove,
}

impl FromStr for HarmBlockThreshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::BlockNone),
            "only_high" => Ok(Self::BlockOnlyHigh),
            "medium_and_above" => Ok(Self::BlockMediumAndAbove),
            "low_and_above" => Ok(Self::BlockLowAndAbove),
            other => Err(format!("unknown block threshold: {}", other)),
        }
    }
}

/// One harm category mapped to its block threshold
#[derive(Debug, Clone, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Create a new safety setting
    pub fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self {
            category,
            threshold,
        }
    }
}

impl TryFrom<&SafetyRule> for SafetySetting {
    type Error = scibot_core::Error;

    fn try_from(rule: &SafetyRule) -> Result<Self, Self::Error> {
        let category = rule
            .category
            .parse()
            .map_err(scibot_core::Error::Config)?;
        let threshold = rule
            .threshold
            .parse()
            .map_err(scibot_core::Error::Config)?;
        Ok(Self::new(category, threshold))
    }
}

/// Trait for model gateways
///
/// A gateway owns the remote side of a conversation: `create_context`
/// starts one with empty prior history, and `send_message` exchanges one
/// user message for one reply within it. The caller never re-sends prior
/// turns; conversational memory lives behind the handle.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Start a remote conversation and return its handle.
    ///
    /// Makes exactly one network round-trip. Fails with
    /// [`GatewayError::Unavailable`] when the service cannot be reached
    /// or rejects the credentials.
    async fn create_context(
        &self,
        system_instruction: &str,
        generation: &GenerationConfig,
        safety: &[SafetySetting],
    ) -> GatewayResult<ContextHandle>;

    /// Send one user message within an existing conversation and return
    /// the reply text. Makes exactly one network call.
    async fn send_message(&self, handle: &ContextHandle, text: &str) -> GatewayResult<String>;
}

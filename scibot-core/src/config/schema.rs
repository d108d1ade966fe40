//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for scibot
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat behavior
    #[serde(default)]
    pub chat: ChatConfig,
    /// Model gateway connection and sampling settings
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Persona sent to the model as the system instruction
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
}

fn default_system_instruction() -> String {
    "You are an expert at teaching science to kids. \
     Your task is to engage in conversations about science and answer questions. \
     Explain scientific concepts in a way that is easily understandable. \
     Use analogies and relatable examples, humor, and interactive questions. \
     Suggest ways these concepts can be related to the real world with observations and experiments."
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_instruction: default_system_instruction(),
        }
    }
}

/// Model gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// API key. Required; usually supplied via GEMINI_API_KEY.
    #[serde(default)]
    pub api_key: String,
    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Sampling defaults
    #[serde(default)]
    pub generation: GenerationDefaults,
    /// Per-category safety thresholds
    #[serde(default = "default_safety_rules")]
    pub safety: Vec<SafetyRule>,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-pro-exp-02-05".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            generation: GenerationDefaults::default(),
            safety: default_safety_rules(),
        }
    }
}

/// Sampling defaults sent with every exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationDefaults {
    /// Sampling randomness; 0 is deterministic
    #[serde(default)]
    pub temperature: f64,
    /// Nucleus sampling breadth
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// Top-k sampling breadth
    #[serde(default = "default_top_k")]
    pub top_k: i32,
    /// Hard cap on reply length
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Reply MIME type (plain text vs structured)
    #[serde(default = "default_response_mime_type")]
    pub response_mime_type: String,
}

fn default_top_p() -> f64 {
    0.95
}

fn default_top_k() -> i32 {
    64
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_response_mime_type() -> String {
    "text/plain".to_string()
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            response_mime_type: default_response_mime_type(),
        }
    }
}

/// One harm-category block threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyRule {
    /// Harm category name (see `validate::KNOWN_HARM_CATEGORIES`)
    pub category: String,
    /// Block threshold name (see `validate::KNOWN_BLOCK_THRESHOLDS`)
    pub threshold: String,
}

impl SafetyRule {
    /// Create a new safety rule
    pub fn new(category: impl Into<String>, threshold: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            threshold: threshold.into(),
        }
    }
}

fn default_safety_rules() -> Vec<SafetyRule> {
    vec![
        SafetyRule::new("harassment", "none"),
        SafetyRule::new("hate_speech", "medium_and_above"),
        SafetyRule::new("sexually_explicit", "medium_and_above"),
        SafetyRule::new("dangerous_content", "medium_and_above"),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}

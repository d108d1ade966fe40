//! Configuration validation rules.

use super::schema::Config;

/// Harm category names accepted in `gateway.safety`.
pub const KNOWN_HARM_CATEGORIES: [&str; 4] = [
    "harassment",
    "hate_speech",
    "sexually_explicit",
    "dangerous_content",
];

/// Block threshold names accepted in `gateway.safety`.
pub const KNOWN_BLOCK_THRESHOLDS: [&str; 4] =
    ["none", "only_high", "medium_and_above", "low_and_above"];

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.gateway.api_key.trim().is_empty() {
        errors.push("gateway.api_key is required (set GEMINI_API_KEY)".to_string());
    }
    if config.gateway.api_base.trim().is_empty() {
        errors.push("gateway.api_base must not be empty".to_string());
    }
    if config.gateway.model.trim().is_empty() {
        errors.push("gateway.model must not be empty".to_string());
    }
    if config.gateway.connect_timeout_secs == 0 {
        errors.push("gateway.connect_timeout_secs must be > 0".to_string());
    }
    if config.gateway.request_timeout_secs == 0 {
        errors.push("gateway.request_timeout_secs must be > 0".to_string());
    }

    if !(0.0..=2.0).contains(&config.gateway.generation.temperature) {
        errors.push("gateway.generation.temperature must be in [0.0, 2.0]".to_string());
    }
    if !(0.0..=1.0).contains(&config.gateway.generation.top_p) {
        errors.push("gateway.generation.top_p must be in [0.0, 1.0]".to_string());
    }
    if config.gateway.generation.top_k < 1 {
        errors.push("gateway.generation.top_k must be >= 1".to_string());
    }
    if config.gateway.generation.max_output_tokens == 0 {
        errors.push("gateway.generation.max_output_tokens must be > 0".to_string());
    }

    for rule in &config.gateway.safety {
        if !KNOWN_HARM_CATEGORIES.contains(&rule.category.as_str()) {
            errors.push(format!(
                "gateway.safety: unknown harm category '{}' (expected one of {:?})",
                rule.category, KNOWN_HARM_CATEGORIES
            ));
        }
        if !KNOWN_BLOCK_THRESHOLDS.contains(&rule.threshold.as_str()) {
            errors.push(format!(
                "gateway.safety: unknown block threshold '{}' (expected one of {:?})",
                rule.threshold, KNOWN_BLOCK_THRESHOLDS
            ));
        }
    }

    if config.chat.system_instruction.trim().is_empty() {
        errors.push("chat.system_instruction must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}

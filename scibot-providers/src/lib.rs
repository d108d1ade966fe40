//! Model gateway integrations for scibot
//!
//! This crate provides the gateway abstraction the chat engine talks to,
//! and the Gemini HTTP implementation of it.

pub mod base;
pub mod gemini;

pub use base::{
    ContextHandle, GatewayError, GatewayResult, GenerationConfig, HarmBlockThreshold,
    HarmCategory, ModelGateway, SafetySetting,
};
pub use gemini::GeminiGateway;

//! Core types and utilities for scibot
//!
//! This crate provides the session state machine, configuration,
//! error types, and logging bootstrap used by the other scibot crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use error::{Error, Result};

//! LLM provider abstraction layer for stock-insight
//!
//! This crate provides provider-agnostic abstractions for talking to a Large
//! Language Model. It includes:
//!
//! - Single-turn completion request/response types
//! - Provider trait for LLM implementations
//! - An OpenAI-compatible provider (Groq by default)
//! - [`LlmAgent`], a prompt-in / text-out agent on top of a provider

pub mod agent;
pub mod completion;
pub mod error;
pub mod provider;
pub mod providers;

// Re-export main types
pub use agent::{LlmAgent, LlmAgentConfig};
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use provider::LLMProvider;

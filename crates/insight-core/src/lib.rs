//! Core abstractions for stock-insight
//!
//! This crate defines the traits and types shared by the LLM agents and the
//! web backend.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};

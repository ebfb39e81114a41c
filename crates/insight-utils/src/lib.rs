//! Shared utilities for stock-insight
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and `.env` loading.

pub mod env;
pub mod logging;

pub use env::load_dotenv;
pub use logging::{LogFormat, init_tracing};

//! A conversation-agent bridge to the keyless LLM7.io completion API.
//!
//! This library turns a user utterance plus a read-only configuration (model,
//! prompt template, limits) into a single HTTP exchange with LLM7.io and
//! returns the generated text, with failures surfaced as distinct,
//! inspectable error kinds. The service is best-effort: no API key, models
//! rotated without notice, occasional slowness under load.

pub mod bridge;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod reply;
pub mod wire;

// Re-export core types for easy usage
pub use bridge::{Llm7Client, LLM7_BASE_URL};
pub use cache::{CacheStats, ResponseCache};
pub use config::{BridgeConfig, DEFAULT_PROMPT, PROMPT_PLACEHOLDER};
pub use error::Error;
pub use model::Model;
pub use provider::CompletionProvider;
pub use reply::extract_json;

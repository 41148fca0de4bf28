use crate::{BridgeConfig, Error};

/// A pluggable text-in/text-out completion backend.
/// Hosts code against this trait so a mock responder can stand in for the
/// live service in tests.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Produce a completion for a user utterance under the given configuration.
    async fn complete(&self, text: &str, config: &BridgeConfig) -> Result<String, Error>;
}

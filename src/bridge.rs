use log::{debug, error};
use reqwest::Client;

use crate::provider::CompletionProvider;
use crate::wire::{ChatMessage, ChatRequest, ChatResponse};
use crate::{BridgeConfig, Error};

/// Public LLM7.io API root.
pub const LLM7_BASE_URL: &str = "https://api.llm7.io/v1";

/// Upper bound on the body excerpt carried inside an error.
const BODY_EXCERPT_LEN: usize = 256;

/// Client for the LLM7.io chat-completion endpoint.
///
/// Holds no cross-request state: each `complete` call is one independent
/// request/response exchange, so a single client may be shared across
/// concurrent conversations.
pub struct Llm7Client {
    client: Client,
    base_url: String,
}

impl Llm7Client {
    /// Create a client for the public endpoint.
    pub fn new() -> Result<Self, Error> {
        Self::new_with_base_url(LLM7_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    pub fn new_with_base_url(base_url: String) -> Result<Self, Error> {
        let client = Client::builder().build().map_err(Error::Network)?;
        Ok(Self { client, base_url })
    }

    /// Request a completion for a user utterance.
    ///
    /// Validates locally first (`InvalidConfiguration` failures never reach
    /// the network), then issues exactly one POST bounded by
    /// `config.timeout`. The call is never retried; transport failures map to
    /// `Network`, non-2xx statuses to `Upstream`, and 2xx bodies without a
    /// completion text to `MalformedResponse`.
    pub async fn complete(&self, text: &str, config: &BridgeConfig) -> Result<String, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_configuration("input text is empty"));
        }

        let request = ChatRequest {
            model: config.model,
            messages: vec![ChatMessage::user(config.render_prompt(text))],
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        };

        debug!("requesting completion from model {}", config.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("completion request failed: {e}");
                Error::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Network)?;

        if !status.is_success() {
            error!("upstream rejected completion with HTTP {status}");
            return Err(Error::upstream(status.as_u16(), excerpt(&body)));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|_| Error::malformed(format!("not a completion object: {}", excerpt(&body))))?;

        match parsed.first_choice_text() {
            Some(content) => {
                debug!("received completion of {} bytes", content.len());
                Ok(content.trim().to_string())
            }
            None => Err(Error::malformed(format!(
                "no completion text in body: {}",
                excerpt(&body)
            ))),
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for Llm7Client {
    async fn complete(&self, text: &str, config: &BridgeConfig) -> Result<String, Error> {
        Llm7Client::complete(self, text, config).await
    }
}

/// Bounded, char-boundary-safe prefix of an upstream body for error messages.
fn excerpt(body: &str) -> String {
    if body.len() <= BODY_EXCERPT_LEN {
        return body.to_string();
    }
    let mut end = BODY_EXCERPT_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(Llm7Client::new().is_ok());
    }

    #[tokio::test]
    async fn test_empty_input_fails_locally() {
        let client = Llm7Client::new().unwrap();
        let config = BridgeConfig::default();

        for text in ["", "   ", "\n\t"] {
            let err = client.complete(text, &config).await.unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long = "x".repeat(1000);
        let cut = excerpt(&long);
        assert!(cut.len() <= BODY_EXCERPT_LEN + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let long = "ä".repeat(BODY_EXCERPT_LEN);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
    }
}

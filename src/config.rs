use std::time::Duration;

use crate::{Error, Model};

/// The substitution point recognized in a prompt template.
pub const PROMPT_PLACEHOLDER: &str = "{input}";

/// Default system prompt offered by the setup flow.
pub const DEFAULT_PROMPT: &str = "You are a helpful and intelligent assistant. \
You answer questions precisely and in the language of the user.";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call configuration for the bridge.
///
/// Owned by the host's config-entry storage and handed to every `complete`
/// call as a read-only value. The bridge never mutates it and keeps no copy
/// between calls.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub model: Model,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl BridgeConfig {
    /// Create a configuration for a model with the default prompt and limits.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            prompt: DEFAULT_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build a configuration from the host's stored option strings.
    ///
    /// The model name is validated against the supported set; an unknown name
    /// fails with `InvalidConfiguration` before any request is attempted.
    pub fn from_options(model: &str, prompt: &str) -> Result<Self, Error> {
        let model = model.parse::<Model>()?;
        Ok(Self::new(model).with_prompt(prompt))
    }

    /// Set the prompt template.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render the final prompt for a user utterance.
    ///
    /// The template's single `{input}` substitution point (first occurrence)
    /// receives the user text. A template without a substitution point yields
    /// the user text verbatim.
    pub fn render_prompt(&self, text: &str) -> String {
        if self.prompt.contains(PROMPT_PLACEHOLDER) {
            self.prompt.replacen(PROMPT_PLACEHOLDER, text, 1)
        } else {
            text.to_string()
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(Model::default())
    }
}

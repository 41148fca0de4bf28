//! Wire types for the LLM7.io chat-completion endpoint.

use serde::{Deserialize, Serialize};

use crate::Model;

/// Request body for `POST /v1/chat/completions`. No authentication fields;
/// the endpoint is public.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: Model,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// A single message in the request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response body for a successful completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One completion choice. The service answers in the chat shape
/// (`message.content`) but older models still use the legacy completion
/// shape (`text`), so both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Message content inside a chat-shaped choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Extract the generated text from the first choice, if the body carries
    /// one in either accepted shape.
    pub fn first_choice_text(&self) -> Option<&str> {
        let choice = self.choices.first()?;
        if let Some(message) = &choice.message {
            if let Some(content) = &message.content {
                return Some(content);
            }
        }
        choice.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_chat_shape() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_choice_text(), Some("Hello!"));
    }

    #[test]
    fn test_extracts_legacy_text_shape() {
        let body = r#"{"choices":[{"text":"Hello!"}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_choice_text(), Some("Hello!"));
    }

    #[test]
    fn test_missing_content_yields_none() {
        let body = r#"{"choices":[{"index":0}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_choice_text(), None);

        let body = r#"{"id":"cmpl-1"}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_choice_text(), None);
    }

    #[test]
    fn test_request_skips_absent_limits() {
        let request = ChatRequest {
            model: Model::Gpt4o,
            messages: vec![ChatMessage::user("hi")],
            temperature: None,
            max_tokens: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o\""));
        assert!(!json.contains("temperature"));
        assert!(!json.contains("max_tokens"));
    }
}

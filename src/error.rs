use thiserror::Error;

/// Errors that can occur when using the llm7-bridge library.
///
/// The four kinds are deliberately distinct so a host can present a
/// kind-specific message: a local validation failure never reached the
/// network, while `Upstream` and `MalformedResponse` tell apart "the service
/// rejected the call" from "the service answered in an unexpected shape".
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed response from upstream: {0}")]
    MalformedResponse(String),
}

impl Error {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration(message.into())
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Error::Upstream {
            status,
            body: body.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedResponse(message.into())
    }

    /// The upstream HTTP status, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

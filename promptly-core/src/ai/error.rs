use anyhow::anyhow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Network error: {0}")]
    Network(anyhow::Error),

    #[error("Authentication failed: {0}")]
    Auth(anyhow::Error),

    #[error("Rate limited: {0}")]
    RateLimited(anyhow::Error),

    #[error("API error: {0}")]
    Api(anyhow::Error),

    #[error("{0}")]
    Terminal(anyhow::Error),
}

impl AiError {
    /// The human readable cause, without the variant prefix. Empty when the
    /// underlying error carried no message.
    pub fn message(&self) -> String {
        let source = match self {
            Self::Network(e) | Self::Auth(e) | Self::RateLimited(e) | Self::Api(e) => e,
            Self::Terminal(e) => e,
        };
        source.to_string().trim().to_string()
    }
}

impl From<serde_json::Error> for AiError {
    fn from(source: serde_json::Error) -> Self {
        Self::Api(anyhow!(source))
    }
}

impl From<reqwest::Error> for AiError {
    fn from(source: reqwest::Error) -> Self {
        Self::Network(anyhow!(source))
    }
}

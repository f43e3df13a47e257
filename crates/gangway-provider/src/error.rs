//! Provider configuration error types

use thiserror::Error;

/// Errors raised while decoding or using the provider-level configuration.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Transport(#[from] gangway_transport::TransportError),

    #[error("malformed provider configuration at {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    pub fn decode(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

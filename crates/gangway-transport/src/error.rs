//! Transport configuration error types

use crate::kind::TransportKind;
use thiserror::Error;

/// Errors raised while decoding, validating, merging, or resolving an
/// embedded transport configuration.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A wire value had the wrong shape for the attribute at `path`.
    #[error("malformed value for {path}: {reason}")]
    Decode { path: String, reason: String },

    /// A structural rule was violated by the configuration at `path`.
    #[error("invalid configuration for {path}: {reason}")]
    Validation { path: String, reason: String },

    /// No transport was configured where exactly one is required.
    #[error("no transport configured: set exactly one of ssh, kubernetes, or nomad")]
    NotConfigured,

    /// More than one transport was configured at the resource level.
    #[error("more than one transport configured: {}", kind_list(.0))]
    MultipleConfigured(Vec<TransportKind>),

    /// The resource configured no transport and the provider defaults could
    /// not supply an unambiguous one.
    #[error(
        "cannot determine default transport: provider configures {}, exactly one is required",
        kind_list(.0)
    )]
    AmbiguousDefault(Vec<TransportKind>),

    /// `client()` was called on a config with no injected client factory.
    #[error("no client factory registered for the {0} transport")]
    NoClientFactory(TransportKind),

    /// The injected factory failed to build a client.
    #[error("failed to build {kind} transport client ({detail}): {source}")]
    ClientBuild {
        kind: TransportKind,
        /// Non-secret identifying attributes (host, pod, allocation id).
        detail: String,
        #[source]
        source: anyhow::Error,
    },

    /// An error surfaced by a concrete transport implementation.
    #[error(transparent)]
    Remote(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// Shorthand for a decode error at an attribute path.
    pub fn decode(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a validation error at an attribute path.
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn kind_list(kinds: &[TransportKind]) -> String {
    if kinds.is_empty() {
        return "none".to_string();
    }
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, TransportError>;

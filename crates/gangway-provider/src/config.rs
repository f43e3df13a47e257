//! Provider-level configuration
//!
//! The provider block carries a transport that serves purely as a defaults
//! source for resource-level transports (it may configure several kinds at
//! once and is never used to build a client directly), plus the root
//! directory for failure-debug artifacts.
//!
//! Sharing is copy-on-read: hold the configured value behind an `Arc` and
//! hand each resource evaluation its own [`ProviderConfig::snapshot`].

use crate::error::{ProviderError, Result};
use gangway_transport::{EmbeddedTransport, TriState, WireValue};
use std::path::PathBuf;
use tracing::warn;

/// Environment variable overriding `debug_data_root_dir` after decode.
pub const DEBUG_DATA_ROOT_DIR_ENV: &str = "GANGWAY_DEBUG_DATA_ROOT_DIR";

/// The decoded provider configuration block.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Defaults source for resource transports.
    pub transport: EmbeddedTransport,
    /// Where failure-debug artifacts are collected, if anywhere.
    pub debug_data_root_dir: TriState<String>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from the provider wire object, fully replacing prior state.
    pub fn from_wire(value: &WireValue) -> Result<Self> {
        let fields = match value {
            WireValue::Null | WireValue::Unknown => return Ok(Self::new()),
            WireValue::Object(fields) => fields,
            other => {
                return Err(ProviderError::decode(
                    "provider",
                    format!("expected object, got {}", other.type_name()),
                ));
            }
        };

        let mut config = Self::new();
        for (key, field) in fields {
            match key.as_str() {
                "transport" => config.transport = EmbeddedTransport::from_wire(field)?,
                "debug_data_root_dir" => {
                    config.debug_data_root_dir =
                        TriState::from_wire("provider.debug_data_root_dir", field)?;
                }
                _ => {
                    return Err(ProviderError::decode(
                        format!("provider.{key}"),
                        "unrecognized attribute",
                    ));
                }
            }
        }
        Ok(config)
    }

    pub fn to_wire(&self) -> WireValue {
        WireValue::object([
            ("transport".to_string(), self.transport.to_wire()),
            (
                "debug_data_root_dir".to_string(),
                self.debug_data_root_dir.to_wire(),
            ),
        ])
    }

    /// Apply environment overrides after normal decode. A set, non-empty
    /// `GANGWAY_DEBUG_DATA_ROOT_DIR` replaces the configured value.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(DEBUG_DATA_ROOT_DIR_ENV) {
            if !dir.is_empty() {
                warn!(dir = %dir, "overriding debug_data_root_dir from {DEBUG_DATA_ROOT_DIR_ENV}");
                self.debug_data_root_dir.set(dir);
            }
        }
    }

    /// Independent deep copy for a single resource evaluation. Resources
    /// must never mutate the shared provider value in place; this is the
    /// only sanctioned sharing mechanism.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// The debug artifact root, when one is configured.
    pub fn debug_data_root(&self) -> Option<PathBuf> {
        self.debug_data_root_dir.get().map(PathBuf::from)
    }
}

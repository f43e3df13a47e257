//! Gangway Provider Configuration
//!
//! The provider-level half of the transport model: the shared defaults
//! source that resource transports merge against, the debug-artifact
//! directory setting with its environment override, and the diagnostics
//! rendering that consumes the transport debug view.
//!
//! The provider transport may configure several kinds at once; it is read by
//! every resource evaluation through [`ProviderConfig::snapshot`] and never
//! mutated in place.

pub mod config;
pub mod diagnostics;
pub mod error;

// Re-exports
pub use config::{DEBUG_DATA_ROOT_DIR_ENV, ProviderConfig};
pub use diagnostics::{artifact_dir, failure_diagnostics};
pub use error::{ProviderError, Result};

//! Gangway Embedded Transport
//!
//! This crate provides the remote-transport configuration core for gangway,
//! unifying three remote-access mechanisms (SSH, Kubernetes exec, Nomad
//! exec) behind one capability interface and one layered configuration
//! model.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               resource lifecycle                 │
//! │        (plan / apply / read, out of crate)       │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │             gangway-transport                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        EmbeddedTransport aggregate        │   │
//! │  │  decode / merge defaults / validate       │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌────────┐  ┌────────────┐  ┌────────┐        │
//! │  │  ssh   │  │ kubernetes │  │ nomad  │        │
//! │  └────────┘  └────────────┘  └────────┘        │
//! └───────┬─────────────────────────────────────────┘
//!         │ injected client factories
//! ┌───────▼───────────────────────────────┐
//! │  concrete transports (out of crate)    │
//! │  trait Transport { open(...) }         │
//! └───────────────────────────────────────┘
//! ```
//!
//! Configuration attributes are tri-state (known / null / unknown) to match
//! the host protocol's value semantics; the provider-level transport acts
//! purely as a per-attribute defaults source for resource-level transports.

pub mod embedded;
pub mod error;
pub mod kind;
pub mod kubernetes;
pub mod nomad;
pub mod schema;
pub mod ssh;
pub mod transport;
pub mod value;
pub mod wire;

// Re-exports
pub use embedded::{EmbeddedTransport, ResolvedTransport};
pub use error::{Result, TransportError};
pub use kind::TransportKind;
pub use kubernetes::{DEFAULT_NAMESPACE, KubernetesConfig, KubernetesSettings};
pub use nomad::{NomadConfig, NomadSettings};
pub use schema::{AttrSpec, NULL_SENTINEL, REDACTED, UNKNOWN_SENTINEL};
pub use ssh::{SshConfig, SshSettings};
pub use transport::{ClientFactory, ExecOutput, Session, Transport};
pub use value::{AttrCodec, TriState};
pub use wire::WireValue;

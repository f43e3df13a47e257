//! Embedded transport aggregate
//!
//! Resources and the provider both embed one of these. Before resolution it
//! is a struct of optional per-kind configs: the provider level may hold
//! several at once (it is only a defaults source), while a resource must end
//! up with exactly one after default-merge. After resolution the single
//! chosen config is exposed as the tagged [`ResolvedTransport`] variant.
//!
//! Sharing is copy-on-read: the provider-level value is cloned into each
//! resource evaluation and never mutated in place.

use crate::error::{Result, TransportError};
use crate::kind::TransportKind;
use crate::kubernetes::KubernetesConfig;
use crate::nomad::NomadConfig;
use crate::ssh::SshConfig;
use crate::transport::Transport;
use crate::wire::WireValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// The union-like container holding a slot per transport kind.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedTransport {
    ssh: Option<SshConfig>,
    kubernetes: Option<KubernetesConfig>,
    nomad: Option<NomadConfig>,
}

/// The single transport chosen after default-merge and validation.
///
/// Never serialized; the rest of the system reaches the remote target only
/// through [`Transport`] handles built from it.
#[derive(Debug)]
pub enum ResolvedTransport<'a> {
    Ssh(&'a SshConfig),
    Kubernetes(&'a KubernetesConfig),
    Nomad(&'a NomadConfig),
}

impl<'a> ResolvedTransport<'a> {
    pub fn kind(&self) -> TransportKind {
        match self {
            ResolvedTransport::Ssh(_) => TransportKind::Ssh,
            ResolvedTransport::Kubernetes(_) => TransportKind::Kubernetes,
            ResolvedTransport::Nomad(_) => TransportKind::Nomad,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ResolvedTransport::Ssh(config) => config.validate(),
            ResolvedTransport::Kubernetes(config) => config.validate(),
            ResolvedTransport::Nomad(config) => config.validate(),
        }
    }

    /// Build (once per underlying config) and return the transport client.
    pub async fn client(&self) -> Result<Arc<dyn Transport>> {
        match self {
            ResolvedTransport::Ssh(config) => config.client().await,
            ResolvedTransport::Kubernetes(config) => config.client().await,
            ResolvedTransport::Nomad(config) => config.client().await,
        }
    }

    /// Redacted attribute view of the chosen config.
    pub fn debug_view(&self) -> BTreeMap<String, String> {
        match self {
            ResolvedTransport::Ssh(config) => config.debug_view(),
            ResolvedTransport::Kubernetes(config) => config.debug_view(),
            ResolvedTransport::Nomad(config) => config.debug_view(),
        }
    }
}

impl EmbeddedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from the wire object. A known, non-null sub-value configures
    /// its kind; a null, unknown, or absent sub-value leaves the kind
    /// unconfigured (absent and null are deliberately equivalent). Prior
    /// state is fully replaced.
    pub fn from_wire(value: &WireValue) -> Result<Self> {
        let mut transport = Self::new();
        let fields = match value {
            // An absent or not-yet-known transport block is an empty one.
            WireValue::Null | WireValue::Unknown => return Ok(transport),
            WireValue::Object(fields) => fields,
            other => {
                return Err(TransportError::decode(
                    "transport",
                    format!("expected object, got {}", other.type_name()),
                ));
            }
        };

        for (key, field) in fields {
            let Some(kind) = TransportKind::from_key(key) else {
                return Err(TransportError::decode(
                    format!("transport.{key}"),
                    "unrecognized transport kind",
                ));
            };
            if !field.is_known() {
                continue;
            }
            match kind {
                TransportKind::Ssh => transport.ssh = Some(SshConfig::from_wire(field)?),
                TransportKind::Kubernetes => {
                    transport.kubernetes = Some(KubernetesConfig::from_wire(field)?);
                }
                TransportKind::Nomad => transport.nomad = Some(NomadConfig::from_wire(field)?),
            }
        }
        Ok(transport)
    }

    /// Encode to the fixed-shape wire object: all three kind keys are always
    /// present, unconfigured kinds as null.
    pub fn to_wire(&self) -> WireValue {
        WireValue::object([
            (
                TransportKind::Ssh.key().to_string(),
                self.ssh.as_ref().map_or(WireValue::Null, SshConfig::to_wire),
            ),
            (
                TransportKind::Kubernetes.key().to_string(),
                self.kubernetes
                    .as_ref()
                    .map_or(WireValue::Null, KubernetesConfig::to_wire),
            ),
            (
                TransportKind::Nomad.key().to_string(),
                self.nomad.as_ref().map_or(WireValue::Null, NomadConfig::to_wire),
            ),
        ])
    }

    /// The kinds currently configured, in wire-schema order.
    pub fn configured_kinds(&self) -> Vec<TransportKind> {
        let mut kinds = Vec::new();
        if self.ssh.is_some() {
            kinds.push(TransportKind::Ssh);
        }
        if self.kubernetes.is_some() {
            kinds.push(TransportKind::Kubernetes);
        }
        if self.nomad.is_some() {
            kinds.push(TransportKind::Nomad);
        }
        kinds
    }

    pub fn is_configured(&self, kind: TransportKind) -> bool {
        match kind {
            TransportKind::Ssh => self.ssh.is_some(),
            TransportKind::Kubernetes => self.kubernetes.is_some(),
            TransportKind::Nomad => self.nomad.is_some(),
        }
    }

    pub fn ssh(&self) -> Option<&SshConfig> {
        self.ssh.as_ref()
    }

    pub fn kubernetes(&self) -> Option<&KubernetesConfig> {
        self.kubernetes.as_ref()
    }

    pub fn nomad(&self) -> Option<&NomadConfig> {
        self.nomad.as_ref()
    }

    pub fn ssh_mut(&mut self) -> Option<&mut SshConfig> {
        self.ssh.as_mut()
    }

    pub fn kubernetes_mut(&mut self) -> Option<&mut KubernetesConfig> {
        self.kubernetes.as_mut()
    }

    pub fn nomad_mut(&mut self) -> Option<&mut NomadConfig> {
        self.nomad.as_mut()
    }

    /// Replace a kind's config wholesale.
    pub fn set_ssh(&mut self, config: SshConfig) {
        self.ssh = Some(config);
    }

    pub fn set_kubernetes(&mut self, config: KubernetesConfig) {
        self.kubernetes = Some(config);
    }

    pub fn set_nomad(&mut self, config: NomadConfig) {
        self.nomad = Some(config);
    }

    /// Unconfigure a kind.
    pub fn clear(&mut self, kind: TransportKind) {
        match kind {
            TransportKind::Ssh => self.ssh = None,
            TransportKind::Kubernetes => self.kubernetes = None,
            TransportKind::Nomad => self.nomad = None,
        }
    }

    /// Fill this (resource-level) transport from a provider-level defaults
    /// source, attribute by attribute, and return the resolved kind.
    ///
    /// The resource's own kind wins when it configured one. With no kind
    /// configured here, the source must configure exactly one, which is
    /// adopted. More than one kind configured here is always an error.
    /// Attributes already known here are never overwritten: the more
    /// specific configuration wins per attribute, never block-wise.
    pub fn apply_defaults(&mut self, src: &EmbeddedTransport) -> Result<TransportKind> {
        let own_kinds = self.configured_kinds();
        let kind = match own_kinds.len() {
            1 => own_kinds[0],
            0 => {
                let src_kinds = src.configured_kinds();
                if src_kinds.len() != 1 {
                    return Err(TransportError::AmbiguousDefault(src_kinds));
                }
                src_kinds[0]
            }
            _ => return Err(TransportError::MultipleConfigured(own_kinds)),
        };

        match kind {
            TransportKind::Ssh => {
                let config = self.ssh.get_or_insert_with(SshConfig::new);
                if let Some(defaults) = &src.ssh {
                    config.apply_defaults(defaults);
                }
            }
            TransportKind::Kubernetes => {
                let config = self.kubernetes.get_or_insert_with(KubernetesConfig::new);
                if let Some(defaults) = &src.kubernetes {
                    config.apply_defaults(defaults);
                }
            }
            TransportKind::Nomad => {
                let config = self.nomad.get_or_insert_with(NomadConfig::new);
                if let Some(defaults) = &src.nomad {
                    config.apply_defaults(defaults);
                }
            }
        }

        debug!(kind = %kind, "merged transport defaults");
        Ok(kind)
    }

    /// Resource-level validation: exactly one kind configured, and that
    /// kind's own required-attribute rule passes.
    pub fn validate(&self) -> Result<()> {
        self.resolved()?.validate()
    }

    /// The single configured transport. Zero configured kinds or several is
    /// a configuration error, never a silent pick.
    pub fn resolved(&self) -> Result<ResolvedTransport<'_>> {
        let kinds = self.configured_kinds();
        match kinds.len() {
            0 => return Err(TransportError::NotConfigured),
            1 => {}
            _ => return Err(TransportError::MultipleConfigured(kinds)),
        }
        let resolved = match kinds[0] {
            TransportKind::Ssh => self.ssh.as_ref().map(ResolvedTransport::Ssh),
            TransportKind::Kubernetes => self.kubernetes.as_ref().map(ResolvedTransport::Kubernetes),
            TransportKind::Nomad => self.nomad.as_ref().map(ResolvedTransport::Nomad),
        };
        resolved.ok_or(TransportError::NotConfigured)
    }

    /// Build (once per config instance) and return the client for the
    /// resolved transport.
    pub async fn client(&self) -> Result<Arc<dyn Transport>> {
        self.resolved()?.client().await
    }

    /// Human-readable block appended to failure diagnostics.
    pub fn diagnostics(&self) -> String {
        match self.resolved() {
            Ok(resolved) => {
                let mut out = format!("{} transport configuration:\n", resolved.kind());
                for (name, value) in resolved.debug_view() {
                    out.push_str("  ");
                    out.push_str(&name);
                    out.push_str(": ");
                    out.push_str(&value);
                    out.push('\n');
                }
                out
            }
            Err(_) => "transport configuration: unresolved\n".to_string(),
        }
    }
}

//! Kubernetes exec transport configuration

use crate::error::{Result, TransportError};
use crate::kind::TransportKind;
use crate::schema::{AttrSpec, render_attr};
use crate::transport::{ClientFactory, Transport};
use crate::value::TriState;
use crate::wire::WireValue;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Namespace used when the configuration leaves it unset. Applied during
/// settings resolution, never written back into attribute state.
pub const DEFAULT_NAMESPACE: &str = "default";

const ATTRS: [AttrSpec; 5] = [
    AttrSpec::sensitive("kubeconfig_base64"),
    AttrSpec::required("context_name"),
    AttrSpec::optional("namespace"),
    AttrSpec::required("pod"),
    AttrSpec::optional("container"),
];

/// Fully-resolved Kubernetes exec settings handed to the client factory.
#[derive(Debug, Clone, PartialEq)]
pub struct KubernetesSettings {
    pub kubeconfig_base64: String,
    pub context_name: String,
    pub namespace: String,
    pub pod: String,
    /// None means "the pod's default container"; choosing it is the
    /// concrete transport's job.
    pub container: Option<String>,
}

/// Kubernetes transport configuration block.
pub struct KubernetesConfig {
    pub kubeconfig_base64: TriState<String>,
    pub context_name: TriState<String>,
    pub namespace: TriState<String>,
    pub pod: TriState<String>,
    pub container: TriState<String>,
    factory: Option<ClientFactory<KubernetesSettings>>,
    client: OnceCell<Arc<dyn Transport>>,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            kubeconfig_base64: TriState::Null,
            context_name: TriState::Null,
            namespace: TriState::Null,
            pod: TriState::Null,
            container: TriState::Null,
            factory: None,
            client: OnceCell::new(),
        }
    }
}

impl Clone for KubernetesConfig {
    /// Deep copy with an empty client cache (see `SshConfig::clone`).
    fn clone(&self) -> Self {
        Self {
            kubeconfig_base64: self.kubeconfig_base64.clone(),
            context_name: self.context_name.clone(),
            namespace: self.namespace.clone(),
            pod: self.pod.clone(),
            container: self.container.clone(),
            factory: self.factory.clone(),
            client: OnceCell::new(),
        }
    }
}

impl fmt::Debug for KubernetesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.debug_view()).finish()
    }
}

impl KubernetesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema() -> &'static [AttrSpec] {
        &ATTRS
    }

    pub fn set_factory(&mut self, factory: ClientFactory<KubernetesSettings>) {
        self.factory = Some(factory);
    }

    pub fn with_factory(mut self, factory: ClientFactory<KubernetesSettings>) -> Self {
        self.set_factory(factory);
        self
    }

    pub fn from_wire(value: &WireValue) -> Result<Self> {
        let WireValue::Object(fields) = value else {
            return Err(TransportError::decode(
                "kubernetes",
                format!("expected object, got {}", value.type_name()),
            ));
        };

        let mut config = Self::new();
        for (key, field) in fields {
            let path = format!("kubernetes.{key}");
            match key.as_str() {
                "kubeconfig_base64" => {
                    config.kubeconfig_base64 = TriState::from_wire(&path, field)?;
                }
                "context_name" => config.context_name = TriState::from_wire(&path, field)?,
                "namespace" => config.namespace = TriState::from_wire(&path, field)?,
                "pod" => config.pod = TriState::from_wire(&path, field)?,
                "container" => config.container = TriState::from_wire(&path, field)?,
                _ => {
                    return Err(TransportError::decode(path, "unrecognized attribute"));
                }
            }
        }
        Ok(config)
    }

    pub fn to_wire(&self) -> WireValue {
        WireValue::object([
            ("kubeconfig_base64".to_string(), self.kubeconfig_base64.to_wire()),
            ("context_name".to_string(), self.context_name.to_wire()),
            ("namespace".to_string(), self.namespace.to_wire()),
            ("pod".to_string(), self.pod.to_wire()),
            ("container".to_string(), self.container.to_wire()),
        ])
    }

    pub fn apply_defaults(&mut self, src: &KubernetesConfig) {
        self.kubeconfig_base64.merge_default(&src.kubeconfig_base64);
        self.context_name.merge_default(&src.context_name);
        self.namespace.merge_default(&src.namespace);
        self.pod.merge_default(&src.pod);
        self.container.merge_default(&src.container);
        if self.factory.is_none() {
            self.factory = src.factory.clone();
        }
    }

    /// Structural validation: kubeconfig, context and pod must be known.
    /// Namespace and container defaulting happens at client construction,
    /// not here.
    pub fn validate(&self) -> Result<()> {
        if !self.kubeconfig_base64.is_known() {
            return Err(TransportError::validation(
                "kubernetes.kubeconfig_base64",
                "must be a known value",
            ));
        }
        if !self.context_name.is_known() {
            return Err(TransportError::validation(
                "kubernetes.context_name",
                "must be a known value",
            ));
        }
        if !self.pod.is_known() {
            return Err(TransportError::validation("kubernetes.pod", "must be a known value"));
        }
        Ok(())
    }

    /// Resolve settings for the client factory: the namespace falls back to
    /// `"default"`, the container to the pod's default container, and the
    /// kubeconfig payload must decode as base64.
    pub fn resolved_settings(&self) -> Result<KubernetesSettings> {
        self.validate()?;

        let kubeconfig_base64 = self.kubeconfig_base64.cloned().unwrap_or_default();
        if BASE64.decode(&kubeconfig_base64).is_err() {
            return Err(TransportError::validation(
                "kubernetes.kubeconfig_base64",
                "is not valid base64",
            ));
        }

        Ok(KubernetesSettings {
            kubeconfig_base64,
            context_name: self.context_name.cloned().unwrap_or_default(),
            namespace: self
                .namespace
                .cloned()
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            pod: self.pod.cloned().unwrap_or_default(),
            container: self.container.cloned(),
        })
    }

    /// Build (once) and return the Kubernetes transport client.
    pub async fn client(&self) -> Result<Arc<dyn Transport>> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let factory = self
                    .factory
                    .as_ref()
                    .ok_or(TransportError::NoClientFactory(TransportKind::Kubernetes))?;
                let settings = self.resolved_settings()?;
                let detail = format!(
                    "context={}, namespace={}, pod={}",
                    settings.context_name, settings.namespace, settings.pod
                );
                debug!(
                    context = %settings.context_name,
                    namespace = %settings.namespace,
                    pod = %settings.pod,
                    "building kubernetes transport client"
                );
                (factory)(settings).await.map_err(|source| TransportError::ClientBuild {
                    kind: TransportKind::Kubernetes,
                    detail,
                    source,
                })
            })
            .await?;
        Ok(Arc::clone(client))
    }

    pub fn debug_view(&self) -> BTreeMap<String, String> {
        let mut view = BTreeMap::new();
        for attr in &ATTRS {
            let value = match attr.name {
                "kubeconfig_base64" => &self.kubeconfig_base64,
                "context_name" => &self.context_name,
                "namespace" => &self.namespace,
                "pod" => &self.pod,
                _ => &self.container,
            };
            view.insert(attr.name.to_string(), render_attr(value, attr.sensitive));
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::REDACTED;

    fn configured() -> KubernetesConfig {
        let mut config = KubernetesConfig::new();
        // "kubeconfig" in base64
        config.kubeconfig_base64.set("a3ViZWNvbmZpZw==".to_string());
        config.context_name.set("kind-kind".to_string());
        config.pod.set("app-0".to_string());
        config
    }

    #[test]
    fn test_validate_required_attributes() {
        let mut config = configured();
        config.context_name = TriState::Unknown;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("kubernetes.context_name"));
    }

    #[test]
    fn test_namespace_and_container_default_at_resolution_only() {
        let config = configured();
        assert!(config.validate().is_ok());

        // Attribute state is untouched by defaulting.
        assert!(config.namespace.is_null());
        assert!(config.container.is_null());

        let settings = config.resolved_settings().unwrap();
        assert_eq!(settings.namespace, DEFAULT_NAMESPACE);
        assert_eq!(settings.container, None);

        // And still untouched afterwards.
        assert!(config.namespace.is_null());
        assert!(config.container.is_null());
    }

    #[test]
    fn test_explicit_namespace_survives_resolution() {
        let mut config = configured();
        config.namespace.set("infra".to_string());
        config.container.set("sidecar".to_string());
        let settings = config.resolved_settings().unwrap();
        assert_eq!(settings.namespace, "infra");
        assert_eq!(settings.container.as_deref(), Some("sidecar"));
    }

    #[test]
    fn test_resolution_rejects_bad_base64() {
        let mut config = configured();
        config.kubeconfig_base64.set("not base64!!".to_string());
        let err = config.resolved_settings().unwrap_err();
        assert!(err.to_string().contains("kubeconfig_base64"));
    }

    #[test]
    fn test_wire_round_trip_preserves_unknown() {
        let mut config = configured();
        config.pod = TriState::Unknown;
        let round = KubernetesConfig::from_wire(&config.to_wire()).unwrap();
        assert!(round.pod.is_unknown());
        assert_eq!(round.context_name, config.context_name);
    }

    #[test]
    fn test_debug_view_redacts_kubeconfig() {
        let view = configured().debug_view();
        assert_eq!(view["kubeconfig_base64"], REDACTED);
        assert_eq!(view["pod"], "app-0");
    }
}

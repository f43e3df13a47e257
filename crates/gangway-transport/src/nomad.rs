//! Nomad exec transport configuration

use crate::error::{Result, TransportError};
use crate::kind::TransportKind;
use crate::schema::{AttrSpec, render_attr};
use crate::transport::{ClientFactory, Transport};
use crate::value::TriState;
use crate::wire::WireValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

const ATTRS: [AttrSpec; 4] = [
    AttrSpec::required("host"),
    AttrSpec::sensitive("secret_id"),
    AttrSpec::required("allocation_id"),
    AttrSpec::required("task_name"),
];

/// Fully-resolved Nomad exec settings handed to the client factory.
#[derive(Debug, Clone, PartialEq)]
pub struct NomadSettings {
    pub host: String,
    pub secret_id: Option<String>,
    pub allocation_id: String,
    pub task_name: String,
}

/// Nomad transport configuration block.
pub struct NomadConfig {
    pub host: TriState<String>,
    pub secret_id: TriState<String>,
    pub allocation_id: TriState<String>,
    pub task_name: TriState<String>,
    factory: Option<ClientFactory<NomadSettings>>,
    client: OnceCell<Arc<dyn Transport>>,
}

impl Default for NomadConfig {
    fn default() -> Self {
        Self {
            host: TriState::Null,
            secret_id: TriState::Null,
            allocation_id: TriState::Null,
            task_name: TriState::Null,
            factory: None,
            client: OnceCell::new(),
        }
    }
}

impl Clone for NomadConfig {
    /// Deep copy with an empty client cache (see `SshConfig::clone`).
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            secret_id: self.secret_id.clone(),
            allocation_id: self.allocation_id.clone(),
            task_name: self.task_name.clone(),
            factory: self.factory.clone(),
            client: OnceCell::new(),
        }
    }
}

impl fmt::Debug for NomadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.debug_view()).finish()
    }
}

impl NomadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema() -> &'static [AttrSpec] {
        &ATTRS
    }

    pub fn set_factory(&mut self, factory: ClientFactory<NomadSettings>) {
        self.factory = Some(factory);
    }

    pub fn with_factory(mut self, factory: ClientFactory<NomadSettings>) -> Self {
        self.set_factory(factory);
        self
    }

    pub fn from_wire(value: &WireValue) -> Result<Self> {
        let WireValue::Object(fields) = value else {
            return Err(TransportError::decode(
                "nomad",
                format!("expected object, got {}", value.type_name()),
            ));
        };

        let mut config = Self::new();
        for (key, field) in fields {
            let path = format!("nomad.{key}");
            match key.as_str() {
                "host" => config.host = TriState::from_wire(&path, field)?,
                "secret_id" => config.secret_id = TriState::from_wire(&path, field)?,
                "allocation_id" => config.allocation_id = TriState::from_wire(&path, field)?,
                "task_name" => config.task_name = TriState::from_wire(&path, field)?,
                _ => {
                    return Err(TransportError::decode(path, "unrecognized attribute"));
                }
            }
        }
        Ok(config)
    }

    pub fn to_wire(&self) -> WireValue {
        WireValue::object([
            ("host".to_string(), self.host.to_wire()),
            ("secret_id".to_string(), self.secret_id.to_wire()),
            ("allocation_id".to_string(), self.allocation_id.to_wire()),
            ("task_name".to_string(), self.task_name.to_wire()),
        ])
    }

    pub fn apply_defaults(&mut self, src: &NomadConfig) {
        self.host.merge_default(&src.host);
        self.secret_id.merge_default(&src.secret_id);
        self.allocation_id.merge_default(&src.allocation_id);
        self.task_name.merge_default(&src.task_name);
        if self.factory.is_none() {
            self.factory = src.factory.clone();
        }
    }

    /// Structural validation: host, allocation and task must be known;
    /// `secret_id` is optional.
    pub fn validate(&self) -> Result<()> {
        if !self.host.is_known() {
            return Err(TransportError::validation("nomad.host", "must be a known value"));
        }
        if !self.allocation_id.is_known() {
            return Err(TransportError::validation(
                "nomad.allocation_id",
                "must be a known value",
            ));
        }
        if !self.task_name.is_known() {
            return Err(TransportError::validation(
                "nomad.task_name",
                "must be a known value",
            ));
        }
        Ok(())
    }

    pub fn resolved_settings(&self) -> Result<NomadSettings> {
        self.validate()?;
        Ok(NomadSettings {
            host: self.host.cloned().unwrap_or_default(),
            secret_id: self.secret_id.cloned(),
            allocation_id: self.allocation_id.cloned().unwrap_or_default(),
            task_name: self.task_name.cloned().unwrap_or_default(),
        })
    }

    /// Build (once) and return the Nomad transport client.
    pub async fn client(&self) -> Result<Arc<dyn Transport>> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let factory = self
                    .factory
                    .as_ref()
                    .ok_or(TransportError::NoClientFactory(TransportKind::Nomad))?;
                let settings = self.resolved_settings()?;
                let detail = format!(
                    "host={}, allocation={}, task={}",
                    settings.host, settings.allocation_id, settings.task_name
                );
                debug!(
                    host = %settings.host,
                    allocation = %settings.allocation_id,
                    task = %settings.task_name,
                    "building nomad transport client"
                );
                (factory)(settings).await.map_err(|source| TransportError::ClientBuild {
                    kind: TransportKind::Nomad,
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
                "host" => &self.host,
                "secret_id" => &self.secret_id,
                "allocation_id" => &self.allocation_id,
                _ => &self.task_name,
            };
            view.insert(attr.name.to_string(), render_attr(value, attr.sensitive));
        }
        view
    }
}

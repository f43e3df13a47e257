//! SSH transport configuration

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

const ATTRS: [AttrSpec; 6] = [
    AttrSpec::required("user"),
    AttrSpec::required("host"),
    AttrSpec::sensitive("private_key"),
    AttrSpec::optional("private_key_path"),
    AttrSpec::sensitive("passphrase"),
    AttrSpec::optional("passphrase_path"),
];

/// Fully-resolved SSH connection settings handed to the client factory.
///
/// When a `_path` variant is set it overrides the corresponding inline
/// value, so at most one of each pair survives resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SshSettings {
    pub user: String,
    pub host: String,
    pub private_key: Option<String>,
    pub private_key_path: Option<String>,
    pub passphrase: Option<String>,
    pub passphrase_path: Option<String>,
}

/// SSH transport configuration block.
pub struct SshConfig {
    pub user: TriState<String>,
    pub host: TriState<String>,
    pub private_key: TriState<String>,
    pub private_key_path: TriState<String>,
    pub passphrase: TriState<String>,
    pub passphrase_path: TriState<String>,
    factory: Option<ClientFactory<SshSettings>>,
    client: OnceCell<Arc<dyn Transport>>,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: TriState::Null,
            host: TriState::Null,
            private_key: TriState::Null,
            private_key_path: TriState::Null,
            passphrase: TriState::Null,
            passphrase_path: TriState::Null,
            factory: None,
            client: OnceCell::new(),
        }
    }
}

impl Clone for SshConfig {
    /// Deep copy with an empty client cache. The factory is shared; the
    /// memoized client is not, so a copy builds its own client on first use.
    fn clone(&self) -> Self {
        Self {
            user: self.user.clone(),
            host: self.host.clone(),
            private_key: self.private_key.clone(),
            private_key_path: self.private_key_path.clone(),
            passphrase: self.passphrase.clone(),
            passphrase_path: self.passphrase_path.clone(),
            factory: self.factory.clone(),
            client: OnceCell::new(),
        }
    }
}

impl fmt::Debug for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.debug_view()).finish()
    }
}

impl SshConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute declarations for the schema-registration layer.
    pub fn schema() -> &'static [AttrSpec] {
        &ATTRS
    }

    /// Inject the client factory. Replacing the factory does not clear an
    /// already-memoized client.
    pub fn set_factory(&mut self, factory: ClientFactory<SshSettings>) {
        self.factory = Some(factory);
    }

    pub fn with_factory(mut self, factory: ClientFactory<SshSettings>) -> Self {
        self.set_factory(factory);
        self
    }

    /// Decode from the wire sub-object, fully replacing attribute state.
    /// The factory and client cache are not part of the wire shape.
    pub fn from_wire(value: &WireValue) -> Result<Self> {
        let WireValue::Object(fields) = value else {
            return Err(TransportError::decode(
                "ssh",
                format!("expected object, got {}", value.type_name()),
            ));
        };

        let mut config = Self::new();
        for (key, field) in fields {
            let path = format!("ssh.{key}");
            match key.as_str() {
                "user" => config.user = TriState::from_wire(&path, field)?,
                "host" => config.host = TriState::from_wire(&path, field)?,
                "private_key" => config.private_key = TriState::from_wire(&path, field)?,
                "private_key_path" => config.private_key_path = TriState::from_wire(&path, field)?,
                "passphrase" => config.passphrase = TriState::from_wire(&path, field)?,
                "passphrase_path" => config.passphrase_path = TriState::from_wire(&path, field)?,
                _ => {
                    return Err(TransportError::decode(path, "unrecognized attribute"));
                }
            }
        }
        Ok(config)
    }

    /// Encode the fixed-shape attribute object.
    pub fn to_wire(&self) -> WireValue {
        WireValue::object([
            ("user".to_string(), self.user.to_wire()),
            ("host".to_string(), self.host.to_wire()),
            ("private_key".to_string(), self.private_key.to_wire()),
            ("private_key_path".to_string(), self.private_key_path.to_wire()),
            ("passphrase".to_string(), self.passphrase.to_wire()),
            ("passphrase_path".to_string(), self.passphrase_path.to_wire()),
        ])
    }

    /// Fill absent attributes from a provider-level defaults source,
    /// attribute by attribute. Known values are never overwritten.
    pub fn apply_defaults(&mut self, src: &SshConfig) {
        self.user.merge_default(&src.user);
        self.host.merge_default(&src.host);
        self.private_key.merge_default(&src.private_key);
        self.private_key_path.merge_default(&src.private_key_path);
        self.passphrase.merge_default(&src.passphrase);
        self.passphrase_path.merge_default(&src.passphrase_path);
        if self.factory.is_none() {
            self.factory = src.factory.clone();
        }
    }

    /// Structural validation for the SSH kind: host and user must be known,
    /// and at least one private-key source must be resolvable.
    pub fn validate(&self) -> Result<()> {
        if !self.host.is_known() {
            return Err(TransportError::validation("ssh.host", "must be a known value"));
        }
        if !self.user.is_known() {
            return Err(TransportError::validation("ssh.user", "must be a known value"));
        }
        if !self.private_key.is_known() && !self.private_key_path.is_known() {
            return Err(TransportError::validation(
                "ssh.private_key",
                "either private_key or private_key_path must be set",
            ));
        }
        Ok(())
    }

    /// Resolve the settings handed to the client factory. A set `_path`
    /// variant overrides the corresponding inline value.
    pub fn resolved_settings(&self) -> Result<SshSettings> {
        self.validate()?;

        let mut private_key = self.private_key.cloned();
        let private_key_path = self.private_key_path.cloned();
        if private_key_path.is_some() {
            private_key = None;
        }

        let mut passphrase = self.passphrase.cloned();
        let passphrase_path = self.passphrase_path.cloned();
        if passphrase_path.is_some() {
            passphrase = None;
        }

        Ok(SshSettings {
            // validate() established both as known
            user: self.user.cloned().unwrap_or_default(),
            host: self.host.cloned().unwrap_or_default(),
            private_key,
            private_key_path,
            passphrase,
            passphrase_path,
        })
    }

    /// Build (once) and return the SSH transport client. The first call
    /// invokes the factory; later calls return the memoized client even if
    /// attributes were mutated in between.
    pub async fn client(&self) -> Result<Arc<dyn Transport>> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let factory = self
                    .factory
                    .as_ref()
                    .ok_or(TransportError::NoClientFactory(TransportKind::Ssh))?;
                let settings = self.resolved_settings()?;
                let detail = format!("host={}, user={}", settings.host, settings.user);
                debug!(host = %settings.host, user = %settings.user, "building ssh transport client");
                (factory)(settings).await.map_err(|source| TransportError::ClientBuild {
                    kind: TransportKind::Ssh,
                    detail,
                    source,
                })
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Attribute name/value pairs for diagnostics, with secrets redacted.
    pub fn debug_view(&self) -> BTreeMap<String, String> {
        let mut view = BTreeMap::new();
        for attr in &ATTRS {
            let value = match attr.name {
                "user" => &self.user,
                "host" => &self.host,
                "private_key" => &self.private_key,
                "private_key_path" => &self.private_key_path,
                "passphrase" => &self.passphrase,
                _ => &self.passphrase_path,
            };
            view.insert(attr.name.to_string(), render_attr(value, attr.sensitive));
        }
        view
    }
}

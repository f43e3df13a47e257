//! Failure diagnostics rendering
//!
//! When a remote operation fails, the user-facing error carries the resolved
//! transport's redacted attribute view and, when configured, the directory
//! where failure artifacts were collected.

use crate::config::ProviderConfig;
use gangway_transport::EmbeddedTransport;
use std::path::PathBuf;

/// The block appended to a resource failure diagnostic.
pub fn failure_diagnostics(resource: &str, transport: &EmbeddedTransport) -> String {
    let mut out = format!("resource: {resource}\n");
    out.push_str(&transport.diagnostics());
    out
}

/// Directory for a resource's failure artifacts under the provider's debug
/// root, if one is configured.
pub fn artifact_dir(config: &ProviderConfig, resource: &str) -> Option<PathBuf> {
    config.debug_data_root().map(|root| root.join(resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gangway_transport::{EmbeddedTransport, SshConfig, TriState};

    fn ssh_transport() -> EmbeddedTransport {
        let mut config = SshConfig::new();
        config.host.set("h1".to_string());
        config.user.set("admin".to_string());
        config.private_key.set("PKEY".to_string());
        let mut transport = EmbeddedTransport::new();
        transport.set_ssh(config);
        transport
    }

    #[test]
    fn test_failure_diagnostics_names_resource_and_redacts() {
        let block = failure_diagnostics("vault_init.this", &ssh_transport());
        assert!(block.starts_with("resource: vault_init.this\n"));
        assert!(block.contains("ssh transport configuration:"));
        assert!(block.contains("host: h1"));
        assert!(!block.contains("PKEY"));
    }

    #[test]
    fn test_failure_diagnostics_with_unresolved_transport() {
        let block = failure_diagnostics("file.copy", &EmbeddedTransport::new());
        assert!(block.contains("transport configuration: unresolved"));
    }

    #[test]
    fn test_artifact_dir_requires_configured_root() {
        let mut config = ProviderConfig::new();
        assert_eq!(artifact_dir(&config, "file.copy"), None);

        config.debug_data_root_dir = TriState::Known("/tmp/debug".to_string());
        assert_eq!(
            artifact_dir(&config, "file.copy").unwrap(),
            PathBuf::from("/tmp/debug/file.copy")
        );

        // Round-trip through wire keeps the root usable.
        let round = ProviderConfig::from_wire(&config.to_wire()).unwrap();
        assert_eq!(
            artifact_dir(&round, "file.copy").unwrap(),
            PathBuf::from("/tmp/debug/file.copy")
        );
    }
}

//! Transport capability traits
//!
//! The embedded transport core never speaks a remote wire protocol itself.
//! It selects which concrete transport to construct, builds it at most once
//! through an injected factory, and hands the rest of the system this
//! opaque capability.

use crate::error::Result;
use crate::kind::TransportKind;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// Output of a remote command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// An open session on a remote target.
#[async_trait]
pub trait Session: Send {
    /// Run a command and collect its output.
    async fn execute(&mut self, cmd: &str) -> Result<ExecOutput>;

    /// Copy a stream to a file on the remote target.
    async fn copy(
        &mut self,
        source: &mut (dyn AsyncRead + Send + Unpin),
        dest_path: &str,
    ) -> Result<()>;

    /// Tear the session down.
    async fn close(&mut self) -> Result<()>;
}

/// A connected remote-access mechanism.
///
/// Concrete implementations (the actual SSH, Kubernetes exec, and Nomad exec
/// clients) live outside this crate and enter through the per-kind client
/// factories.
#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    /// Which mechanism this client speaks.
    fn kind(&self) -> TransportKind;

    /// Open a session on the remote target. Cancellation is the caller's
    /// future being dropped; no additional scope is layered on.
    async fn open(&self) -> Result<Box<dyn Session>>;
}

/// Async factory turning resolved settings into a connected client.
///
/// Invoked at most once per config instance; the result is memoized.
pub type ClientFactory<S> =
    Arc<dyn Fn(S) -> BoxFuture<'static, anyhow::Result<Arc<dyn Transport>>> + Send + Sync>;

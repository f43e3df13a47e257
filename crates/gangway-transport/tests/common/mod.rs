use async_trait::async_trait;
use gangway_transport::{
    ClientFactory, ExecOutput, KubernetesSettings, NomadSettings, Session, SshSettings, Transport,
    TransportKind,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::AsyncRead;

/// In-memory stand-in for a concrete transport implementation.
#[derive(Debug)]
pub struct MockTransport {
    kind: TransportKind,
}

pub struct MockSession;

#[async_trait]
impl Session for MockSession {
    async fn execute(&mut self, cmd: &str) -> gangway_transport::Result<ExecOutput> {
        Ok(ExecOutput {
            stdout: format!("ran: {cmd}"),
            stderr: String::new(),
            exit_code: 0,
        })
    }

    async fn copy(
        &mut self,
        _source: &mut (dyn AsyncRead + Send + Unpin),
        _dest_path: &str,
    ) -> gangway_transport::Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> gangway_transport::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn open(&self) -> gangway_transport::Result<Box<dyn Session>> {
        Ok(Box::new(MockSession))
    }
}

/// SSH factory that counts invocations.
#[allow(dead_code)]
pub fn counting_ssh_factory(calls: Arc<AtomicUsize>) -> ClientFactory<SshSettings> {
    Arc::new(move |_settings| {
        let calls = Arc::clone(&calls);
        Box::pin(async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MockTransport {
                kind: TransportKind::Ssh,
            }) as Arc<dyn Transport>)
        })
    })
}

/// Kubernetes factory that records the settings it was handed.
#[allow(dead_code)]
pub fn recording_kubernetes_factory(
    seen: Arc<std::sync::Mutex<Option<KubernetesSettings>>>,
) -> ClientFactory<KubernetesSettings> {
    Arc::new(move |settings| {
        let seen = Arc::clone(&seen);
        Box::pin(async move {
            *seen.lock().unwrap() = Some(settings);
            Ok(Arc::new(MockTransport {
                kind: TransportKind::Kubernetes,
            }) as Arc<dyn Transport>)
        })
    })
}

/// Nomad factory that always fails, for error-wrapping tests.
#[allow(dead_code)]
pub fn failing_nomad_factory() -> ClientFactory<NomadSettings> {
    Arc::new(|_settings| {
        Box::pin(async move { Err(anyhow::anyhow!("connection refused")) })
    })
}

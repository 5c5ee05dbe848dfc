//! Shared test harness for integration tests.
//!
//! Builds an [`AppContext`] over a temp directory of fixture files and
//! starts Axum on a random port for HTTP-level testing with `reqwest`.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use roomcast::error::{Error, Result};
use roomcast::library::VideoEntry;
use roomcast::metadata::{ProbeOutput, Prober};
use roomcast::server::{create_router, AppContext};
use tempfile::TempDir;

/// Prober stub returning fixed numbers; counts invocations.
pub struct StubProber {
    calls: AtomicUsize,
    fail: bool,
}

impl StubProber {
    pub fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Prober for StubProber {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn extract(&self, _path: &Path) -> Result<ProbeOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::probe("stub failure"));
        }
        Ok(ProbeOutput {
            width: 1920,
            height: 1080,
            fps: 25.0,
            frame_count: 250,
        })
    }
}

/// Test harness owning the fixture directory and app context.
pub struct TestHarness {
    pub ctx: AppContext,
    pub prober: Arc<StubProber>,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a harness serving the given (filename, contents) fixtures.
    pub fn new(files: &[(&str, &[u8])]) -> Self {
        Self::with_prober(files, Arc::new(StubProber::ok()))
    }

    pub fn with_prober(files: &[(&str, &[u8])], prober: Arc<StubProber>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut entries = Vec::new();
        for (name, contents) in files {
            let path = dir.path().join(name);
            std::fs::write(&path, contents).expect("failed to write fixture");
            entries.push(VideoEntry {
                filename: name.to_string(),
                path,
            });
        }

        let ctx = AppContext::new(prober.clone(), "127.0.0.1".to_string());
        ctx.initialize(entries);

        Self { ctx, prober, dir }
    }

    /// Start Axum on a random port and return the harness with the address.
    pub async fn with_server(files: &[(&str, &[u8])]) -> (Self, SocketAddr) {
        let harness = Self::new(files);
        let addr = harness.spawn().await;
        (harness, addr)
    }

    pub async fn with_server_prober(
        files: &[(&str, &[u8])],
        prober: Arc<StubProber>,
    ) -> (Self, SocketAddr) {
        let harness = Self::with_prober(files, prober);
        let addr = harness.spawn().await;
        (harness, addr)
    }

    pub async fn spawn(&self) -> SocketAddr {
        let app = create_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }
}

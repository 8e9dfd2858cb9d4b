use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

/// Secret shared between the spawned server and tokens minted by tests.
pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_STORAGE_SECRET: &str = "integration-storage-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick unused ports for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let storage_port = spawn_storage_stub()?;
        let storage_url = format!("http://127.0.0.1:{}", storage_port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/referral-api");
        cmd.env("PORT", port.to_string())
            .env("JWT_SECRET", TEST_JWT_SECRET)
            .env("STORAGE_ENDPOINT", &storage_url)
            .env("STORAGE_PUBLIC_URL", &storage_url)
            .env("STORAGE_SECRET", TEST_STORAGE_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // The tests exercise database-backed flows, so only a
                // healthy database counts as ready
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

/// Minimal stand-in for the object-storage gateway: accepts every upload.
///
/// Runs on its own thread and runtime so it outlives the per-test runtimes
/// that share the one spawned server.
fn spawn_storage_stub() -> Result<u16> {
    use axum::{http::StatusCode, routing::put, Router};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").context("failed to bind stub")?;
    let port = listener.local_addr()?.port();
    listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("stub runtime");
        rt.block_on(async move {
            let app = Router::new().route("/:bucket/:key", put(|| async { StatusCode::OK }));
            let listener = tokio::net::TcpListener::from_std(listener).expect("stub listener");
            let _ = axum::serve(listener, app).await;
        });
    });

    Ok(port)
}

/// The spawned server, or `None` (and a note on stderr) when the environment
/// has no database to run against.
pub async fn server_if_configured() -> Result<Option<&'static TestServer>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skipping integration test: DATABASE_URL is not set");
        return Ok(None);
    }

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    match server.wait_ready(Duration::from_secs(15)).await {
        Ok(()) => Ok(Some(server)),
        Err(e) => {
            eprintln!("skipping integration test: {}", e);
            Ok(None)
        }
    }
}

/// Mint a token the way the server would, for identities the test controls.
pub fn issue_token(user_id: &str, is_admin: bool) -> String {
    referral_api::auth::TokenManager::new(TEST_JWT_SECRET, 1)
        .issue(user_id, is_admin)
        .expect("failed to issue test token")
}

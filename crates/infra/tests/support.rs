#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex, OnceLock};

use badgekit_domain::{ClientConfig, Location};
use badgekit_infra::BadgeKitClient;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use wiremock::{MockServer, Request};

pub const TEST_SECRET: &str = "s3cr3tz";

/// Client configuration pointing at a mock server.
pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri(), TEST_SECRET)
}

/// Run `f` with a fresh client for `config` on the blocking pool.
///
/// The blocking reqwest client must be created and dropped outside the async
/// runtime, so the whole client lifetime stays inside the closure.
pub async fn with_client<T, F>(config: ClientConfig, f: F) -> T
where
    F: FnOnce(&BadgeKitClient) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = BadgeKitClient::new(config).expect("client should build");
        f(&client)
    })
    .await
    .expect("blocking task panicked")
}

/// Convenience for the common "default client against this server" case.
pub async fn with_default_client<T, F>(server: &MockServer, f: F) -> T
where
    F: FnOnce(&BadgeKitClient) -> T + Send + 'static,
    T: Send + 'static,
{
    with_client(config_for(server), f).await
}

pub fn system(slug: &str) -> Location {
    Location::new().system(slug)
}

/// Extract and verify the JWT carried by a recorded request.
///
/// Expiry is checked by the verifier, so stale tokens fail here too.
pub fn verified_claims(request: &Request) -> Map<String, Value> {
    let header = request
        .headers
        .get("authorization")
        .expect("request should carry an Authorization header")
        .to_str()
        .expect("Authorization header should be ASCII");
    let token = header
        .strip_prefix("JWT token=\"")
        .and_then(|rest| rest.strip_suffix('"'))
        .expect("Authorization header should have the JWT token=\"...\" shape");

    decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .expect("token should verify with the shared secret")
    .claims
}

/// Handle for inspecting captured log output during tests.
#[derive(Clone)]
pub struct LogHandle {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogHandle {
    /// Everything logged so far, by any test in this binary.
    pub fn output(&self) -> String {
        let guard = self.buffer.lock().expect("log mutex poisoned");
        String::from_utf8_lossy(&guard).into_owned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.output().contains(needle)
    }
}

struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().expect("log mutex poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

static LOGS: OnceLock<LogHandle> = OnceLock::new();

/// Install a capturing tracing subscriber (idempotent) and obtain a handle
/// for reading what was logged.
pub fn init_test_logger() -> LogHandle {
    LOGS.get_or_init(|| {
        let handle = LogHandle { buffer: Arc::new(Mutex::new(Vec::new())) };
        let buffer = Arc::clone(&handle.buffer);

        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || CaptureWriter { buffer: Arc::clone(&buffer) })
            .try_init();

        handle
    })
    .clone()
}

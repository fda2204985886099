use std::time::Duration;
use anyhow::Result;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use crate::error::SetupError;

/// Fetches the raw bytes behind a URL.
///
/// Implementations must fail on non-2xx responses and on timeouts, the
/// mirror loop treats both like any other connection failure.
pub trait Transport {
    fn get(&self, url: &str, user_agent: &str, timeout: Duration) -> Result<Vec<u8>>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, user_agent: &str, timeout: Duration) -> Result<Vec<u8>> {
        let resp = self.client
            .get(url)
            .header("User-Agent", user_agent)
            .timeout(timeout)
            .send()?
            .error_for_status()?;
        Ok(resp.bytes()?.to_vec())
    }
}

/// Retrieves files from an ordered list of mirror base URLs.
///
/// Mirrors are tried one after another, the first success wins. There is no
/// backoff and nothing is cached between calls.
pub struct MirrorFetcher<T: Transport> {
    transport: T,
    mirrors: Vec<String>,
    user_agent: String,
}

impl<T: Transport> MirrorFetcher<T> {
    pub fn new(transport: T, mirrors: Vec<String>, user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            mirrors,
            user_agent: user_agent.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `<mirror>/<filename>` from the first mirror that answers.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::AllMirrorsFailed`] once every mirror has failed.
    pub fn fetch(&self, filename: &str, timeout: Duration) -> Result<Vec<u8>, SetupError> {
        for mirror in &self.mirrors {
            let url = mirror_url(mirror, filename);
            info!("Trying {}", url);
            match self.transport.get(&url, &self.user_agent, timeout) {
                Ok(bytes) => {
                    debug!("Fetched {} bytes from {}", bytes.len(), mirror);
                    return Ok(bytes);
                }
                Err(e) => warn!("  {:#}", e),
            }
        }
        Err(SetupError::AllMirrorsFailed {
            filename: filename.to_string(),
        })
    }
}

fn mirror_url(mirror: &str, filename: &str) -> String {
    format!("{}/{}", mirror.trim_end_matches('/'), filename)
}

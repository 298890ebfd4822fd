use crate::error::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const DEFAULT_USER_AGENT: &str =
    "Pagemirror/0.2 (https://github.com/trapdoorsec/pagemirror)";
const TOR_SOCKS_PROXY: &str = "socks5h://127.0.0.1:9050";

/// Explicit transport configuration, passed in at construction instead of
/// living in process-wide state. One client built from it is shared by the
/// page fetch and every asset fetch of a run.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout_secs: u64,
    /// Route all traffic through the local Tor SOCKS proxy.
    pub use_tor: bool,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            use_tor: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            ..Self::default()
        }
    }

    pub fn with_tor(mut self, use_tor: bool) -> Self {
        self.use_tor = use_tor;
        self
    }
}

/// Build the shared HTTP client from a transport configuration.
pub fn build_client(config: &TransportConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs((config.timeout_secs / 2).max(1)))
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(5));

    if config.use_tor {
        debug!("Routing traffic through {}", TOR_SOCKS_PROXY);
        builder = builder.proxy(reqwest::Proxy::all(TOR_SOCKS_PROXY)?);
    }

    Ok(builder.build()?)
}

/// Fetch a page and decode it as UTF-8, lossily. The forced decoding matches
/// the mirroring contract: the persisted document is always valid UTF-8 even
/// when the origin lies about its encoding.
pub async fn fetch_page_text(client: &Client, url: &str) -> Result<String> {
    debug!("Fetching page {}", url);
    let response = client.get(url).send().await?;
    let bytes = response.bytes().await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Fetch raw bytes for an asset. HTTP error statuses still carry a body and
/// are returned as-is; only transport-level failures error.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    debug!("Fetching asset {}", url);
    let response = client.get(url).send().await?;
    Ok(response.bytes().await?.to_vec())
}

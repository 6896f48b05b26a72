// ABOUTME: Discovery settings and the fluent builder that turns them into a Client.
// ABOUTME: Timeout, user agent, private-network policy, extra headers and site concurrency.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;
use crate::error::DiscoverError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_CONCURRENT_SITES: usize = 16;

/// Settings shared by every request a [`Client`] makes.
#[derive(Debug, Clone)]
pub struct Options {
    /// Applies to each request separately, not to a whole site.
    pub timeout: Duration,
    pub user_agent: String,
    /// Off by default; local setups and tests opt in.
    pub allow_private_networks: bool,
    /// Replaces the internally built reqwest client when set.
    pub http_client: Option<reqwest::Client>,
    /// Sent with every request, after the built-in Accept header.
    pub headers: HashMap<String, String>,
    pub max_concurrent_sites: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("minitools-discover/", env!("CARGO_PKG_VERSION")).to_string(),
            allow_private_networks: false,
            http_client: None,
            headers: HashMap::new(),
            max_concurrent_sites: DEFAULT_MAX_CONCURRENT_SITES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Bring your own reqwest client; redirect and private-network guards are then its job.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(name.into(), value.into());
        self
    }

    /// Sites fetched in parallel by `process_sites`; clamped to at least 1.
    pub fn max_concurrent_sites(mut self, max: usize) -> Self {
        self.opts.max_concurrent_sites = max.max(1);
        self
    }

    pub fn build(self) -> Result<Client, DiscoverError> {
        Client::new(self.opts)
    }
}

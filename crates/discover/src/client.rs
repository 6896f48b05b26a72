// ABOUTME: The discovery Client that finds RSS/Atom feeds for web sites.
// ABOUTME: Fetches pages, extracts feed hints and probes every candidate concurrently.

use std::net::ToSocketAddrs;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use minitools_feed::{find_feeds_in_html, normalize_url, probe_feed, validate_urls};
use minitools_feed::{DiscoveredFeed, SiteFeeds};
use tracing::{debug, info};

use crate::error::DiscoverError;
use crate::options::{ClientBuilder, Options};
use crate::resource::{fetch, is_private_ip, FetchOptions, FetchResult};

/// Accept header sent when probing a candidate feed.
pub const FEED_ACCEPT: &str = "application/rss+xml, application/atom+xml, application/xml, text/xml, */*";
/// Accept header sent when loading a site's page.
pub const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// The feed discovery client.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, DiscoverError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => build_http_client(&opts)?,
        };
        Ok(Self { opts, http_client })
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    async fn get(&self, url: &str, op: &str, accept: &str) -> Result<FetchResult, DiscoverError> {
        let mut headers = self.opts.headers.clone();
        headers
            .entry("Accept".to_string())
            .or_insert_with(|| accept.to_string());
        let fetch_opts = FetchOptions {
            headers,
            allow_private_networks: self.opts.allow_private_networks,
            accept_non_success: false,
        };
        fetch(&self.http_client, url, op, &fetch_opts).await
    }

    /// Returns the feed at `url` when it is an RSS or Atom document.
    ///
    /// Any failure (network, non-2xx, not a feed) is logged and yields None.
    pub async fn check_feed(&self, url: &str) -> Option<DiscoveredFeed> {
        let response = match self.get(url, "CheckFeed", FEED_ACCEPT).await {
            Ok(response) => response,
            Err(err) => {
                debug!(%url, error = %err, "feed candidate unreachable");
                return None;
            }
        };
        match probe_feed(response.text().as_bytes(), url) {
            Ok(feed) => Some(feed),
            Err(err) => {
                debug!(%url, error = %err, "candidate is not a feed");
                None
            }
        }
    }

    /// Finds every feed of one site.
    ///
    /// The page is loaded, feed hints are collected from it, and all candidates
    /// are checked concurrently. Valid feeds keep candidate order. A page that
    /// cannot be loaded yields the site with no feeds.
    pub async fn process_site(&self, url: &str) -> SiteFeeds {
        let site_url = normalize_url(url);
        let page = match self.get(&site_url, "ProcessSite", HTML_ACCEPT).await {
            Ok(page) => page,
            Err(err) => {
                debug!(site = %site_url, error = %err, "site page unavailable");
                return SiteFeeds::empty(site_url);
            }
        };

        let candidates = find_feeds_in_html(&site_url, &page.text());
        let checks = candidates.iter().map(|candidate| self.check_feed(candidate));
        let feeds: Vec<DiscoveredFeed> = join_all(checks).await.into_iter().flatten().collect();

        info!(site = %site_url, candidates = candidates.len(), feeds = feeds.len(), "site processed");
        SiteFeeds { site_url, feeds }
    }

    /// Processes many sites concurrently, bounded by `max_concurrent_sites`.
    /// Results are returned in input order.
    pub async fn process_sites(&self, urls: &[String]) -> Vec<SiteFeeds> {
        stream::iter(urls.iter().map(|url| self.process_site(url)))
            .buffered(self.opts.max_concurrent_sites.max(1))
            .collect()
            .await
    }

    /// Validates a newline-separated URL list and discovers feeds for each site.
    pub async fn discover_text(&self, text: &str) -> Result<Vec<SiteFeeds>, DiscoverError> {
        let urls = validate_urls(text);
        if urls.is_empty() {
            return Err(DiscoverError::invalid_url(
                "",
                "Discover",
                Some(anyhow::anyhow!("no valid URL found")),
            ));
        }
        Ok(self.process_sites(&urls).await)
    }
}

/// Builds the reqwest client, refusing redirects into private networks unless allowed.
fn build_http_client(opts: &Options) -> Result<reqwest::Client, DiscoverError> {
    let allow_private = opts.allow_private_networks;
    let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > 10 {
            return attempt.error("too many redirects");
        }
        if !allow_private {
            if let Some(host) = attempt.url().host_str() {
                let bare = host.trim_start_matches('[').trim_end_matches(']');
                if let Ok(ip) = bare.parse::<std::net::IpAddr>() {
                    if is_private_ip(&ip) {
                        return attempt.error("redirect to private IP blocked");
                    }
                } else {
                    let port = attempt.url().port_or_known_default().unwrap_or(80);
                    // Redirect policies are synchronous, so resolve with std.
                    match (bare, port).to_socket_addrs() {
                        Ok(mut addrs) => {
                            if addrs.any(|sa| is_private_ip(&sa.ip())) {
                                return attempt.error("redirect to private IP blocked");
                            }
                        }
                        Err(_) => return attempt.error("DNS lookup failed during redirect"),
                    }
                }
            }
        }
        attempt.follow()
    });

    reqwest::Client::builder()
        .redirect(redirect_policy)
        .user_agent(&opts.user_agent)
        .timeout(opts.timeout)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| DiscoverError::client(e.into()))
}

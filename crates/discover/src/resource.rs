// ABOUTME: Guarded HTTP fetching for discovery requests.
// ABOUTME: Enforces http(s) schemes, private-network refusal, a body size cap and charset-aware decoding.

use std::collections::HashMap;
use std::net::IpAddr;

use bytes::Bytes;
use ipnet::IpNet;
use once_cell::sync::Lazy;
use url::Url;

use crate::error::DiscoverError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Loopback, RFC 1918, link-local and IPv6 unique-local ranges.
static PRIVATE_RANGES: Lazy<Vec<IpNet>> = Lazy::new(|| {
    [
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "::1/128",
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .map(|s| s.parse().unwrap())
    .collect()
});

/// Options for fetching a resource.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
    /// Return non-2xx responses instead of failing with a Status error.
    pub accept_non_success: bool,
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as UTF-8 text, using charset hints from the content-type header.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check if an IP address is in a private/reserved range.
pub fn is_private_ip(addr: &IpAddr) -> bool {
    PRIVATE_RANGES.iter().any(|net| net.contains(addr))
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    lower.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|c| c.trim_matches('"').trim_matches('\'').to_string())
    })
}

/// Fails with an SSRF error when `target` names or resolves to a private address.
async fn ensure_public_host(target: &Url, url: &str, op: &str) -> Result<(), DiscoverError> {
    let Some(host) = target.host_str() else {
        return Ok(());
    };
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    let blocked = || {
        DiscoverError::ssrf(
            url,
            op,
            Some(anyhow::anyhow!("private IP addresses are not allowed")),
        )
    };

    if let Ok(ip) = bare.parse::<IpAddr>() {
        return if is_private_ip(&ip) { Err(blocked()) } else { Ok(()) };
    }

    let port = target.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((bare, port)).await.map_err(|e| {
        DiscoverError::fetch(url, op, Some(anyhow::anyhow!("DNS lookup failed: {}", e)))
    })?;
    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(blocked());
        }
    }
    Ok(())
}

fn request_error(url: &str, op: &str, err: reqwest::Error) -> DiscoverError {
    if err.is_timeout() {
        DiscoverError::timeout(url, op, Some(err.into()))
    } else {
        DiscoverError::fetch(url, op, Some(anyhow::anyhow!("request failed: {}", err)))
    }
}

/// Fetch a resource from the given URL.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    op: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, DiscoverError> {
    if url.is_empty() {
        return Err(DiscoverError::invalid_url(url, op, None));
    }

    let parsed_url = Url::parse(url).map_err(|e| {
        DiscoverError::invalid_url(url, op, Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(DiscoverError::invalid_url(
            url,
            op,
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        ensure_public_host(&parsed_url, url, op).await?;
    }

    let mut request = client.get(parsed_url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request.send().await.map_err(|e| request_error(url, op, e))?;

    // Redirects are checked by the client's policy; this covers the landing host.
    if !opts.allow_private_networks {
        ensure_public_host(response.url(), url, op).await?;
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(DiscoverError::fetch(
                url,
                op,
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| request_error(url, op, e))?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(DiscoverError::fetch(
            url,
            op,
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    let result = FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    };
    if !result.is_success() && !opts.accept_non_success {
        return Err(DiscoverError::status(url, op, status));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn private_ranges_all_parse() {
        assert_eq!(PRIVATE_RANGES.len(), 8);
    }

    fn create_test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent("test-agent")
            .build()
            .unwrap()
    }

    fn local_opts() -> FetchOptions {
        FetchOptions {
            allow_private_networks: true,
            ..Default::default()
        }
    }

    #[test]
    fn private_ranges() {
        assert!(is_private_ip(&"127.0.0.1".parse().unwrap()));
        assert!(is_private_ip(&"192.168.1.20".parse().unwrap()));
        assert!(is_private_ip(&"::1".parse().unwrap()));
        assert!(is_private_ip(&"fd00::1".parse().unwrap()));
        assert!(!is_private_ip(&"93.184.216.34".parse().unwrap()));
    }

    #[test]
    fn charset_from_content_type() {
        assert_eq!(
            extract_charset("text/html; Charset=\"ISO-8859-1\""),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[tokio::test]
    async fn fetch_ok_decodes_latin1() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/latin");
            then.status(200)
                .header("content-type", "text/plain; charset=iso-8859-1")
                .body(vec![0x63, 0x61, 0x66, 0xe9]);
        });

        let result = fetch(&create_test_client(), &server.url("/latin"), "Fetch", &local_opts())
            .await
            .expect("fetch should succeed");
        mock.assert();
        assert_eq!(result.status, 200);
        assert_eq!(result.text(), "café");
    }

    #[tokio::test]
    async fn fetch_non_success_is_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let err = fetch(&create_test_client(), &server.url("/missing"), "Fetch", &local_opts())
            .await
            .expect_err("should fail on 404");
        assert!(err.is_status());
    }

    #[tokio::test]
    async fn fetch_non_success_can_be_accepted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });
        let opts = FetchOptions {
            accept_non_success: true,
            ..local_opts()
        };

        let result = fetch(&create_test_client(), &server.url("/missing"), "Fetch", &opts)
            .await
            .expect("non-success accepted");
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn fetch_blocks_loopback_by_default() {
        let server = MockServer::start();
        let err = fetch(&create_test_client(), &server.url("/"), "Fetch", &FetchOptions::default())
            .await
            .expect_err("loopback must be refused");
        assert!(err.is_ssrf());
    }

    #[tokio::test]
    async fn fetch_rejects_other_schemes() {
        let err = fetch(&create_test_client(), "ftp://example.com/feed", "Fetch", &local_opts())
            .await
            .expect_err("ftp is not fetched");
        assert!(err.is_invalid_url());
    }

    #[tokio::test]
    async fn fetch_sends_custom_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/h").header("accept", "text/xml");
            then.status(200).body("<ok/>");
        });
        let mut opts = local_opts();
        opts.headers.insert("Accept".into(), "text/xml".into());

        fetch(&create_test_client(), &server.url("/h"), "Fetch", &opts)
            .await
            .expect("header matched");
        mock.assert();
    }
}

// ABOUTME: URL normalization and validation for user-supplied site lists.
// ABOUTME: Prefixes missing schemes and keeps only plausible http(s) URLs.

use std::net::IpAddr;
use tracing::warn;
use url::Url;

/// Trims `raw` and prefixes `https://` when it lacks an http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Splits `text` into lines and returns the ones that are usable site URLs,
/// normalized, in input order.
///
/// A line is kept when it parses as an absolute http(s) URL whose host looks
/// like a real web host: it contains a dot, is `localhost`, or is an IP literal.
pub fn validate_urls(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let candidate = normalize_url(line);
            if is_valid_site_url(&candidate) {
                Some(candidate)
            } else {
                warn!(line, "skipping invalid URL");
                None
            }
        })
        .collect()
}

/// Returns true if `url` is an absolute http(s) URL with a plausible host.
pub fn is_valid_site_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    match parsed.host_str() {
        Some(host) => is_plausible_host(host),
        None => false,
    }
}

fn is_plausible_host(host: &str) -> bool {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if bare.parse::<IpAddr>().is_ok() {
        return true;
    }
    if bare.eq_ignore_ascii_case("localhost") {
        return true;
    }
    bare.contains('.') && !bare.starts_with('.') && !bare.ends_with('.')
}

/// Extracts the base domain (scheme + host + optional port) from a URL.
pub fn base_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}", parsed.scheme(), host)),
    }
}

/// Host name of `url`, if it parses and has one.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn validate_urls_prefixes_and_filters() {
        let urls = validate_urls("example.com\nhttp://x.com\nnotaurl");
        assert_eq!(urls, vec!["https://example.com", "http://x.com"]);
    }

    #[test]
    fn validate_urls_skips_blank_lines_and_trims() {
        let urls = validate_urls("\n   https://blog.example.org/  \n\n");
        assert_eq!(urls, vec!["https://blog.example.org/"]);
    }

    #[test]
    fn validate_urls_keeps_localhost_and_ips() {
        let urls = validate_urls("http://localhost:8080\n127.0.0.1:3000");
        assert_eq!(urls, vec!["http://localhost:8080", "https://127.0.0.1:3000"]);
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(!is_valid_site_url("ftp://example.com"));
        assert!(validate_urls("ftp://example.com").is_empty());
    }

    #[test]
    fn base_domain_keeps_port() {
        assert_eq!(
            base_domain("http://example.com:8080/feed.xml"),
            Some("http://example.com:8080".to_string())
        );
        assert_eq!(base_domain("not a url"), None);
    }

    #[test]
    fn host_of_extracts_host() {
        assert_eq!(host_of("https://blog.example.com/feed"), Some("blog.example.com".into()));
    }
}

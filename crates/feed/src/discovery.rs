// ABOUTME: Feed hint extraction from HTML pages.
// ABOUTME: Collects <link> feed declarations and well-known feed paths as candidate URLs.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// `type` attribute values of `<link>` elements that announce a feed.
pub const FEED_LINK_TYPES: &[&str] = &[
    "application/rss+xml",
    "application/atom+xml",
    "application/xml",
    "text/xml",
];

/// Paths probed on every site regardless of what the page declares.
pub const COMMON_FEED_PATHS: &[&str] = &[
    "/feed",
    "/rss",
    "/feed.xml",
    "/atom.xml",
    "/rss.xml",
    "/index.xml",
    "/feeds/all.atom.xml",
    "/feeds/all.rss.xml",
];

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    let selector = FEED_LINK_TYPES
        .iter()
        .map(|t| format!("link[type=\"{}\"]", t))
        .collect::<Vec<_>>()
        .join(", ");
    Selector::parse(&selector).unwrap()
});

/// Returns candidate feed URLs for the page at `base_url`.
///
/// Declared `<link>` feeds come first in document order, followed by the
/// common paths resolved against `base_url`. Hrefs that do not resolve are
/// skipped and duplicates keep their first position.
pub fn find_feeds_in_html(base_url: &str, html: &str) -> Vec<String> {
    let base = Url::parse(base_url).ok();
    let mut candidates = Vec::new();

    if let Some(base) = base.as_ref() {
        let doc = Html::parse_document(html);
        for link in doc.select(&LINK_SELECTOR) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if let Ok(resolved) = base.join(href.trim()) {
                candidates.push(resolved.to_string());
            }
        }
    }

    if let Some(base) = base.as_ref() {
        for path in COMMON_FEED_PATHS {
            if let Ok(resolved) = base.join(path) {
                candidates.push(resolved.to_string());
            }
        }
    }

    dedupe_preserving_order(candidates)
}

fn dedupe_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

// ABOUTME: Data models shared by the minitools crates.
// ABOUTME: Favorites, OPML subscriptions, and feeds discovered on web sites.

use serde::{Deserialize, Serialize};

/// Kind of syndication document found at a candidate URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Rss,
    Atom,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedKind::Rss => "rss",
            FeedKind::Atom => "atom",
        }
    }
}

/// A feed confirmed to exist at `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredFeed {
    #[serde(rename = "type")]
    pub kind: FeedKind,
    pub url: String,
    pub title: Option<String>,
}

/// A site together with every feed found on it. `feeds` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFeeds {
    pub site_url: String,
    pub feeds: Vec<DiscoveredFeed>,
}

impl SiteFeeds {
    /// A site with no discovered feeds.
    pub fn empty(site_url: impl Into<String>) -> Self {
        SiteFeeds {
            site_url: site_url.into(),
            feeds: Vec::new(),
        }
    }
}

/// A starred article exported from FreshRSS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    /// Publication time in epoch seconds.
    pub published: i64,
    pub feed_title: Option<String>,
    pub feed_url: Option<String>,
    pub site_url: Option<String>,
}

impl Favorite {
    /// Source label used for per-source tallies.
    pub fn source(&self) -> &str {
        self.feed_title.as_deref().unwrap_or(UNKNOWN_SOURCE)
    }
}

/// Label for favorites whose origin feed is not recorded.
pub const UNKNOWN_SOURCE: &str = "Unknown source";

/// A feed subscription read from an OPML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub title: String,
    pub xml_url: String,
    pub html_url: String,
    pub domain: String,
}

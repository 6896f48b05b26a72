// ABOUTME: Core data library for the minitools: feeds, OPML, exports and analytics.
// ABOUTME: Pure logic with no network access; the discover and feedbin crates build on it.

pub mod analytics;
pub mod discovery;
pub mod error;
pub mod freshrss;
pub mod models;
pub mod opml;
pub mod parser;
pub mod time_parse;
pub mod urls;

pub use analytics::{analyze, parse_articles, Analysis, Article};
pub use discovery::find_feeds_in_html;
pub use error::{ErrorKind, FeedError};
pub use freshrss::{parse_export, FreshRssExport};
pub use models::{DiscoveredFeed, Favorite, FeedKind, SiteFeeds, Subscription};
pub use opml::{escape_xml, generate_opml, generate_opml_now, parse_opml, write_subscriptions_opml};
pub use parser::probe_feed;
pub use time_parse::{parse_flexible_time, parse_timestamp_value};
pub use urls::{base_domain, normalize_url, validate_urls};

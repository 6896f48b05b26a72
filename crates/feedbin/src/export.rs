// ABOUTME: Exports of favorites a migration could not star.
// ABOUTME: Pretty JSON with metadata, a CSV listing, and an OPML of the feeds to subscribe to.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use minitools_feed::urls::host_of;
use minitools_feed::{write_subscriptions_opml, Favorite, Subscription};
use serde::Serialize;

pub const MISSING_FEEDS_TITLE: &str = "Missing feeds for Feedbin";

#[derive(Serialize)]
struct UnmigratedExport<'a> {
    export_date: String,
    unmigrated_count: usize,
    items: &'a [Favorite],
}

/// File name of the JSON export for a given day.
pub fn unmigrated_json_file_name(now: DateTime<Utc>) -> String {
    format!("unmigrated-favorites-{}.json", now.format("%Y-%m-%d"))
}

/// `{ export_date, unmigrated_count, items }`, pretty-printed.
pub fn unmigrated_json(unmigrated: &[Favorite], now: DateTime<Utc>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&UnmigratedExport {
        export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        unmigrated_count: unmigrated.len(),
        items: unmigrated,
    })
}

/// One row per favorite: title, url, source, feed_url, published (RFC 3339).
pub fn unmigrated_csv(unmigrated: &[Favorite]) -> String {
    let mut out = String::from("title,url,source,feed_url,published\n");
    for favorite in unmigrated {
        let published = DateTime::from_timestamp(favorite.published, 0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();
        let row = [
            favorite.title.as_str(),
            favorite.url.as_str(),
            favorite.source(),
            favorite.feed_url.as_deref().unwrap_or(""),
            published.as_str(),
        ];
        let cells: Vec<String> = row.iter().map(|cell| csv_cell(cell)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn csv_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Distinct feeds of the unmigrated favorites, first occurrence wins.
pub fn missing_feeds(unmigrated: &[Favorite]) -> Vec<Subscription> {
    let mut seen = HashSet::new();
    unmigrated
        .iter()
        .filter_map(|favorite| {
            let feed_url = favorite.feed_url.as_deref()?.trim();
            if feed_url.is_empty() || !seen.insert(feed_url.to_string()) {
                return None;
            }
            Some(Subscription {
                title: favorite.feed_title.clone().unwrap_or_default(),
                xml_url: feed_url.to_string(),
                html_url: favorite.site_url.clone().unwrap_or_default(),
                domain: host_of(feed_url).unwrap_or_default(),
            })
        })
        .collect()
}

pub fn missing_feeds_opml(unmigrated: &[Favorite], now: DateTime<Utc>) -> String {
    write_subscriptions_opml(MISSING_FEEDS_TITLE, &missing_feeds(unmigrated), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Favorite> {
        vec![
            Favorite {
                url: "https://a.example/1".into(),
                title: "Hello, \"world\"".into(),
                published: 1_700_000_000,
                feed_title: Some("A".into()),
                feed_url: Some("https://a.example/feed".into()),
                site_url: Some("https://a.example".into()),
                ..Favorite::default()
            },
            Favorite {
                url: "https://a.example/2".into(),
                title: "Second".into(),
                feed_title: Some("A".into()),
                feed_url: Some("https://a.example/feed".into()),
                ..Favorite::default()
            },
            Favorite {
                url: "https://b.example/1".into(),
                title: "No feed".into(),
                ..Favorite::default()
            },
        ]
    }

    #[test]
    fn json_carries_count_and_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&unmigrated_json(&sample(), now).unwrap()).unwrap();
        assert_eq!(json["export_date"], "2024-03-01T12:00:00.000Z");
        assert_eq!(json["unmigrated_count"], 3);
        assert_eq!(json["items"][2]["url"], "https://b.example/1");
        assert_eq!(unmigrated_json_file_name(now), "unmigrated-favorites-2024-03-01.json");
    }

    #[test]
    fn csv_quotes_special_cells() {
        let csv = unmigrated_csv(&sample());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "title,url,source,feed_url,published");
        assert_eq!(
            lines[1],
            "\"Hello, \"\"world\"\"\",https://a.example/1,A,https://a.example/feed,2023-11-14T22:13:20Z"
        );
        assert_eq!(lines[3], "No feed,https://b.example/1,Unknown source,,1970-01-01T00:00:00Z");
    }

    #[test]
    fn missing_feeds_are_distinct() {
        let feeds = missing_feeds(&sample());
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].xml_url, "https://a.example/feed");
        assert_eq!(feeds[0].html_url, "https://a.example");

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let opml = missing_feeds_opml(&sample(), now);
        assert!(opml.contains("<title>Missing feeds for Feedbin</title>"));
        assert_eq!(opml.matches("<outline ").count(), 1);
    }
}

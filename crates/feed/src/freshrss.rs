// ABOUTME: FreshRSS starred-items export reading and validation.
// ABOUTME: Checks the export shape and maps items onto Favorite records.

use crate::error::FeedError;
use crate::models::{Favorite, UNKNOWN_SOURCE};
use crate::time_parse::parse_timestamp_value;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Largest export accepted, in bytes.
pub const MAX_EXPORT_BYTES: usize = 50 * 1024 * 1024;

/// Number of leading items whose required fields are checked.
const SAMPLE_SIZE: usize = 5;

/// A validated FreshRSS export.
#[derive(Debug, Clone)]
pub struct FreshRssExport {
    items: Vec<Value>,
}

/// Parses and validates a FreshRSS JSON export.
pub fn parse_export(data: &[u8]) -> Result<FreshRssExport, FeedError> {
    if data.len() > MAX_EXPORT_BYTES {
        return Err(FeedError::validation("File too large (max 50MB)"));
    }
    let value: Value = serde_json::from_slice(data).map_err(FeedError::parse)?;
    FreshRssExport::from_value(value)
}

impl FreshRssExport {
    /// Validates an already-decoded export document.
    pub fn from_value(value: Value) -> Result<Self, FeedError> {
        let Value::Object(mut root) = value else {
            return Err(FeedError::validation(
                "Invalid file format: not a valid JSON object",
            ));
        };
        let items = match root.remove("items") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(FeedError::validation(
                    "Invalid FreshRSS file format: missing items array",
                ))
            }
        };
        if items.is_empty() {
            return Err(FeedError::empty("FreshRSS file contains no items to migrate"));
        }
        for item in items.iter().take(SAMPLE_SIZE) {
            if !is_truthy(item.get("title")) || !is_truthy(item.get("published")) {
                return Err(FeedError::validation(
                    "Invalid FreshRSS file format: items must have title and published fields",
                ));
            }
        }
        Ok(FreshRssExport { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Raw items as found in the export.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Every item as a Favorite, in export order.
    pub fn favorites(&self) -> Vec<Favorite> {
        self.items.iter().map(item_to_favorite).collect()
    }

    /// Number of distinct origin feeds.
    pub fn source_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| {
                item.pointer("/origin/title")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(UNKNOWN_SOURCE)
            })
            .collect::<HashSet<_>>()
            .len()
    }

    /// Oldest and newest publication times.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut times = self
            .items
            .iter()
            .filter_map(|item| item.get("published").and_then(parse_timestamp_value));
        let first = times.next()?;
        let (min, max) = times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some((min, max))
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(_) => true,
    }
}

fn str_at<'a>(item: &'a Value, pointer: &str) -> Option<&'a str> {
    item.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn item_to_favorite(item: &Value) -> Favorite {
    let url = str_at(item, "/url")
        .or_else(|| str_at(item, "/canonical/0/href"))
        .or_else(|| str_at(item, "/alternate/0/href"))
        .unwrap_or_default()
        .to_string();
    if url.is_empty() {
        debug!(title = ?item.get("title"), "favorite has no URL");
    }
    let feed_url = str_at(item, "/origin/feedUrl")
        .map(str::to_string)
        .or_else(|| {
            str_at(item, "/origin/streamId")
                .and_then(|id| id.strip_prefix("feed/"))
                .map(str::to_string)
        });

    Favorite {
        url,
        title: str_at(item, "/title").unwrap_or_default().to_string(),
        author: str_at(item, "/author").map(str::to_string),
        published: item
            .get("published")
            .and_then(parse_timestamp_value)
            .map(|t| t.timestamp())
            .unwrap_or(0),
        feed_title: str_at(item, "/feed_title")
            .or_else(|| str_at(item, "/origin/title"))
            .map(str::to_string),
        feed_url,
        site_url: str_at(item, "/origin/htmlUrl").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn export(json: &str) -> Result<FreshRssExport, FeedError> {
        parse_export(json.as_bytes())
    }

    #[test]
    fn rejects_missing_items() {
        let err = export(r#"{"id":"x"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid FreshRSS file format: missing items array");
        let err = export(r#"{"items":{}}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid FreshRSS file format: missing items array");
    }

    #[test]
    fn rejects_empty_items() {
        let err = export(r#"{"items":[]}"#).unwrap_err();
        assert_eq!(err.to_string(), "FreshRSS file contains no items to migrate");
    }

    #[test]
    fn rejects_items_without_required_fields() {
        let err = export(r#"{"items":[{"title":"ok","published":1},{"title":"no date"}]}"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid FreshRSS file format: items must have title and published fields"
        );
    }

    #[test]
    fn only_first_five_items_are_checked() {
        let mut items: Vec<String> = (0..5)
            .map(|i| format!(r#"{{"title":"t{}","published":{}}}"#, i, 1700000000 + i))
            .collect();
        items.push(r#"{"url":"https://late.example.com"}"#.to_string());
        let doc = format!(r#"{{"items":[{}]}}"#, items.join(","));
        assert_eq!(export(&doc).unwrap().len(), 6);
    }

    #[test]
    fn rejects_non_object() {
        assert!(export("[1,2]").is_err());
        assert!(export("not json").is_err());
    }

    #[test]
    fn maps_google_reader_items() {
        let doc = r#"{"items":[{
            "title":"Hello",
            "published":1700000000,
            "author":"Ann",
            "canonical":[{"href":"https://blog.example.com/hello"}],
            "origin":{"title":"Example Blog","htmlUrl":"https://blog.example.com","streamId":"feed/https://blog.example.com/feed"}
        }]}"#;
        let favs = export(doc).unwrap().favorites();
        assert_eq!(
            favs[0],
            Favorite {
                url: "https://blog.example.com/hello".into(),
                title: "Hello".into(),
                author: Some("Ann".into()),
                published: 1700000000,
                feed_title: Some("Example Blog".into()),
                feed_url: Some("https://blog.example.com/feed".into()),
                site_url: Some("https://blog.example.com".into()),
            }
        );
    }

    #[test]
    fn source_count_and_date_range() {
        let doc = r#"{"items":[
            {"title":"a","published":1700000000,"origin":{"title":"A"}},
            {"title":"b","published":1600000000,"origin":{"title":"B"}},
            {"title":"c","published":1650000000,"origin":{"title":"A"}},
            {"title":"d","published":1690000000}
        ]}"#;
        let parsed = export(doc).unwrap();
        assert_eq!(parsed.source_count(), 3);
        let (lo, hi) = parsed.date_range().unwrap();
        assert_eq!(lo.timestamp(), 1600000000);
        assert_eq!(hi.timestamp(), 1700000000);
    }

    #[test]
    fn out_of_range_published_values() {
        let doc = r#"{"items":[
            {"title":"a","published":-9223372036854775808},
            {"title":"b","published":"-9223372036854775808"},
            {"title":"c","published":-1e30},
            {"title":"d","published":1700000000}
        ]}"#;
        let parsed = export(doc).unwrap();
        let (lo, hi) = parsed.date_range().unwrap();
        assert_eq!((lo.timestamp(), hi.timestamp()), (1700000000, 1700000000));
        let published: Vec<i64> = parsed.favorites().iter().map(|f| f.published).collect();
        assert_eq!(published, vec![0, 0, 0, 1700000000]);
    }
}

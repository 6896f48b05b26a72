// ABOUTME: End-to-end migration runs against a mock Feedbin API.
// ABOUTME: Checks starring, failure tallies, progress callbacks and unmigrated exports.

use std::time::Duration;

use httpmock::prelude::*;
use minitools_feed::parse_export;
use minitools_feedbin::export::missing_feeds;
use minitools_feedbin::{Credentials, FeedbinClient, MigrationConfig, Migrator};
use pretty_assertions::assert_eq;
use serde_json::json;

fn export_json() -> String {
    let mut items = Vec::new();
    for i in 0..12 {
        items.push(json!({
            "title": format!("Post {i}"),
            "published": 1_700_000_000 + i,
            "canonical": [{"href": format!("https://blog.example.com/{i}")}],
            "origin": {
                "title": if i % 2 == 0 { "Even Blog" } else { "Odd Blog" },
                "feedUrl": if i % 2 == 0 { "https://even.example.com/feed" } else { "https://odd.example.com/feed" }
            }
        }));
    }
    json!({ "items": items }).to_string()
}

#[tokio::test]
async fn migrates_matching_entries_and_tallies_failures() {
    let server = MockServer::start();
    // Even posts exist in Feedbin, odd ones do not.
    for i in 0..12u64 {
        let url = format!("https://blog.example.com/{i}");
        let body = if i % 2 == 0 {
            json!([{ "id": 100 + i, "url": url }])
        } else {
            json!([])
        };
        server.mock(|when, then| {
            when.method(GET)
                .path("/entries.json")
                .query_param("search", url.as_str());
            then.status(200).json_body(body);
        });
    }
    let star = server.mock(|when, then| {
        when.method(POST).path("/starred_entries.json");
        then.status(200).json_body(json!([]));
    });

    let export = parse_export(export_json().as_bytes()).expect("valid export");
    let favorites = export.favorites();
    let client = FeedbinClient::builder(Credentials::new("me@example.com", "secret"))
        .base_url(server.base_url())
        .build()
        .unwrap();
    let config = MigrationConfig {
        batch_size: 10,
        delay: Duration::ZERO,
    };
    let migrator = Migrator::new(&client, config).unwrap();

    let mut progress = Vec::new();
    let report = migrator
        .run(&favorites, |done, total| progress.push((done, total)))
        .await;

    star.assert_hits(6);
    assert_eq!(progress, vec![(10, 12), (12, 12)]);
    assert_eq!(report.total, 12);
    assert_eq!(report.processed, 12);
    assert_eq!(report.starred, 6);
    assert_eq!(report.failed, 6);
    assert_eq!(report.success_rate(), 50);
    assert_eq!(report.by_source["Even Blog"].starred, 6);
    assert_eq!(report.by_source["Odd Blog"].failed(), 6);
    assert_eq!(report.top_failed_sources(3), vec![("Odd Blog".to_string(), 6)]);

    let feeds = missing_feeds(&report.unmigrated);
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].xml_url, "https://odd.example.com/feed");
}

#[tokio::test]
async fn rejected_credentials_fail_every_item() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.any_request();
        then.status(401);
    });

    let export = parse_export(export_json().as_bytes()).unwrap();
    let client = FeedbinClient::builder(Credentials::new("me@example.com", "wrong"))
        .base_url(server.base_url())
        .build()
        .unwrap();
    assert!(!client.test_auth().await);

    let migrator = Migrator::new(
        &client,
        MigrationConfig {
            batch_size: 10,
            delay: Duration::ZERO,
        },
    )
    .unwrap();
    let report = migrator.run(&export.favorites(), |_, _| {}).await;
    assert_eq!(report.starred, 0);
    assert_eq!(report.failed, 12);
    assert_eq!(report.unmigrated.len(), 12);
}

#[test]
fn migrator_rejects_invalid_config() {
    let client = FeedbinClient::new(Credentials::new("me@example.com", "secret")).unwrap();
    let config = MigrationConfig {
        batch_size: 1,
        delay: Duration::ZERO,
    };
    assert!(Migrator::new(&client, config).is_err());
}

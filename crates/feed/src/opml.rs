// ABOUTME: OPML 2.0 writing and reading.
// ABOUTME: Serializes discovered feeds or subscriptions and parses rss outlines back into Subscriptions.

use crate::error::FeedError;
use crate::models::{SiteFeeds, Subscription};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::fmt::Write;
use url::Url;

/// Head title used for documents produced from a URL list.
pub const DEFAULT_OPML_TITLE: &str = "URLs to OPML Feed Subscriptions";

/// Escapes the five XML special characters for use in attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds an OPML document with one outline per discovered feed.
///
/// The outline text is the feed title, falling back to the site URL; `htmlUrl`
/// is always the site URL. Sites without feeds contribute nothing.
pub fn generate_opml(sites: &[SiteFeeds], date_created: DateTime<Utc>) -> String {
    let mut outlines = String::new();
    for site in sites {
        for feed in &site.feeds {
            let text = feed
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(&site.site_url);
            push_outline(&mut outlines, text, &feed.url, &site.site_url);
        }
    }
    render_document(DEFAULT_OPML_TITLE, &outlines, date_created)
}

/// Same as [`generate_opml`], stamped with the current time.
pub fn generate_opml_now(sites: &[SiteFeeds]) -> String {
    generate_opml(sites, Utc::now())
}

/// Builds an OPML document from a list of subscriptions.
pub fn write_subscriptions_opml(
    title: &str,
    subscriptions: &[Subscription],
    date_created: DateTime<Utc>,
) -> String {
    let mut outlines = String::new();
    for sub in subscriptions {
        let text = if sub.title.is_empty() {
            &sub.xml_url
        } else {
            &sub.title
        };
        push_outline(&mut outlines, text, &sub.xml_url, &sub.html_url);
    }
    render_document(title, &outlines, date_created)
}

fn push_outline(out: &mut String, text: &str, xml_url: &str, html_url: &str) {
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "    <outline type=\"rss\" text=\"{}\" xmlUrl=\"{}\" htmlUrl=\"{}\"/>",
        escape_xml(text),
        escape_xml(xml_url),
        escape_xml(html_url)
    );
}

fn render_document(title: &str, outlines: &str, date_created: DateTime<Utc>) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<opml version=\"2.0\">\n  <head>\n    <title>{}</title>\n    <dateCreated>{}</dateCreated>\n  </head>\n  <body>\n{}  </body>\n</opml>",
        escape_xml(title),
        date_created.to_rfc3339_opts(SecondsFormat::Millis, true),
        outlines
    )
}

/// Parses every `<outline type="rss">` (at any depth) into a Subscription.
///
/// Outlines without an `xmlUrl` are skipped. Attribute names are matched
/// case-insensitively so `xmlurl` exports are accepted too.
pub fn parse_opml(xml: &str) -> Result<Vec<Subscription>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut subscriptions = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                if !saw_root {
                    if !name.as_ref().eq_ignore_ascii_case(b"opml") {
                        return Err(FeedError::invalid("root element is not <opml>"));
                    }
                    saw_root = true;
                }
                if name.as_ref().eq_ignore_ascii_case(b"outline") {
                    if let Some(sub) = outline_to_subscription(e) {
                        subscriptions.push(sub);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::parse(e)),
            _ => {}
        }
    }

    if !saw_root {
        return Err(FeedError::invalid("document has no <opml> element"));
    }
    Ok(subscriptions)
}

fn outline_to_subscription(e: &BytesStart) -> Option<Subscription> {
    let is_rss = attribute(e, "type")
        .map(|t| t.eq_ignore_ascii_case("rss"))
        .unwrap_or(false);
    if !is_rss {
        return None;
    }

    let xml_url = attribute(e, "xmlUrl").unwrap_or_default();
    if xml_url.is_empty() {
        return None;
    }
    let html_url = attribute(e, "htmlUrl").unwrap_or_default();
    let title = attribute(e, "title")
        .filter(|t| !t.is_empty())
        .or_else(|| attribute(e, "text"))
        .unwrap_or_default();
    let domain = subscription_domain(&xml_url, &html_url, &title);

    Some(Subscription {
        title,
        xml_url,
        html_url,
        domain,
    })
}

/// Host of the feed URL, else of the site URL, else a slug of the title.
fn subscription_domain(xml_url: &str, html_url: &str, title: &str) -> String {
    let host = |s: &str| Url::parse(s).ok().and_then(|u| u.host_str().map(str::to_string));
    host(xml_url).or_else(|| host(html_url)).unwrap_or_else(|| {
        title
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect()
    })
}

/// Gets an attribute value by case-insensitive name, unescaped.
fn attribute(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref());
        if key.eq_ignore_ascii_case(name) {
            let raw = String::from_utf8_lossy(&attr.value);
            return Some(match quick_xml::escape::unescape(&raw) {
                Ok(v) => v.into_owned(),
                Err(_) => raw.into_owned(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiscoveredFeed, FeedKind};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn generates_exact_document() {
        let sites = vec![SiteFeeds {
            site_url: "https://a.com".into(),
            feeds: vec![DiscoveredFeed {
                kind: FeedKind::Rss,
                url: "https://a.com/feed".into(),
                title: Some("A & B".into()),
            }],
        }];
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<opml version=\"2.0\">\n  <head>\n    <title>URLs to OPML Feed Subscriptions</title>\n    <dateCreated>2024-03-01T12:00:00.000Z</dateCreated>\n  </head>\n  <body>\n    <outline type=\"rss\" text=\"A &amp; B\" xmlUrl=\"https://a.com/feed\" htmlUrl=\"https://a.com\"/>\n  </body>\n</opml>";
        assert_eq!(generate_opml(&sites, fixed_date()), expected);
    }

    #[test]
    fn untitled_feed_uses_site_url() {
        let sites = vec![SiteFeeds {
            site_url: "https://b.org".into(),
            feeds: vec![DiscoveredFeed {
                kind: FeedKind::Atom,
                url: "https://b.org/atom.xml".into(),
                title: None,
            }],
        }];
        let doc = generate_opml(&sites, fixed_date());
        assert!(doc.contains("text=\"https://b.org\" xmlUrl=\"https://b.org/atom.xml\""));
    }

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(escape_xml(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;");
    }

    #[test]
    fn parses_nested_rss_outlines() {
        let xml = r#"<?xml version="1.0"?>
<opml version="1.0">
  <head><title>Subs</title></head>
  <body>
    <outline text="Tech">
      <outline type="rss" text="Blog One" xmlUrl="https://one.example.com/feed" htmlUrl="https://one.example.com"/>
      <outline type="rss" title="Two" text="ignored" xmlurl="https://two.example.net/rss"/>
      <outline type="rss" text="No feed url"/>
    </outline>
    <outline type="link" text="Not a feed" xmlUrl="https://three.example/x"/>
  </body>
</opml>"#;
        let subs = parse_opml(xml).unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].title, "Blog One");
        assert_eq!(subs[0].domain, "one.example.com");
        assert_eq!(subs[1].title, "Two");
        assert_eq!(subs[1].xml_url, "https://two.example.net/rss");
        assert_eq!(subs[1].html_url, "");
    }

    #[test]
    fn domain_falls_back_to_title_slug() {
        let xml = r#"<opml><body><outline type="rss" text="My Blog!" xmlUrl="feed.xml"/></body></opml>"#;
        let subs = parse_opml(xml).unwrap();
        assert_eq!(subs[0].domain, "myblog");
    }

    #[test]
    fn round_trips_escaped_titles() {
        let subs = vec![Subscription {
            title: "Q&A \"weekly\"".into(),
            xml_url: "https://qa.example.com/feed?a=1&b=2".into(),
            html_url: "https://qa.example.com".into(),
            domain: "qa.example.com".into(),
        }];
        let doc = write_subscriptions_opml("Missing feeds", &subs, fixed_date());
        assert_eq!(parse_opml(&doc).unwrap(), subs);
    }

    #[test]
    fn rejects_non_opml_root() {
        assert!(parse_opml("<rss><channel/></rss>").is_err());
    }
}

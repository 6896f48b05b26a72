// ABOUTME: Feed probing: decides whether fetched bytes are an RSS or Atom document.
// ABOUTME: Sniffs the XML root with quick-xml, then reads the title through feed-rs.

use crate::error::FeedError;
use crate::models::{DiscoveredFeed, FeedKind};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// What a full pass over the XML found.
#[derive(Debug, Default)]
struct Sniffed {
    root: Option<String>,
    raw_title: Option<String>,
}

/// Checks that `data` is a well-formed RSS or Atom document and describes it.
///
/// # Arguments
/// * `data` - Raw response body
/// * `url` - The URL the body was fetched from (stored as-is)
///
/// # Returns
/// * `Ok(DiscoveredFeed)` - Root is `<rss>` or `<feed>`; title trimmed, empty as None
/// * `Err(FeedError)` - Malformed XML or any other root element
pub fn probe_feed(data: &[u8], url: &str) -> Result<DiscoveredFeed, FeedError> {
    let sniffed = sniff(data)?;
    let kind = match sniffed.root.as_deref() {
        Some("rss") => FeedKind::Rss,
        Some("feed") => FeedKind::Atom,
        Some(other) => {
            return Err(FeedError::invalid(format!(
                "unsupported root element <{}>",
                other
            )))
        }
        None => return Err(FeedError::invalid("document has no root element")),
    };

    // feed-rs handles entities, CDATA and Atom text constructs; the raw title
    // only covers documents it refuses.
    let title = match feed_rs::parser::parse(data) {
        Ok(parsed) => parsed.title.map(|t| t.content),
        Err(_) => sniffed.raw_title,
    };
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(DiscoveredFeed {
        kind,
        url: url.to_string(),
        title,
    })
}

/// Reads the whole document, failing on malformed XML, and records the root
/// element plus the text of `rss > channel > title` or `feed > title`.
fn sniff(data: &[u8]) -> Result<Sniffed, FeedError> {
    let mut reader = Reader::from_reader(data);
    reader.config_mut().trim_text(false);

    let mut result = Sniffed::default();
    let mut stack: Vec<String> = Vec::new();
    let mut title = String::new();
    let mut in_title = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if stack.is_empty() {
                    if result.root.is_some() {
                        return Err(FeedError::parse("multiple root elements"));
                    }
                    result.root = Some(name.clone());
                }
                stack.push(name);
                in_title = result.raw_title.is_none() && is_title_path(&stack);
            }
            Ok(Event::Empty(ref e)) => {
                if stack.is_empty() {
                    if result.root.is_some() {
                        return Err(FeedError::parse("multiple root elements"));
                    }
                    result.root =
                        Some(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                }
            }
            Ok(Event::Text(ref e)) if in_title => {
                title.push_str(&e.decode().map_err(FeedError::parse)?);
            }
            Ok(Event::CData(e)) if in_title => {
                title.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::GeneralRef(ref e)) if in_title => {
                if let Ok(Some(c)) = e.resolve_char_ref() {
                    title.push(c);
                } else {
                    let name = e.decode().map_err(FeedError::parse)?;
                    if let Some(resolved) = quick_xml::escape::resolve_predefined_entity(&name) {
                        title.push_str(resolved);
                    }
                }
            }
            Ok(Event::End(_)) => {
                if in_title {
                    result.raw_title = Some(std::mem::take(&mut title));
                    in_title = false;
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::parse(e)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(FeedError::parse("unexpected end of document"));
    }
    Ok(result)
}

fn is_title_path(stack: &[String]) -> bool {
    let path: Vec<&str> = stack.iter().map(String::as_str).collect();
    matches!(path.as_slice(), ["rss", "channel", "title"] | ["feed", "title"])
}

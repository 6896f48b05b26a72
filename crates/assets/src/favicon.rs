// ABOUTME: SVG favicon generation for the site and each tool.
// ABOUTME: Renders a rounded square with the tool name sized to fit.

use std::fs;
use std::path::{Path, PathBuf};

use minitools_feed::escape_xml;
use tracing::info;

use crate::error::AssetError;

pub const PRIMARY: &str = "#2c5aa0";
pub const PRIMARY_DARK: &str = "#1e3f6b";
pub const PRIMARY_LIGHT: &str = "#4a7bc8";
const TEXT_COLOR: &str = "#fff";
const SIZE: u32 = 64;
const FONT_FAMILY: &str =
    "system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";

/// Display name of the site-wide favicon.
pub const SITE_DISPLAY_NAME: &str = "Feed Minitools";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    pub slug: &'static str,
    pub display_name: Option<&'static str>,
    pub color: &'static str,
    /// Directory of the tool relative to the tools root.
    pub dir: &'static str,
}

impl Tool {
    pub fn display_name(&self) -> String {
        self.display_name
            .map(str::to_string)
            .unwrap_or_else(|| display_name_from_slug(self.slug))
    }
}

pub const TOOLS: [Tool; 5] = [
    Tool {
        slug: "feed-minitools",
        display_name: Some("Feed Minitools"),
        color: PRIMARY,
        dir: "feed-minitools",
    },
    Tool {
        slug: "favorites-migrator",
        display_name: Some("Favorites Migrator"),
        color: PRIMARY,
        dir: "feed-minitools/favorites-migrator",
    },
    Tool {
        slug: "subscription-organizer",
        display_name: Some("Subscription Organizer"),
        color: PRIMARY,
        dir: "feed-minitools/subscription-organizer",
    },
    Tool {
        slug: "urls-to-opml",
        display_name: Some("URLs to OPML"),
        color: PRIMARY,
        dir: "feed-minitools/urls-to-opml",
    },
    Tool {
        slug: "instafed",
        display_name: Some("InstaFed"),
        color: PRIMARY,
        dir: "instafed",
    },
];

/// `urls-to-opml` -> `Urls To Opml`.
pub fn display_name_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn font_size_for(len: usize) -> u32 {
    match len {
        0..=3 => 20,
        4..=6 => 16,
        7..=10 => 12,
        11..=15 => 10,
        _ => 8,
    }
}

fn number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

fn text_element(x: f64, y: f64, font_size: u32, text: &str) -> String {
    format!(
        "\n  <text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" letter-spacing=\"0.3px\">{}</text>",
        number(x),
        number(y),
        FONT_FAMILY,
        font_size,
        TEXT_COLOR,
        escape_xml(text)
    )
}

/// 64x64 rounded square in `color` with `display_name` centered on it.
///
/// Names longer than 8 characters with several words are split over two lines.
pub fn generate_svg_favicon(display_name: &str, color: &str) -> String {
    let len = display_name.chars().count();
    let font_size = font_size_for(len);
    let line_height = font_size as f64 * 1.2;
    let center = SIZE as f64 / 2.0;

    let words: Vec<&str> = display_name.split(' ').collect();
    let text = if words.len() > 1 && len > 8 {
        let mid = words.len().div_ceil(2);
        let first = words[..mid].join(" ");
        let second = words[mid..].join(" ");
        format!(
            "{}{}",
            text_element(center, center - line_height / 4.0, font_size, &first),
            text_element(center, center + line_height / 2.0, font_size, &second)
        )
    } else {
        text_element(center, center, font_size, display_name)
    };

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\" xmlns=\"http://www.w3.org/2000/svg\">\n  <rect width=\"{size}\" height=\"{size}\" rx=\"8\" ry=\"8\" fill=\"{color}\"/>{text}\n</svg>",
        size = SIZE,
        color = escape_xml(color),
        text = text
    )
}

/// Writes the site favicon to `<out>/shared/assets/favicon.svg` and one per
/// tool to `<out>/tools/<dir>/favicon.svg`. Returns the written paths.
pub fn generate_all(out_dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let mut written = Vec::new();

    let site = out_dir.join("shared").join("assets").join("favicon.svg");
    write_favicon(&site, &generate_svg_favicon(SITE_DISPLAY_NAME, PRIMARY))?;
    written.push(site);

    for tool in TOOLS {
        let path = out_dir.join("tools").join(tool.dir).join("favicon.svg");
        let name = tool.display_name();
        write_favicon(&path, &generate_svg_favicon(&name, tool.color))?;
        info!(tool = tool.slug, path = %path.display(), "favicon generated");
        written.push(path);
    }
    Ok(written)
}

fn write_favicon(path: &Path, svg: &str) -> Result<(), AssetError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
    }
    fs::write(path, svg).map_err(|e| AssetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slug_to_display_name() {
        assert_eq!(display_name_from_slug("urls-to-opml"), "Urls To Opml");
        assert_eq!(display_name_from_slug("instafed"), "Instafed");
    }

    #[test]
    fn font_sizes_by_length() {
        assert_eq!(font_size_for(3), 20);
        assert_eq!(font_size_for(6), 16);
        assert_eq!(font_size_for(10), 12);
        assert_eq!(font_size_for(15), 10);
        assert_eq!(font_size_for(22), 8);
    }

    #[test]
    fn short_name_on_one_line() {
        let svg = generate_svg_favicon("InstaFed", PRIMARY);
        assert_eq!(svg.matches("<text ").count(), 1);
        assert!(svg.contains("x=\"32\" y=\"32\""));
        assert!(svg.contains("font-size=\"12\""));
        assert!(svg.contains("fill=\"#2c5aa0\""));
        assert!(svg.contains(">InstaFed</text>"));
    }

    #[test]
    fn long_multiword_name_on_two_lines() {
        // 22 chars: font 8, line height 9.6
        let svg = generate_svg_favicon("Subscription Organizer", PRIMARY);
        assert_eq!(svg.matches("<text ").count(), 2);
        assert!(svg.contains("y=\"29.6\" font-family"));
        assert!(svg.contains("y=\"36.8\" font-family"));
        assert!(svg.contains(">Subscription</text>"));
        assert!(svg.contains(">Organizer</text>"));
    }

    #[test]
    fn generate_all_writes_every_favicon() {
        let dir = tempfile::tempdir().unwrap();
        let written = generate_all(dir.path()).unwrap();
        assert_eq!(written.len(), TOOLS.len() + 1);
        assert!(dir
            .path()
            .join("tools/feed-minitools/urls-to-opml/favicon.svg")
            .is_file());
        assert!(dir.path().join("shared/assets/favicon.svg").is_file());
    }
}

// ABOUTME: Regex-based CSS minifier for the design-system stylesheets.
// ABOUTME: Writes `.min.css` siblings and reports the size reduction.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::AssetError;
use crate::SizeStats;

/// Stylesheets of the shared design system, relative to its directory.
pub const DESIGN_SYSTEM_FILES: [&str; 4] = [
    "variables.css",
    "base.css",
    "components.css",
    "utilities.css",
];

/// Ordered rewrite steps; whitespace collapsing must run after the punctuation passes.
static CSS_STEPS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/", ""),
        (r"\s*\{\s*", "{"),
        (r"\s*\}\s*", "}"),
        (r"\s*:\s*", ":"),
        (r"\s*;\s*", ";"),
        (r"\s*,\s*", ","),
        (r"\s*>\s*", ">"),
        (r"\s*\+\s*", "+"),
        (r"\s*~\s*", "~"),
        (r"\s+", " "),
        (r"\s*\{\s*", "{"),
        (r"\s*\}\s*", "}"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

static BEFORE_AT_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*@").unwrap());

/// Removes comments and insignificant whitespace.
pub fn minify_css(css: &str) -> String {
    let mut minified = css.to_string();
    for (re, replacement) in CSS_STEPS.iter() {
        minified = re.replace_all(&minified, *replacement).into_owned();
    }
    BEFORE_AT_RULE.replace_all(minified.trim(), "@").into_owned()
}

/// `base.css` -> `base.min.css`.
pub fn min_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.min.css", stem))
}

/// Minifies `input` into `output`.
pub fn process_css_file(input: &Path, output: &Path) -> Result<SizeStats, AssetError> {
    let css = fs::read_to_string(input).map_err(|e| AssetError::io(input, e))?;
    let minified = minify_css(&css);
    fs::write(output, &minified).map_err(|e| AssetError::io(output, e))?;

    let stats = SizeStats {
        original: css.len() as u64,
        processed: minified.len() as u64,
    };
    info!(
        file = %input.display(),
        original = stats.original,
        minified = stats.processed,
        "css minified"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_step_compiles() {
        assert_eq!(CSS_STEPS.len(), 12);
        assert!(BEFORE_AT_RULE.is_match(" @media"));
    }

    #[test]
    fn strips_comments_and_whitespace() {
        let css = "/* header */\n.a , .b > .c {\n  color : red ;\n  margin: 0 auto;\n}\n\n@media (max-width: 600px) {\n  .a { display: none; }\n}\n";
        assert_eq!(
            minify_css(css),
            ".a,.b>.c{color:red;margin:0 auto;}@media (max-width:600px){.a{display:none;}}"
        );
    }

    #[test]
    fn combinators_and_multiline_comments() {
        let css = "h1 + p ~ span {\n  /* multi\n     line */ top: 1px;\n}";
        assert_eq!(minify_css(css), "h1+p~span{top:1px;}");
    }

    #[test]
    fn min_path() {
        assert_eq!(
            min_path_for(Path::new("design/base.css")),
            PathBuf::from("design/base.min.css")
        );
    }
}

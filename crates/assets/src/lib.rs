// ABOUTME: Build-time asset tooling: CSS minification, SVG optimization and favicons.
// ABOUTME: Also produces a size report of the static assets of a project tree.

pub mod css;
pub mod error;
pub mod favicon;
pub mod report;
pub mod svg;

pub use css::{minify_css, process_css_file};
pub use error::AssetError;
pub use favicon::{display_name_from_slug, generate_svg_favicon};
pub use report::{generate_asset_report, AssetReport};
pub use svg::{find_svg_files, optimize_svg, process_svg_file};

use serde::Serialize;

/// Byte sizes before and after a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeStats {
    pub original: u64,
    pub processed: u64,
}

impl SizeStats {
    /// Size reduction in percent.
    pub fn reduction(&self) -> f64 {
        reduction_percent(self.original, self.processed)
    }
}

pub(crate) fn reduction_percent(original: u64, processed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - processed as f64 / original as f64) * 100.0
}

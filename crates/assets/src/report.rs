// ABOUTME: Size report of a project's static assets.
// ABOUTME: Collects SVG, design-system CSS, shared JS and ICO sizes and renders them as text.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::css::{min_path_for, DESIGN_SYSTEM_FILES};
use crate::error::AssetError;
use crate::reduction_percent;
use crate::svg::find_svg_files;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssEntry {
    pub file: String,
    pub original: u64,
    pub minified: Option<u64>,
}

impl CssEntry {
    pub fn reduction(&self) -> Option<f64> {
        self.minified
            .map(|minified| reduction_percent(self.original, minified))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub svg: u64,
    pub css: u64,
    pub js: u64,
    pub ico: u64,
}

impl Totals {
    pub fn grand_total(&self) -> u64 {
        self.svg + self.css + self.js + self.ico
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetReport {
    pub svg: Vec<FileEntry>,
    pub css: Vec<CssEntry>,
    pub js: Vec<FileEntry>,
    pub ico: Vec<FileEntry>,
    pub total: Totals,
}

fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}

/// Scans `root` with the project layout: SVGs anywhere, CSS in
/// `shared/design-system`, JS in `shared/utils`, `shared/assets/favicon.ico`.
pub fn generate_asset_report(root: &Path) -> Result<AssetReport, AssetError> {
    let mut report = AssetReport::default();

    for path in find_svg_files(root)? {
        if let Some(size) = file_size(&path) {
            report.total.svg += size;
            report.svg.push(FileEntry { path, size });
        }
    }

    let css_dir = root.join("shared").join("design-system");
    for file in DESIGN_SYSTEM_FILES {
        let path = css_dir.join(file);
        if let Some(original) = file_size(&path) {
            report.total.css += original;
            report.css.push(CssEntry {
                file: file.to_string(),
                original,
                minified: file_size(&min_path_for(&path)),
            });
        }
    }

    let js_dir = root.join("shared").join("utils");
    if js_dir.is_dir() {
        let mut js: Vec<PathBuf> = fs::read_dir(&js_dir)
            .map_err(|e| AssetError::io(&js_dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "js"))
            .collect();
        js.sort();
        for path in js {
            if let Some(size) = file_size(&path) {
                report.total.js += size;
                report.js.push(FileEntry { path, size });
            }
        }
    }

    let ico = root.join("shared").join("assets").join("favicon.ico");
    if let Some(size) = file_size(&ico) {
        report.total.ico += size;
        report.ico.push(FileEntry { path: ico, size });
    }

    Ok(report)
}

impl AssetReport {
    /// Human-readable report; paths are shown relative to `base` when possible.
    pub fn render(&self, base: &Path) -> String {
        let rel = |path: &Path| {
            path.strip_prefix(base)
                .unwrap_or(path)
                .display()
                .to_string()
        };
        let mut out = String::from("=== ASSET OPTIMIZATION REPORT ===\n\n");

        // Writing into a String cannot fail.
        if !self.svg.is_empty() {
            out.push_str("SVG files:\n");
            for file in &self.svg {
                let _ = writeln!(out, "  {}: {}B", rel(&file.path), file.size);
            }
            let _ = writeln!(out, "  Total SVG: {}B\n", self.total.svg);
        }
        if !self.css.is_empty() {
            out.push_str("CSS files:\n");
            for file in &self.css {
                let _ = write!(out, "  {}: {}B", file.file, file.original);
                if let (Some(minified), Some(reduction)) = (file.minified, file.reduction()) {
                    let _ = write!(out, " -> {}B ({:.1}% reduction)", minified, reduction);
                }
                out.push('\n');
            }
            let _ = writeln!(out, "  Total CSS: {}B\n", self.total.css);
        }
        if !self.js.is_empty() {
            out.push_str("JavaScript files:\n");
            for file in &self.js {
                let _ = writeln!(out, "  {}: {}B", rel(&file.path), file.size);
            }
            let _ = writeln!(out, "  Total JS: {}B\n", self.total.js);
        }
        if !self.ico.is_empty() {
            out.push_str("ICO files:\n");
            for file in &self.ico {
                let _ = writeln!(out, "  {}: {}B", rel(&file.path), file.size);
            }
            let _ = writeln!(out, "  Total ICO: {}B\n", self.total.ico);
        }

        let grand = self.total.grand_total();
        let _ = writeln!(out, "GRAND TOTAL: {}B ({:.2}KB)", grand, grand as f64 / 1024.0);
        out
    }
}

// ABOUTME: Regex-based SVG optimizer and SVG file discovery.
// ABOUTME: Files are rewritten in place only when the optimized output is smaller.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AssetError;
use crate::SizeStats;

/// Directory names never descended into.
pub const SKIPPED_DIRS: [&str; 5] = ["node_modules", ".git", "dist", "build", "target"];

static SVG_STEPS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"<!--[\s\S]*?-->", ""),
        (r"<\?xml[^>]*\?>\s*", ""),
        (r"\s+", " "),
        (r"\s*<", "<"),
        (r">\s*", ">"),
        (r"(?i)\s+([a-z-]+=)", " ${1}"),
        // 0.5 -> .5 unless the zero belongs to a larger number
        (r"([^0-9])0\.([0-9])", "${1}.${2}"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

pub fn optimize_svg(svg: &str) -> String {
    let mut optimized = svg.to_string();
    for (re, replacement) in SVG_STEPS.iter() {
        optimized = re.replace_all(&optimized, *replacement).into_owned();
    }
    optimized.trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgResult {
    pub path: PathBuf,
    pub stats: SizeStats,
    /// Whether the file was rewritten.
    pub optimized: bool,
}

/// Optimizes one SVG file in place when that makes it smaller.
pub fn process_svg_file(path: &Path) -> Result<SvgResult, AssetError> {
    let content = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
    let optimized = optimize_svg(&content);
    let original = content.len() as u64;
    let processed = optimized.len() as u64;

    if processed < original {
        fs::write(path, &optimized).map_err(|e| AssetError::io(path, e))?;
        info!(file = %path.display(), original, processed, "svg optimized");
        return Ok(SvgResult {
            path: path.to_path_buf(),
            stats: SizeStats {
                original,
                processed,
            },
            optimized: true,
        });
    }

    debug!(file = %path.display(), "svg already optimal");
    Ok(SvgResult {
        path: path.to_path_buf(),
        stats: SizeStats {
            original,
            processed: original,
        },
        optimized: false,
    })
}

/// All `.svg` files under `root`, sorted, skipping build and vendor folders.
pub fn find_svg_files(root: &Path) -> Result<Vec<PathBuf>, AssetError> {
    fs::metadata(root).map_err(|e| AssetError::io(root, e))?;

    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .process_read_dir(|_, _, _, children| {
            children.retain(|child| match child {
                Ok(entry) => {
                    !(entry.file_type().is_dir()
                        && SKIPPED_DIRS.contains(&entry.file_name().to_string_lossy().as_ref()))
                }
                Err(_) => true,
            });
        });

    let mut found: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".svg"))
        .map(|e| e.path())
        .collect();
    found.sort();
    Ok(found)
}

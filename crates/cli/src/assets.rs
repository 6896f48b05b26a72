// ABOUTME: `minitools assets`: CSS minification, SVG optimization, favicons and size report.
// ABOUTME: Thin wrappers over minitools-assets that print per-file results.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;
use minitools_assets::css::min_path_for;
use minitools_assets::favicon::generate_all;
use minitools_assets::{find_svg_files, generate_asset_report, process_css_file, process_svg_file};

use crate::output;

#[derive(Subcommand, Debug)]
pub enum AssetsCommand {
    /// Minify stylesheets into <name>.min.css next to each input
    MinifyCss {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Optimize every SVG under ROOT in place
    OptimizeSvg {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Generate the site and per-tool SVG favicons under OUT_DIR
    Favicons { out_dir: PathBuf },
    /// Print asset sizes and CSS reductions under ROOT
    Report {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

pub fn run(command: AssetsCommand) -> Result<()> {
    match command {
        AssetsCommand::MinifyCss { files } => minify_css(&files),
        AssetsCommand::OptimizeSvg { root } => optimize_svg(&root),
        AssetsCommand::Favicons { out_dir } => {
            let written = generate_all(&out_dir)?;
            output::success(format!("{} favicons written", written.len()));
            Ok(())
        }
        AssetsCommand::Report { root } => {
            let report = generate_asset_report(&root)?;
            print!("{}", report.render(&root));
            Ok(())
        }
    }
}

fn minify_css(files: &[PathBuf]) -> Result<()> {
    for input in files {
        let out = min_path_for(input);
        let stats = process_css_file(input, &out)?;
        println!(
            "{} -> {}: {}B -> {}B ({:.1}% smaller)",
            input.display(),
            out.display(),
            stats.original,
            stats.processed,
            stats.reduction()
        );
    }
    Ok(())
}

fn optimize_svg(root: &Path) -> Result<()> {
    let files = find_svg_files(root)?;
    let mut optimized = 0;
    for path in &files {
        let result = process_svg_file(path)?;
        if result.optimized {
            optimized += 1;
            println!(
                "{}: {}B -> {}B ({:.1}% smaller)",
                path.display(),
                result.stats.original,
                result.stats.processed,
                result.stats.reduction()
            );
        }
    }
    output::success(format!("{} of {} SVG files optimized", optimized, files.len()));
    Ok(())
}

// ABOUTME: Integration tests for the asset report and CSS minification on a temp project tree.
// ABOUTME: Builds a small design-system layout with tempfile and checks sizes and rendering.

use std::fs;
use std::path::Path;

use minitools_assets::css::min_path_for;
use minitools_assets::{generate_asset_report, process_css_file};
use pretty_assertions::assert_eq;

fn project(root: &Path) {
    let ds = root.join("shared/design-system");
    fs::create_dir_all(&ds).unwrap();
    fs::create_dir_all(root.join("shared/utils")).unwrap();
    fs::create_dir_all(root.join("shared/assets")).unwrap();
    fs::create_dir_all(root.join("tools/x")).unwrap();
    fs::write(ds.join("base.css"), "body {\n  margin : 0 ;\n}\n").unwrap();
    fs::write(ds.join("variables.css"), ":root { --blue: #2c5aa0; }").unwrap();
    fs::write(root.join("shared/utils/logger.js"), "export {};\n").unwrap();
    fs::write(root.join("shared/utils/notes.md"), "skip").unwrap();
    fs::write(root.join("shared/assets/favicon.ico"), [0u8; 10]).unwrap();
    fs::write(root.join("tools/x/icon.svg"), "<svg/>").unwrap();
}

#[test]
fn minifies_and_reports_design_system() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    project(root);

    let base = root.join("shared/design-system/base.css");
    let stats = process_css_file(&base, &min_path_for(&base)).unwrap();
    assert_eq!(stats.original, 24);
    assert_eq!(
        fs::read_to_string(root.join("shared/design-system/base.min.css")).unwrap(),
        "body{margin:0;}"
    );
    assert_eq!(stats.processed, 15);
    assert!((stats.reduction() - 37.5).abs() < 1e-9);

    let report = generate_asset_report(root).unwrap();
    // Order follows the design-system file list.
    let files: Vec<&str> = report.css.iter().map(|c| c.file.as_str()).collect();
    assert_eq!(files, vec!["variables.css", "base.css"]);
    assert_eq!(report.css[1].minified, Some(15));
    assert_eq!(report.css[0].minified, None);
    assert_eq!(report.js.len(), 1);
    assert_eq!(report.svg.len(), 1);
    assert_eq!(report.total.ico, 10);
    assert_eq!(report.total.svg, 6);

    let text = report.render(root);
    assert!(text.contains("  base.css: 24B -> 15B (37.5% reduction)"));
    assert!(text.contains("tools/x/icon.svg: 6B"));
    assert!(text.contains("GRAND TOTAL:"));
}

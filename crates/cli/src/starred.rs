// ABOUTME: `minitools analyze`: subscription analytics over a starred-articles dump.
// ABOUTME: Prints the analysis and recommendations as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use minitools_feed::analytics::recommend;
use minitools_feed::{analyze, parse_articles, parse_opml};
use serde_json::json;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON array of starred articles
    input: PathBuf,

    /// OPML export of current subscriptions
    #[arg(long)]
    opml: Option<PathBuf>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let data = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let articles = parse_articles(&data)?;

    let subscriptions = match &args.opml {
        Some(path) => {
            let xml = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Some(parse_opml(&xml)?)
        }
        None => None,
    };

    let analysis = analyze(&articles, subscriptions.as_deref(), Utc::now())?;
    let output = json!({
        "analysis": analysis,
        "recommendations": recommend(&analysis),
    });

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

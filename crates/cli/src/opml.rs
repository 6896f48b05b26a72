// ABOUTME: `minitools opml`: discover feeds for a URL list and write an OPML file.
// ABOUTME: Reads URLs from a file or stdin, one per line.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use minitools_discover::Client;
use minitools_feed::generate_opml_now;

use crate::output;

#[derive(Args, Debug)]
pub struct OpmlArgs {
    /// File with one site URL per line; "-" reads stdin
    #[arg(default_value = "-")]
    input: String,

    /// Where to write the OPML document
    #[arg(short = 'o', long = "output", default_value = "feeds.opml")]
    output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
}

pub async fn run(args: OpmlArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .allow_private_networks(args.allow_private_networks)
        .build()?;

    let sites = client.discover_text(&text).await?;
    for site in &sites {
        println!("{} ({} feeds)", site.site_url, site.feeds.len());
        for feed in &site.feeds {
            match &feed.title {
                Some(title) => println!("  [{}] {} - {}", feed.kind.as_str(), feed.url, title),
                None => println!("  [{}] {}", feed.kind.as_str(), feed.url),
            }
        }
    }

    let found: usize = sites.iter().map(|s| s.feeds.len()).sum();
    if found == 0 {
        bail!("No feeds found for the given sites");
    }

    fs::write(&args.output, generate_opml_now(&sites))
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    output::success(format!(
        "{} feeds from {} sites written to {}",
        found,
        sites.len(),
        args.output.display()
    ));
    Ok(())
}

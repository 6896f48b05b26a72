// ABOUTME: minitools command-line entry point.
// ABOUTME: Dispatches to the OPML, analyze, migrate, instafed and assets subcommands.

mod assets;
mod instafed;
mod migrate;
mod opml;
mod output;
mod starred;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use minitools_shared::logging;

#[derive(Parser, Debug)]
#[command(name = "minitools")]
#[command(about = "Feed discovery, subscription analysis and migration tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover feeds for a list of site URLs and write an OPML file
    Opml(opml::OpmlArgs),
    /// Analyze a starred-articles dump and suggest how to organize subscriptions
    Analyze(starred::AnalyzeArgs),
    /// Star FreshRSS favorites in a Feedbin account
    Migrate(migrate::MigrateArgs),
    /// Inspect an Instagram export or convert it for Pixelfed
    #[command(subcommand)]
    Instafed(instafed::InstafedCommand),
    /// Build-time asset transforms
    #[command(subcommand)]
    Assets(assets::AssetsCommand),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Opml(_) => "opml",
            Command::Analyze(_) => "analyze",
            Command::Migrate(_) => "migrate",
            Command::Instafed(_) => "instafed",
            Command::Assets(_) => "assets",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    if let Err(err) = logging::init() {
        eprintln!("{}", err);
    }

    tracing::debug!(command = cli.command.name(), "running");
    let result = match cli.command {
        Command::Opml(args) => opml::run(args).await,
        Command::Analyze(args) => starred::run(args),
        Command::Migrate(args) => migrate::run(args).await,
        Command::Instafed(cmd) => instafed::run(cmd),
        Command::Assets(cmd) => assets::run(cmd),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::report_error(&err);
            ExitCode::from(1)
        }
    }
}

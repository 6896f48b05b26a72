// ABOUTME: `minitools instafed`: inspect an Instagram export or convert it for Pixelfed.
// ABOUTME: Conversion writes a ZIP with the Pixelfed JSON, a README and the media files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use minitools_instafed::convert::{DEFAULT_CAPTION_PLACEHOLDER, DEFAULT_HASHTAGS};
use minitools_instafed::{is_valid_username, ConversionOptions, InstagramArchive, MetadataLevel};

use crate::output;

#[derive(Subcommand, Debug)]
pub enum InstafedCommand {
    /// Report posts, media and privacy issues found in the export
    Analyze {
        /// Instagram data export (ZIP)
        archive: PathBuf,
    },
    /// Convert the export into a Pixelfed import archive
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Instagram data export (ZIP)
    archive: PathBuf,

    /// Output ZIP (default: pixelfed_archive_<date>.zip)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Leave empty captions empty
    #[arg(long)]
    keep_empty_captions: bool,

    #[arg(long, default_value = DEFAULT_CAPTION_PLACEHOLDER)]
    caption_placeholder: String,

    /// Remove location and EXIF data according to --metadata-level
    #[arg(long)]
    clean_metadata: bool,

    /// strict, moderate or light
    #[arg(long, default_value = "strict")]
    metadata_level: MetadataLevel,

    #[arg(long)]
    add_hashtags: bool,

    #[arg(long, default_value = DEFAULT_HASHTAGS)]
    hashtags: String,

    /// Date posts with the conversion time instead of their original time
    #[arg(long)]
    use_migration_date: bool,
}

impl ConvertArgs {
    fn options(&self) -> ConversionOptions {
        ConversionOptions {
            fix_empty_captions: !self.keep_empty_captions,
            caption_placeholder: self.caption_placeholder.clone(),
            clean_metadata: self.clean_metadata,
            metadata_level: self.metadata_level,
            add_hashtags: self.add_hashtags,
            hashtags: self.hashtags.clone(),
            use_migration_date: self.use_migration_date,
        }
    }
}

fn open(path: &Path) -> Result<InstagramArchive> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(InstagramArchive::from_bytes(bytes)?)
}

pub fn run(command: InstafedCommand) -> Result<()> {
    match command {
        InstafedCommand::Analyze { archive } => analyze(&archive),
        InstafedCommand::Convert(args) => convert(&args),
    }
}

fn analyze(path: &Path) -> Result<()> {
    let mut archive = open(path)?;
    match archive.username() {
        Ok(username) if is_valid_username(&username) => println!("Username: {}", username),
        Ok(username) => output::warning(format!("Username '{}' is not valid on Pixelfed", username)),
        Err(err) => output::warning(err),
    }

    let issues = archive.analyze();
    let approx = if issues.estimated { " (estimated)" } else { "" };
    println!("Posts: {}{}", issues.total_posts, approx);
    println!("Photos: {}", issues.total_photos);
    println!("Videos: {}", issues.total_videos);
    println!("Empty captions: {}{}", issues.empty_captions, approx);
    println!("Photos with GPS data: {}{}", issues.photos_with_gps, approx);
    if issues.structure_issues {
        output::warning("The archive structure is incomplete");
    }
    for error in &issues.processing_errors {
        output::warning(error);
    }
    Ok(())
}

fn convert(args: &ConvertArgs) -> Result<()> {
    let mut archive = open(&args.archive)?;
    let pixelfed = archive.convert(&args.options(), Utc::now())?;
    let bytes = pixelfed.write_zip()?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(pixelfed.zip_file_name()));
    fs::write(&output_path, bytes)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    output::success(format!(
        "Converted {} posts ({} photos, {} videos) for {} into {}",
        pixelfed.metadata.total_posts,
        pixelfed.metadata.photos,
        pixelfed.metadata.videos,
        pixelfed.user.username,
        output_path.display()
    ));
    Ok(())
}

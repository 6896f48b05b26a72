// ABOUTME: Conversion of an Instagram export into a Pixelfed import archive.
// ABOUTME: Applies caption, metadata, hashtag and date options, then writes the output ZIP.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::archive::{InstagramArchive, Location, Media, MediaKind, Post};
use crate::error::InstafedError;

pub const DEFAULT_CAPTION_PLACEHOLDER: &str = "[Post imported]";
pub const DEFAULT_HASHTAGS: &str = "#migration #pixelfed";
pub const FALLBACK_USERNAME: &str = "migrated_user";
pub const DISPLAY_NAME: &str = "Migrated from Instagram";

const GPS_KEYS: [&str; 2] = ["latitude", "longitude"];
const CAMERA_KEYS: [&str; 6] = [
    "device_id",
    "camera_position",
    "lens_make",
    "lens_model",
    "make",
    "model",
];

/// How much metadata `clean_metadata` removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataLevel {
    /// Location and all EXIF.
    #[default]
    Strict,
    /// GPS coordinates only.
    Moderate,
    /// GPS coordinates and camera information.
    Light,
}

impl std::str::FromStr for MetadataLevel {
    type Err = InstafedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(MetadataLevel::Strict),
            "moderate" => Ok(MetadataLevel::Moderate),
            "light" => Ok(MetadataLevel::Light),
            other => Err(InstafedError::InvalidArchive(format!(
                "unknown metadata level '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOptions {
    pub fix_empty_captions: bool,
    pub caption_placeholder: String,
    pub clean_metadata: bool,
    pub metadata_level: MetadataLevel,
    pub add_hashtags: bool,
    pub hashtags: String,
    /// Stamp every post with the conversion time instead of its original date.
    pub use_migration_date: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            fix_empty_captions: true,
            caption_placeholder: DEFAULT_CAPTION_PLACEHOLDER.to_string(),
            clean_metadata: false,
            metadata_level: MetadataLevel::Strict,
            add_hashtags: false,
            hashtags: DEFAULT_HASHTAGS.to_string(),
            use_migration_date: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelfedUser {
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelfedMedia {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelfedPost {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media: Vec<PixelfedMedia>,
    pub caption: String,
    pub created_at: String,
    pub location: Option<Location>,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelfedMetadata {
    pub total_posts: usize,
    pub photos: usize,
    pub videos: usize,
    pub processing_options: ConversionOptions,
}

/// A media file copied into the output archive.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub path: String,
    pub data: Vec<u8>,
}

/// The converted export, ready to be written as a ZIP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelfedArchive {
    pub version: &'static str,
    pub platform: &'static str,
    pub export_date: String,
    pub user: PixelfedUser,
    pub posts: Vec<PixelfedPost>,
    pub metadata: PixelfedMetadata,
    #[serde(skip)]
    pub media_files: Vec<MediaFile>,
    #[serde(skip)]
    pub created: DateTime<Utc>,
}

impl InstagramArchive {
    /// Converts the export. Posts come from `content/posts_1.json`; without
    /// it every media file becomes its own post.
    pub fn convert(
        &mut self,
        options: &ConversionOptions,
        now: DateTime<Utc>,
    ) -> Result<PixelfedArchive, InstafedError> {
        let username = match self.username() {
            Ok(name) => name,
            Err(err) => {
                warn!(error = %err, "username unavailable, using fallback");
                FALLBACK_USERNAME.to_string()
            }
        };

        let posts = match self.posts()? {
            Some(posts) => posts,
            None => self.posts_from_media(),
        };

        let mut converted = Vec::with_capacity(posts.len());
        let mut media_files = Vec::new();
        let mut copied = HashSet::new();
        let (mut photos, mut videos) = (0, 0);

        for (index, post) in posts.iter().enumerate() {
            let mut media = Vec::new();
            for item in &post.media {
                let Some(kind) = item.kind else {
                    continue;
                };
                if !self.contains(&item.uri) {
                    warn!(uri = %item.uri, "referenced media missing from archive");
                    continue;
                }
                let path = output_media_path(&item.uri);
                if copied.insert(path.clone()) {
                    media_files.push(MediaFile {
                        path: path.clone(),
                        data: self.read(&item.uri)?,
                    });
                }
                match kind {
                    MediaKind::Photo => photos += 1,
                    MediaKind::Video => videos += 1,
                }
                media.push(PixelfedMedia {
                    kind: kind.as_str(),
                    path,
                    exif: clean_exif(item, options),
                });
            }
            if media.is_empty() {
                continue;
            }
            converted.push(convert_post(index + 1, post, media, options, now));
        }

        info!(posts = converted.len(), photos, videos, "instagram export converted");
        Ok(PixelfedArchive {
            version: "1.0",
            platform: "instagram",
            export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            user: PixelfedUser {
                username,
                display_name: DISPLAY_NAME.to_string(),
            },
            metadata: PixelfedMetadata {
                total_posts: converted.len(),
                photos,
                videos,
                processing_options: options.clone(),
            },
            posts: converted,
            media_files,
            created: now,
        })
    }

    fn posts_from_media(&self) -> Vec<Post> {
        self.media_files()
            .map(|(name, kind)| Post {
                caption: String::new(),
                creation_timestamp: None,
                location: None,
                media: vec![Media {
                    uri: name.to_string(),
                    kind: Some(kind),
                    creation_timestamp: None,
                    exif: Map::new(),
                }],
            })
            .collect()
    }
}

fn convert_post(
    id: usize,
    post: &Post,
    media: Vec<PixelfedMedia>,
    options: &ConversionOptions,
    now: DateTime<Utc>,
) -> PixelfedPost {
    let mut caption = post.caption.trim().to_string();
    if caption.is_empty() && options.fix_empty_captions {
        caption = options.caption_placeholder.clone();
    }
    if options.add_hashtags && !options.hashtags.trim().is_empty() {
        let missing: Vec<&str> = options
            .hashtags
            .split_whitespace()
            .filter(|tag| !caption.split_whitespace().any(|word| word == *tag))
            .collect();
        if !missing.is_empty() {
            if !caption.is_empty() {
                caption.push(' ');
            }
            caption.push_str(&missing.join(" "));
        }
    }

    let created = if options.use_migration_date {
        now
    } else {
        post.timestamp()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or(now)
    };

    let location = post.location.clone().and_then(|loc| {
        if !options.clean_metadata {
            return Some(loc);
        }
        match options.metadata_level {
            MetadataLevel::Strict => None,
            MetadataLevel::Moderate | MetadataLevel::Light => {
                let stripped = Location {
                    name: loc.name,
                    lat: None,
                    lng: None,
                };
                stripped.name.is_some().then_some(stripped)
            }
        }
    });

    let kind = match media.as_slice() {
        [single] => single.kind,
        _ => "album",
    };

    PixelfedPost {
        id: id.to_string(),
        kind,
        hashtags: hashtags_in(&caption),
        media,
        caption,
        created_at: created.to_rfc3339_opts(SecondsFormat::Secs, true),
        location,
    }
}

fn clean_exif(media: &Media, options: &ConversionOptions) -> Option<Map<String, Value>> {
    let mut exif = media.exif.clone();
    if options.clean_metadata {
        let drop: Vec<&str> = match options.metadata_level {
            MetadataLevel::Strict => return None,
            MetadataLevel::Moderate => GPS_KEYS.to_vec(),
            MetadataLevel::Light => GPS_KEYS.iter().chain(CAMERA_KEYS.iter()).copied().collect(),
        };
        exif.retain(|key, _| !drop.contains(&key.as_str()));
    }
    (!exif.is_empty()).then_some(exif)
}

/// Distinct `#tags` of a caption in order of appearance.
fn hashtags_in(caption: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    caption
        .split_whitespace()
        .filter(|word| word.len() > 1 && word.starts_with('#'))
        .map(|word| word.trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '_'))
        .filter(|tag| tag.len() > 1 && seen.insert(tag.to_string()))
        .map(str::to_string)
        .collect()
}

fn output_media_path(uri: &str) -> String {
    let trimmed = uri.trim_start_matches('/');
    if trimmed.starts_with("media/") {
        trimmed.to_string()
    } else {
        format!("media/{}", trimmed)
    }
}

impl PixelfedArchive {
    fn date_stamp(&self) -> String {
        self.created.format("%Y-%m-%d").to_string()
    }

    pub fn json_file_name(&self) -> String {
        format!("pixelfed_archive_{}.json", self.date_stamp())
    }

    pub fn zip_file_name(&self) -> String {
        format!("pixelfed_archive_{}.zip", self.date_stamp())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn readme(&self) -> String {
        format!(
            "# Pixelfed Migration Archive\n\
\n\
This archive was created by InstaFed to migrate your Instagram content to Pixelfed.\n\
\n\
## Contents\n\
- {json}: Your converted Instagram data in Pixelfed format\n\
- media/: The photos and videos referenced by your posts\n\
\n\
## How to Import\n\
1. Log into your Pixelfed account\n\
2. Go to Settings → Import\n\
3. Upload this ZIP file\n\
4. Review and confirm the import\n\
5. Wait for processing to complete\n\
\n\
## Migration Details\n\
- Total posts: {posts}\n\
- Photos: {photos}\n\
- Videos: {videos}\n\
- Migration date: {date}\n\
\n\
For more information, visit: https://docs.pixelfed.org/user-guide/import/\n",
            json = self.json_file_name(),
            posts = self.metadata.total_posts,
            photos = self.metadata.photos,
            videos = self.metadata.videos,
            date = self.date_stamp(),
        )
    }

    /// Serializes the archive JSON, README and media into a ZIP.
    pub fn write_zip(&self) -> Result<Vec<u8>, InstafedError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let json = self.to_json().map_err(|source| InstafedError::Json {
            what: "pixelfed archive",
            source,
        })?;
        writer.start_file(self.json_file_name(), options)?;
        writer.write_all(json.as_bytes())?;

        writer.start_file("README.md", options)?;
        writer.write_all(self.readme().as_bytes())?;

        // Media is already compressed.
        for file in &self.media_files {
            writer.start_file(file.path.as_str(), stored)?;
            writer.write_all(&file.data)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

// ABOUTME: Read access to an Instagram data export ZIP.
// ABOUTME: Validates the layout, extracts the username and decodes posts with their media.

use std::io::{Cursor, Read};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use zip::ZipArchive;

use crate::error::InstafedError;

pub const REQUIRED_DIRS: [&str; 2] = ["content/", "personal_information/"];
pub const PERSONAL_INFO_PATH: &str =
    "personal_information/personal_information/personal_information.json";
pub const POSTS_PATH: &str = "content/posts_1.json";

const PHOTO_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];
const VIDEO_EXTENSIONS: [&str; 2] = [".mp4", ".mov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Classifies a path by extension, case-insensitively.
    pub fn from_path(path: &str) -> Option<Self> {
        let lower = path.to_ascii_lowercase();
        if PHOTO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            Some(MediaKind::Photo)
        } else if VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }
}

/// Location attached to a post.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Location {
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}

/// One media item of a post, with its flattened EXIF fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub uri: String,
    pub kind: Option<MediaKind>,
    pub creation_timestamp: Option<i64>,
    pub exif: Map<String, Value>,
}

impl Media {
    pub fn has_gps(&self) -> bool {
        self.exif.contains_key("latitude") && self.exif.contains_key("longitude")
    }
}

/// A post read from `content/posts_1.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub caption: String,
    pub creation_timestamp: Option<i64>,
    pub location: Option<Location>,
    pub media: Vec<Media>,
}

impl Post {
    pub fn has_empty_caption(&self) -> bool {
        self.caption.trim().is_empty()
    }

    pub fn has_gps(&self) -> bool {
        self.location.as_ref().is_some_and(Location::has_coordinates)
            || self.media.iter().any(Media::has_gps)
    }

    /// Post time, falling back to the first media's time.
    pub fn timestamp(&self) -> Option<i64> {
        self.creation_timestamp
            .or_else(|| self.media.iter().find_map(|m| m.creation_timestamp))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawPost {
    title: Option<String>,
    caption: Option<String>,
    creation_timestamp: Option<i64>,
    location: Option<Location>,
    media: Vec<RawMedia>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawMedia {
    uri: String,
    title: Option<String>,
    creation_timestamp: Option<i64>,
    media_metadata: Option<Value>,
}

impl RawPost {
    fn into_post(self) -> Post {
        let caption = [self.title.as_deref(), self.caption.as_deref()]
            .into_iter()
            .flatten()
            .chain(self.media.iter().filter_map(|m| m.title.as_deref()))
            .find(|c| !c.trim().is_empty())
            .unwrap_or_default()
            .to_string();
        let media = self
            .media
            .into_iter()
            .filter(|m| !m.uri.is_empty())
            .map(|m| Media {
                kind: MediaKind::from_path(&m.uri),
                exif: flatten_exif(m.media_metadata.as_ref()),
                uri: m.uri,
                creation_timestamp: m.creation_timestamp,
            })
            .collect();
        Post {
            caption,
            creation_timestamp: self.creation_timestamp,
            location: self.location,
            media,
        }
    }
}

/// Merges every `exif_data` object found under `photo_metadata` or `video_metadata`.
fn flatten_exif(metadata: Option<&Value>) -> Map<String, Value> {
    let mut exif = Map::new();
    let Some(metadata) = metadata else {
        return exif;
    };
    for key in ["photo_metadata", "video_metadata"] {
        let entries = metadata
            .get(key)
            .and_then(|m| m.get("exif_data"))
            .and_then(Value::as_array);
        for entry in entries.into_iter().flatten() {
            if let Some(obj) = entry.as_object() {
                exif.extend(obj.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
    }
    exif
}

/// An opened Instagram export.
pub struct InstagramArchive {
    zip: ZipArchive<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl std::fmt::Debug for InstagramArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstagramArchive")
            .field("entries", &self.names.len())
            .finish()
    }
}

impl InstagramArchive {
    /// Opens a ZIP export and checks that the required folders are present.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, InstafedError> {
        let zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| InstafedError::InvalidArchive(format!("not a readable ZIP file ({})", e)))?;
        let names: Vec<String> = zip.file_names().map(str::to_string).collect();

        let missing: Vec<&str> = REQUIRED_DIRS
            .iter()
            .copied()
            .filter(|dir| !names.iter().any(|name| name.starts_with(dir)))
            .collect();
        if !missing.is_empty() {
            return Err(InstafedError::InvalidArchive(format!(
                "Missing required files: {}",
                missing.join(", ")
            )));
        }

        debug!(entries = names.len(), "instagram archive opened");
        Ok(Self { zip, names })
    }

    /// Entry names in archive order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// File entries that look like photos or videos.
    pub fn media_files(&self) -> impl Iterator<Item = (&str, MediaKind)> {
        self.names
            .iter()
            .filter(|name| !name.ends_with('/'))
            .filter_map(|name| MediaKind::from_path(name).map(|kind| (name.as_str(), kind)))
    }

    pub fn read(&mut self, name: &str) -> Result<Vec<u8>, InstafedError> {
        let mut file = self.zip.by_name(name)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Account username from the personal information file.
    pub fn username(&mut self) -> Result<String, InstafedError> {
        if !self.contains(PERSONAL_INFO_PATH) {
            return Err(InstafedError::MissingPersonalInformation);
        }
        let data = self.read(PERSONAL_INFO_PATH)?;
        let value: Value = serde_json::from_slice(&data).map_err(|source| InstafedError::Json {
            what: "personal information",
            source,
        })?;
        value
            .pointer("/profile_user/0/string_map_data/Username/value")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(InstafedError::UsernameNotFound)
    }

    /// Decoded posts, or None when the archive has no posts file.
    pub fn posts(&mut self) -> Result<Option<Vec<Post>>, InstafedError> {
        if !self.contains(POSTS_PATH) {
            return Ok(None);
        }
        let data = self.read(POSTS_PATH)?;
        let raw: Vec<RawPost> = serde_json::from_slice(&data)
            .map_err(|source| InstafedError::Json { what: "posts", source })?;
        Ok(Some(raw.into_iter().map(RawPost::into_post).collect()))
    }
}

/// At least three characters, letters, digits, dots and underscores only.
pub fn is_valid_username(username: &str) -> bool {
    username.chars().count() >= 3
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

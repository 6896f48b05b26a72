// ABOUTME: Instagram data export to Pixelfed import archive conversion.
// ABOUTME: Opens and validates export ZIPs, analyzes their content and writes the converted archive.

pub mod analysis;
pub mod archive;
pub mod convert;
pub mod error;

pub use analysis::ArchiveIssues;
pub use archive::{is_valid_username, InstagramArchive, Location, Media, MediaKind, Post};
pub use convert::{ConversionOptions, MetadataLevel, PixelfedArchive, PixelfedPost};
pub use error::InstafedError;

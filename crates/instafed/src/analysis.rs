// ABOUTME: Pre-conversion inspection of an Instagram export.
// ABOUTME: Counts posts, media, empty captions and geotagged photos, estimating when posts are missing.

use serde::Serialize;
use tracing::warn;

use crate::archive::{InstagramArchive, MediaKind, REQUIRED_DIRS};

/// Average number of media per post used when the posts file is unusable.
const MEDIA_PER_POST: f64 = 1.5;
const EMPTY_CAPTION_SHARE: f64 = 0.1;
const GPS_SHARE: f64 = 0.3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchiveIssues {
    pub total_posts: usize,
    pub total_photos: usize,
    pub total_videos: usize,
    pub empty_captions: usize,
    pub photos_with_gps: usize,
    pub structure_issues: bool,
    pub processing_errors: Vec<String>,
    /// True when post figures are estimates rather than counts.
    pub estimated: bool,
}

impl ArchiveIssues {
    pub fn total_media(&self) -> usize {
        self.total_photos + self.total_videos
    }

    fn estimate_from_media(&mut self) {
        self.estimated = true;
        self.total_posts = (self.total_media() as f64 / MEDIA_PER_POST).ceil() as usize;
        self.empty_captions = (self.total_posts as f64 * EMPTY_CAPTION_SHARE).floor() as usize;
        self.photos_with_gps = (self.total_photos as f64 * GPS_SHARE).floor() as usize;
    }
}

impl InstagramArchive {
    /// Inspects the archive. Problems reading posts are reported in
    /// `processing_errors` and the figures are estimated from the media count.
    pub fn analyze(&mut self) -> ArchiveIssues {
        let mut issues = ArchiveIssues::default();
        for (_, kind) in self.media_files() {
            match kind {
                MediaKind::Photo => issues.total_photos += 1,
                MediaKind::Video => issues.total_videos += 1,
            }
        }
        issues.structure_issues = !REQUIRED_DIRS
            .iter()
            .all(|dir| self.names().iter().any(|name| name.starts_with(dir)));

        match self.posts() {
            Ok(Some(posts)) => {
                issues.total_posts = posts.len();
                issues.empty_captions = posts.iter().filter(|p| p.has_empty_caption()).count();
                issues.photos_with_gps = posts.iter().filter(|p| p.has_gps()).count();
            }
            Ok(None) => issues.estimate_from_media(),
            Err(err) => {
                warn!(error = %err, "posts data unusable, estimating");
                issues
                    .processing_errors
                    .push(format!("Posts data parsing error: {}", err));
                issues.estimate_from_media();
            }
        }
        issues
    }
}

// ABOUTME: Error type for the asset build steps.
// ABOUTME: Carries the path of the file that could not be read or written.

use std::path::{Path, PathBuf};

use minitools_feed::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Unknown
    }
}

use std::path::{Path, PathBuf};

use crate::error::Error;

/// A song described by its song.ini. Only built when both title and artist
/// are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub normalized_artist: String,
    /// Folder holding the song.ini; the video is written here.
    pub source_directory: PathBuf,
}

impl SongRecord {
    pub fn summary(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

/// One search hit, in provider order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub url: String,
    pub uploader_name: Option<String>,
}

/// Metadata-only view of a single video, as reported by the downloader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoProbe {
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl VideoProbe {
    /// Publisher name used for the artist match: uploader, else channel.
    pub fn publisher(&self) -> Option<&str> {
        [self.uploader.as_deref(), self.channel.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }

    pub fn resolution(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            _ => "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Downloaded,
    AlreadyExists,
    Skipped,
    Failed,
}

impl FetchKind {
    pub fn label(&self) -> &'static str {
        match self {
            FetchKind::Downloaded => "downloaded",
            FetchKind::AlreadyExists => "already exists",
            FetchKind::Skipped => "skipped",
            FetchKind::Failed => "failed",
        }
    }
}

/// Outcome of one folder's pipeline run. Only used for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub kind: FetchKind,
    pub output_path: Option<PathBuf>,
    pub reason: Option<String>,
}

impl FetchResult {
    pub fn downloaded(path: &Path) -> Self {
        Self {
            kind: FetchKind::Downloaded,
            output_path: Some(path.to_path_buf()),
            reason: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.kind == FetchKind::Downloaded
    }
}

impl From<Error> for FetchResult {
    fn from(err: Error) -> Self {
        let kind = match &err {
            Error::AlreadyExists(_) => FetchKind::AlreadyExists,
            e if e.is_skip() => FetchKind::Skipped,
            _ => FetchKind::Failed,
        };
        let output_path = match &err {
            Error::AlreadyExists(path) => Some(path.clone()),
            _ => None,
        };
        Self {
            kind,
            output_path,
            reason: Some(err.to_string()),
        }
    }
}

/// A walked folder and what happened to it.
#[derive(Debug, Clone)]
pub struct FolderReport {
    pub directory: PathBuf,
    pub song: Option<SongRecord>,
    pub result: FetchResult,
}

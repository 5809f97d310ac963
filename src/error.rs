//! Error types for songvid

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop work on a song folder, plus the one fatal case
/// (an unusable root directory).
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {tool} output: {source}")]
    Json {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Root directory does not exist or is not a directory: {0}")]
    InvalidRoot(PathBuf),

    #[error("No song.ini found in {0}")]
    MetadataNotFound(PathBuf),

    #[error("Missing song title or artist in {0}")]
    MetadataIncomplete(PathBuf),

    #[error("No results found for {title} by {artist}")]
    NoCandidates { title: String, artist: String },

    #[error("Video uploader '{uploader}' does not contain the artist '{artist}'")]
    UploaderMismatch { uploader: String, artist: String },

    #[error("Video already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("{0} not found (configure its path or put it on PATH)")]
    ToolMissing(&'static str),

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: &'static str, message: String },

    #[error("Download finished but no downloaded file was found in {0}")]
    DownloadMissing(PathBuf),

    #[error("Transcode of {input} failed: {message}")]
    TranscodeFailed { input: PathBuf, message: String },
}

impl Error {
    /// Benign outcomes that leave a folder untouched on purpose.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Error::MetadataNotFound(_)
                | Error::MetadataIncomplete(_)
                | Error::NoCandidates { .. }
                | Error::UploaderMismatch { .. }
                | Error::AlreadyExists(_)
        )
    }
}

/// Result type alias for songvid operations
pub type Result<T> = std::result::Result<T, Error>;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{SearchCandidate, VideoProbe};

/// Which search result to try. Only one candidate is ever attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// The provider's last result.
    #[default]
    Last,
    /// The provider's first result.
    First,
}

impl SelectionPolicy {
    pub fn select<'a>(&self, candidates: &'a [SearchCandidate]) -> Option<&'a SearchCandidate> {
        match self {
            SelectionPolicy::Last => candidates.last(),
            SelectionPolicy::First => candidates.first(),
        }
    }
}

/// Case-insensitive substring test of the artist within the uploader name.
pub fn uploader_matches(uploader: &str, artist: &str) -> bool {
    uploader.to_lowercase().contains(&artist.to_lowercase())
}

/// Accept a probed video only when its publisher contains the artist.
/// A video with no publisher name never matches.
pub fn check_uploader(probe: &VideoProbe, artist: &str) -> Result<()> {
    match probe.publisher() {
        Some(uploader) if uploader_matches(uploader, artist) => Ok(()),
        other => Err(Error::UploaderMismatch {
            uploader: other.unwrap_or("<unknown>").to_string(),
            artist: artist.to_string(),
        }),
    }
}

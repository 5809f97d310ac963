use std::fs;
use std::path::{Path, PathBuf};

use crate::core::selector;
use crate::core::transcoder::Transcoder;
use crate::error::{Error, Result};
use crate::models::FetchResult;
use crate::sources::VideoSource;

/// Final artifact name; its presence marks a folder as done.
pub const FINAL_VIDEO: &str = "video.webm";
/// Stem of the raw download. The extension is whatever the provider serves.
pub const DOWNLOAD_STEM: &str = "video_download";

pub fn final_video_path(dir: &Path) -> PathBuf {
    dir.join(FINAL_VIDEO)
}

/// `AlreadyExists` when the folder already holds the final video.
pub fn ensure_not_fetched(dir: &Path) -> Result<()> {
    let path = final_video_path(dir);
    if path.exists() {
        return Err(Error::AlreadyExists(path));
    }
    Ok(())
}

/// Drives probe → match check → download → transcode for one folder.
pub struct FetchOrchestrator<'a> {
    source: &'a dyn VideoSource,
    transcoder: &'a dyn Transcoder,
}

impl<'a> FetchOrchestrator<'a> {
    pub fn new(source: &'a dyn VideoSource, transcoder: &'a dyn Transcoder) -> Self {
        Self { source, transcoder }
    }

    pub fn fetch(&self, song_dir: &Path, url: &str, artist: &str) -> FetchResult {
        match self.try_fetch(song_dir, url, artist) {
            Ok(path) => FetchResult::downloaded(&path),
            Err(e) => e.into(),
        }
    }

    fn try_fetch(&self, song_dir: &Path, url: &str, artist: &str) -> Result<PathBuf> {
        ensure_not_fetched(song_dir)?;

        let probe = self.source.probe(url)?;
        tracing::debug!(
            "Best video-only stream: format {} ({}, {})",
            probe.format_id.as_deref().unwrap_or("?"),
            probe.ext.as_deref().unwrap_or("?"),
            probe.resolution()
        );

        selector::check_uploader(&probe, artist)?;
        tracing::info!(
            "Channel matches artist (partial match): {}",
            probe.publisher().unwrap_or_default()
        );

        self.transcoder.check_available()?;

        // Re-checked right before each write into the folder.
        ensure_not_fetched(song_dir)?;
        remove_stale_downloads(song_dir)?;
        self.source.download(url, song_dir, DOWNLOAD_STEM)?;
        let downloaded =
            find_download(song_dir)?.ok_or_else(|| Error::DownloadMissing(song_dir.to_path_buf()))?;

        if let Err(e) = ensure_not_fetched(song_dir) {
            fs::remove_file(&downloaded)?;
            return Err(e);
        }

        let output = final_video_path(song_dir);
        if let Err(e) = self.transcoder.transcode(&downloaded, &output) {
            // Keep the download, drop any half-written artifact.
            if output.exists() {
                fs::remove_file(&output)?;
            }
            return Err(e);
        }

        fs::remove_file(&downloaded)?;
        tracing::info!("Conversion complete: {}", output.display());
        Ok(output)
    }
}

fn is_download_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with(&format!("{}.", DOWNLOAD_STEM)))
}

/// The finished download in `dir`, ignoring in-progress `.part`/`.ytdl` files.
fn find_download(dir: &Path) -> Result<Option<PathBuf>> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_download_artifact(&path) {
            continue;
        }
        let stem_matches = path.file_stem().and_then(|s| s.to_str()) == Some(DOWNLOAD_STEM);
        let in_progress = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("part") || ext.eq_ignore_ascii_case("ytdl"));
        if stem_matches && !in_progress {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Remove leftovers of an interrupted download.
fn remove_stale_downloads(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_download_artifact(&path) {
            tracing::debug!("Removing stale download {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

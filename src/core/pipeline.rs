use std::path::Path;

use crate::core::fetcher::{self, FetchOrchestrator};
use crate::core::metadata;
use crate::core::search;
use crate::core::selector::SelectionPolicy;
use crate::core::transcoder::Transcoder;
use crate::error::{Error, Result};
use crate::models::{FetchKind, FetchResult, FolderReport, SongRecord};
use crate::sources::VideoSource;

/// Search/selection knobs for a run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub policy: SelectionPolicy,
    pub search_results: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::default(),
            search_results: 1,
        }
    }
}

/// One folder, start to finish: metadata → search → select → fetch.
/// Holds no state between folders.
pub struct Pipeline<'a> {
    source: &'a dyn VideoSource,
    fetcher: FetchOrchestrator<'a>,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn VideoSource,
        transcoder: &'a dyn Transcoder,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            fetcher: FetchOrchestrator::new(source, transcoder),
            options,
        }
    }

    /// Never fails: every problem ends up in the report.
    pub fn process_dir(&self, dir: &Path) -> FolderReport {
        let song = match metadata::read_song(dir) {
            Ok(song) => song,
            Err(e) => {
                let result = FetchResult::from(e);
                log_result(dir, None, &result);
                return FolderReport {
                    directory: dir.to_path_buf(),
                    song: None,
                    result,
                };
            }
        };

        tracing::info!("Downloading video for {} by {}...", song.title, song.normalized_artist);

        let result = match self.select_video(&song) {
            Ok(url) => self
                .fetcher
                .fetch(&song.source_directory, &url, &song.normalized_artist),
            Err(e) => e.into(),
        };

        log_result(dir, Some(&song), &result);
        FolderReport {
            directory: dir.to_path_buf(),
            song: Some(song),
            result,
        }
    }

    fn select_video(&self, song: &SongRecord) -> Result<String> {
        // Done folders cost no network calls.
        fetcher::ensure_not_fetched(&song.source_directory)?;

        let candidates =
            search::search_candidates(self.source, song, self.options.search_results)?;
        let chosen = self
            .options
            .policy
            .select(&candidates)
            .ok_or_else(|| Error::NoCandidates {
                title: song.title.clone(),
                artist: song.normalized_artist.clone(),
            })?;

        tracing::debug!(
            "Selected {} (uploader: {})",
            chosen.url,
            chosen.uploader_name.as_deref().unwrap_or("unknown")
        );
        Ok(chosen.url.clone())
    }
}

fn log_result(dir: &Path, song: Option<&SongRecord>, result: &FetchResult) {
    let reason = result.reason.as_deref().unwrap_or_default();
    match (result.kind, song) {
        (FetchKind::Downloaded, Some(song)) => {
            tracing::info!("Downloaded video for {} by {}.", song.title, song.normalized_artist)
        }
        (FetchKind::AlreadyExists, Some(song)) => {
            tracing::info!("Video already exists for {}. Skipping download.", song.title)
        }
        (FetchKind::Skipped, Some(song)) => {
            tracing::warn!("{} - {}: {}. Skipping...", song.normalized_artist, song.title, reason)
        }
        (FetchKind::Skipped, None) => tracing::info!("{}. Skipping...", reason),
        (FetchKind::Failed, Some(song)) => {
            tracing::error!("Error downloading video for {}: {}", song.summary(), reason)
        }
        (kind, _) => tracing::error!("{}: {} ({})", dir.display(), reason, kind.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{FakeSource, FakeTranscoder};
    use std::fs;
    use tempfile::TempDir;

    fn song_dir(ini: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("song.ini"), ini).unwrap();
        dir
    }

    const FOO_BAR: &str = "[song]\nname=Foo\nartist=Bar (Live)\n";

    #[test]
    fn test_end_to_end_matching_uploader() {
        let dir = song_dir(FOO_BAR);
        let source = FakeSource::with_uploader("Bar Official");
        let transcoder = FakeTranscoder::working();
        let pipeline = Pipeline::new(&source, &transcoder, PipelineOptions::default());

        let report = pipeline.process_dir(dir.path());

        assert!(report.result.succeeded());
        assert_eq!(report.song.unwrap().normalized_artist, "Bar");
        assert_eq!(
            source.last_query.borrow().as_deref(),
            Some("Foo Bar music video")
        );
        assert!(dir.path().join("video.webm").exists());
        assert!(!dir.path().join("video_download.mp4").exists());
    }

    #[test]
    fn test_end_to_end_uploader_mismatch() {
        let dir = song_dir(FOO_BAR);
        let source = FakeSource::with_uploader("Someone Else");
        let transcoder = FakeTranscoder::working();
        let pipeline = Pipeline::new(&source, &transcoder, PipelineOptions::default());

        let report = pipeline.process_dir(dir.path());

        assert_eq!(report.result.kind, FetchKind::Skipped);
        assert!(report.result.reason.unwrap().contains("does not contain the artist 'Bar'"));
        assert_eq!(source.download_calls(), 0);
        assert!(!dir.path().join("video.webm").exists());
    }

    #[test]
    fn test_no_results_skips_fetch() {
        let dir = song_dir(FOO_BAR);
        let mut source = FakeSource::with_uploader("Bar Official");
        source.candidates.clear();
        let transcoder = FakeTranscoder::working();
        let pipeline = Pipeline::new(&source, &transcoder, PipelineOptions::default());

        let report = pipeline.process_dir(dir.path());

        assert_eq!(report.result.kind, FetchKind::Skipped);
        assert_eq!(report.result.reason.as_deref(), Some("No results found for Foo by Bar"));
        assert_eq!(source.search_calls(), 1);
        assert_eq!(source.probe_calls(), 0);
        assert_eq!(source.download_calls(), 0);
    }

    #[test]
    fn test_existing_video_costs_no_search() {
        let dir = song_dir(FOO_BAR);
        fs::write(dir.path().join("video.webm"), "done").unwrap();
        let source = FakeSource::with_uploader("Bar Official");
        let transcoder = FakeTranscoder::working();
        let pipeline = Pipeline::new(&source, &transcoder, PipelineOptions::default());

        let report = pipeline.process_dir(dir.path());

        assert_eq!(report.result.kind, FetchKind::AlreadyExists);
        assert_eq!(source.network_calls(), 0);
    }

    #[test]
    fn test_search_failure_is_recoverable() {
        let dir = song_dir(FOO_BAR);
        let mut source = FakeSource::with_uploader("Bar Official");
        source.search_error = true;
        let transcoder = FakeTranscoder::working();
        let pipeline = Pipeline::new(&source, &transcoder, PipelineOptions::default());

        let report = pipeline.process_dir(dir.path());

        assert_eq!(report.result.kind, FetchKind::Failed);
        assert!(report.song.is_some());
    }

    #[test]
    fn test_incomplete_metadata() {
        let dir = song_dir("[song]\nname=Foo\n");
        let source = FakeSource::with_uploader("Bar Official");
        let transcoder = FakeTranscoder::working();
        let pipeline = Pipeline::new(&source, &transcoder, PipelineOptions::default());

        let report = pipeline.process_dir(dir.path());

        assert_eq!(report.result.kind, FetchKind::Skipped);
        assert!(report.song.is_none());
        assert_eq!(source.network_calls(), 0);
    }

    #[test]
    fn test_first_policy_uses_first_candidate() {
        let dir = song_dir(FOO_BAR);
        let mut source = FakeSource::with_uploader("Bar Official");
        source.candidates.push(crate::models::SearchCandidate {
            url: "https://www.youtube.com/watch?v=zzz".to_string(),
            uploader_name: None,
        });
        let transcoder = FakeTranscoder::working();
        let options = PipelineOptions {
            policy: SelectionPolicy::First,
            search_results: 5,
        };
        let pipeline = Pipeline::new(&source, &transcoder, options);

        assert_eq!(
            pipeline.select_video(&metadata::read_song(dir.path()).unwrap()).unwrap(),
            "https://www.youtube.com/watch?v=aaa"
        );
        assert_eq!(
            Pipeline::new(&source, &transcoder, PipelineOptions::default())
                .select_video(&metadata::read_song(dir.path()).unwrap())
                .unwrap(),
            "https://www.youtube.com/watch?v=zzz"
        );
    }
}

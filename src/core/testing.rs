//! In-memory stand-ins for yt-dlp and ffmpeg used by the pipeline tests.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;

use crate::core::transcoder::Transcoder;
use crate::error::{Error, Result};
use crate::models::{SearchCandidate, VideoProbe};
use crate::sources::VideoSource;

pub struct FakeSource {
    pub candidates: Vec<SearchCandidate>,
    pub probe: VideoProbe,
    pub search_error: bool,
    pub last_query: RefCell<Option<String>>,
    search_calls: Cell<usize>,
    probe_calls: Cell<usize>,
    download_calls: Cell<usize>,
}

impl FakeSource {
    pub fn with_uploader(uploader: &str) -> Self {
        Self {
            candidates: vec![SearchCandidate {
                url: "https://www.youtube.com/watch?v=aaa".to_string(),
                uploader_name: Some(uploader.to_string()),
            }],
            probe: VideoProbe {
                uploader: Some(uploader.to_string()),
                format_id: Some("137".to_string()),
                ext: Some("mp4".to_string()),
                width: Some(1920),
                height: Some(1080),
                ..Default::default()
            },
            search_error: false,
            last_query: RefCell::new(None),
            search_calls: Cell::new(0),
            probe_calls: Cell::new(0),
            download_calls: Cell::new(0),
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.get()
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.get()
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.get()
    }

    pub fn network_calls(&self) -> usize {
        self.search_calls() + self.probe_calls() + self.download_calls()
    }
}

impl VideoSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchCandidate>> {
        self.search_calls.set(self.search_calls.get() + 1);
        *self.last_query.borrow_mut() = Some(query.to_string());
        if self.search_error {
            return Err(Error::ToolFailed {
                tool: "yt-dlp",
                message: "exit status: 1: ERROR: unable to connect".to_string(),
            });
        }
        Ok(self.candidates.clone())
    }

    fn probe(&self, _url: &str) -> Result<VideoProbe> {
        self.probe_calls.set(self.probe_calls.get() + 1);
        Ok(self.probe.clone())
    }

    fn download(&self, _url: &str, dir: &Path, stem: &str) -> Result<()> {
        self.download_calls.set(self.download_calls.get() + 1);
        fs::write(dir.join(format!("{}.mp4", stem)), b"raw video")?;
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Working,
    Failing,
    Missing,
}

pub struct FakeTranscoder {
    behavior: Behavior,
    calls: Cell<usize>,
}

impl FakeTranscoder {
    pub fn working() -> Self {
        Self::new(Behavior::Working)
    }

    /// Writes a partial output, then reports a non-zero exit.
    pub fn failing() -> Self {
        Self::new(Behavior::Failing)
    }

    pub fn missing() -> Self {
        Self::new(Behavior::Missing)
    }

    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Transcoder for FakeTranscoder {
    fn check_available(&self) -> Result<()> {
        match self.behavior {
            Behavior::Missing => Err(Error::ToolMissing("ffmpeg")),
            _ => Ok(()),
        }
    }

    fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        self.check_available()?;
        if self.behavior == Behavior::Failing {
            fs::write(output, b"partial")?;
            return Err(Error::TranscodeFailed {
                input: input.to_path_buf(),
                message: "exit status: 1".to_string(),
            });
        }
        fs::write(output, b"webm")?;
        Ok(())
    }
}

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::core::tools;
use crate::error::{Error, Result};

const TOOL: &str = "ffmpeg";

/// Video-only encode settings for the final artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeSettings {
    pub codec: String,
    pub crf: u32,
    pub bitrate: String,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            codec: "libvpx".to_string(),
            crf: 10,
            bitrate: "1M".to_string(),
        }
    }
}

impl TranscodeSettings {
    /// ffmpeg arguments; audio is always dropped.
    pub fn ffmpeg_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
            .iter()
            .map(|a| OsString::from(*a))
            .collect();
        args.push(input.as_os_str().to_os_string());
        for arg in [
            "-c:v",
            self.codec.as_str(),
            "-crf",
            &self.crf.to_string(),
            "-b:v",
            self.bitrate.as_str(),
            "-an",
        ] {
            args.push(arg.into());
        }
        args.push(output.as_os_str().to_os_string());
        args
    }
}

pub trait Transcoder {
    /// Fails with `ToolMissing` when the transcoder can't be run at all.
    fn check_available(&self) -> Result<()>;
    fn transcode(&self, input: &Path, output: &Path) -> Result<()>;
}

pub struct FfmpegTranscoder {
    configured: Option<PathBuf>,
    settings: TranscodeSettings,
}

impl FfmpegTranscoder {
    pub fn new(configured: Option<PathBuf>, settings: TranscodeSettings) -> Self {
        Self {
            configured,
            settings,
        }
    }
}

impl Transcoder for FfmpegTranscoder {
    fn check_available(&self) -> Result<()> {
        tools::locate_tool(TOOL, self.configured.as_deref()).map(|_| ())
    }

    fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        let program = tools::locate_tool(TOOL, self.configured.as_deref())?;
        tracing::info!(
            "Converting {} to {} using {}",
            input.display(),
            output.display(),
            program.display()
        );

        let result = Command::new(&program)
            .args(self.settings.ffmpeg_args(input, output))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ToolMissing(TOOL)
                } else {
                    Error::Io(e)
                }
            })?;

        if !result.status.success() {
            return Err(Error::TranscodeFailed {
                input: input.to_path_buf(),
                message: tools::failure_message(result.status, &result.stderr),
            });
        }
        Ok(())
    }
}

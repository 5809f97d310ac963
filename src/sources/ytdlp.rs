use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::core::tools;
use crate::error::{Error, Result};
use crate::models::{SearchCandidate, VideoProbe};
use crate::sources::VideoSource;

const TOOL: &str = "yt-dlp";
const VIDEO_ONLY_FORMAT: &str = "bestvideo";

/// yt-dlp 서브프로세스 클라이언트.
/// 실행 파일 경로는 호출할 때마다 찾으므로, 없으면 곡 단위 오류로 끝난다.
pub struct YtDlp {
    configured: Option<PathBuf>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    entries: Vec<FlatEntry>,
}

#[derive(Deserialize)]
struct FlatEntry {
    id: Option<String>,
    url: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
}

#[derive(Deserialize)]
struct ProbeResponse {
    uploader: Option<String>,
    channel: Option<String>,
    format_id: Option<String>,
    ext: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl YtDlp {
    pub fn new(configured: Option<PathBuf>) -> Self {
        Self { configured }
    }

    fn run(&self, args: &[OsString]) -> Result<String> {
        let program = tools::locate_tool(TOOL, self.configured.as_deref())?;
        tracing::debug!("{} {:?}", program.display(), args);

        let output = Command::new(&program).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ToolMissing(TOOL)
            } else {
                Error::Io(e)
            }
        })?;

        if !output.status.success() {
            return Err(Error::ToolFailed {
                tool: TOOL,
                message: tools::failure_message(output.status, &output.stderr),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// `--flat-playlist` 검색 결과 JSON을 후보 목록으로 변환한다.
    pub fn parse_search_output(json: &str) -> Result<Vec<SearchCandidate>> {
        let resp: SearchResponse =
            serde_json::from_str(json).map_err(|source| Error::Json { tool: TOOL, source })?;

        let candidates = resp
            .entries
            .into_iter()
            .filter_map(|entry| {
                let url = entry.url.or_else(|| {
                    entry
                        .id
                        .map(|id| format!("https://www.youtube.com/watch?v={}", id))
                })?;
                Some(SearchCandidate {
                    url,
                    uploader_name: entry.uploader.or(entry.channel),
                })
            })
            .collect();

        Ok(candidates)
    }

    pub fn parse_probe_output(json: &str) -> Result<VideoProbe> {
        let resp: ProbeResponse =
            serde_json::from_str(json).map_err(|source| Error::Json { tool: TOOL, source })?;

        Ok(VideoProbe {
            uploader: resp.uploader,
            channel: resp.channel,
            format_id: resp.format_id,
            ext: resp.ext,
            width: resp.width,
            height: resp.height,
        })
    }
}

fn os_args(args: &[&str]) -> Vec<OsString> {
    args.iter().map(|a| OsString::from(*a)).collect()
}

impl VideoSource for YtDlp {
    fn name(&self) -> &str {
        "YouTube (yt-dlp)"
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchCandidate>> {
        let target = format!("ytsearch{}:{}", limit.max(1), query);
        let stdout = self.run(&os_args(&[
            "--flat-playlist",
            "--dump-single-json",
            "--no-warnings",
            "--",
            &target,
        ]))?;
        Self::parse_search_output(&stdout)
    }

    fn probe(&self, url: &str) -> Result<VideoProbe> {
        let stdout = self.run(&os_args(&[
            "--dump-single-json",
            "--no-playlist",
            "--no-warnings",
            "-f",
            VIDEO_ONLY_FORMAT,
            "--",
            url,
        ]))?;
        Self::parse_probe_output(&stdout)
    }

    fn download(&self, url: &str, dir: &Path, stem: &str) -> Result<()> {
        let template = dir.join(format!("{}.%(ext)s", stem));
        let mut args = os_args(&[
            "--no-playlist",
            "--quiet",
            "--no-warnings",
            "--no-progress",
            "-f",
            VIDEO_ONLY_FORMAT,
            "-o",
        ]);
        args.push(template.into_os_string());
        args.extend(os_args(&["--", url]));
        self.run(&args)?;
        Ok(())
    }
}

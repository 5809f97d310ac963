use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::selector::SelectionPolicy;
use crate::core::transcoder::TranscodeSettings;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub transcode: TranscodeSettings,
}

/// 외부 도구 경로. 비어 있으면 PATH와 실행 파일 디렉토리에서 찾는다.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolsConfig {
    pub ffmpeg: Option<PathBuf>,
    pub yt_dlp: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 검색 결과 요청 개수 (`ytsearch:` 기본값과 같은 1).
    pub results: usize,
    pub selection: SelectionPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results: 1,
            selection: SelectionPolicy::default(),
        }
    }
}

fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("songvid")
        .join("config.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(())
}

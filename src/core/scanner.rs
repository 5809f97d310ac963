use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::fetcher;
use crate::core::metadata;
use crate::core::pipeline::Pipeline;
use crate::error::{Error, Result};
use crate::models::{FolderReport, SongRecord};

/// 루트가 존재하는 디렉토리인지 확인한다. 실행 전체를 멈추는 유일한 오류.
pub fn validate_root(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(Error::InvalidRoot(root.to_path_buf()));
    }
    Ok(())
}

/// 루트 아래의 모든 하위 디렉토리를 재귀 탐색하여 정렬된 목록으로 반환한다.
/// 루트 자체는 포함하지 않는다. 읽을 수 없는 항목은 경고 후 건너뛴다.
pub fn song_directories(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Cannot read directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect()
}

/// 각 하위 디렉토리에 파이프라인을 독립적으로 실행한다.
/// 한 폴더의 실패는 다른 폴더 처리에 영향을 주지 않는다.
pub fn walk(root: &Path, pipeline: &Pipeline<'_>) -> Result<Vec<FolderReport>> {
    validate_root(root)?;

    let dirs = song_directories(root);
    tracing::info!("Found {} folder(s) under {}", dirs.len(), root.display());

    Ok(dirs.iter().map(|dir| pipeline.process_dir(dir)).collect())
}

/// 네트워크 없이 폴더별 song.ini 해석 결과와 영상 존재 여부.
#[derive(Debug)]
pub struct ScanEntry {
    pub directory: PathBuf,
    pub song: Result<SongRecord>,
    pub has_video: bool,
}

/// `walk`와 같은 폴더를 순회하되 메타데이터만 읽는다.
pub fn scan(root: &Path) -> Result<Vec<ScanEntry>> {
    validate_root(root)?;

    let entries = song_directories(root)
        .into_iter()
        .map(|dir| {
            let song = metadata::read_song(&dir);
            let video_dir = song
                .as_ref()
                .map(|s| s.source_directory.clone())
                .unwrap_or_else(|_| dir.clone());
            ScanEntry {
                has_video: fetcher::final_video_path(&video_dir).exists(),
                directory: dir,
                song,
            }
        })
        .collect();

    Ok(entries)
}

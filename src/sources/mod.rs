pub mod ytdlp;

use std::path::Path;

use crate::error::Result;
use crate::models::{SearchCandidate, VideoProbe};

/// 영상 검색/다운로드 소스 트레이트.
/// yt-dlp 같은 외부 다운로더를 이 트레이트로 추상화한다.
pub trait VideoSource {
    fn name(&self) -> &str;
    /// 쿼리로 검색하여 제공자 순서 그대로 최대 `limit`개의 후보를 반환한다.
    /// 미디어는 다운로드하지 않는다.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchCandidate>>;
    /// 영상 하나의 메타데이터만 조회한다 (업로더, 최고 화질 video-only 포맷).
    fn probe(&self, url: &str) -> Result<VideoProbe>;
    /// 최고 화질 video-only 스트림을 `dir`에 `stem.<ext>` 이름으로 내려받는다.
    fn download(&self, url: &str, dir: &Path, stem: &str) -> Result<()>;
}

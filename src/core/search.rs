use crate::error::Result;
use crate::models::{SearchCandidate, SongRecord};
use crate::sources::VideoSource;

/// Build the provider query for a song: `"{title} {artist} music video"`.
pub fn build_search_query(title: &str, artist: &str) -> String {
    format!("{} {} music video", title, artist)
}

/// Search `source` for a song's music video, keeping the provider's order.
/// An empty list is a valid answer; provider failures are returned as errors.
pub fn search_candidates(
    source: &dyn VideoSource,
    song: &SongRecord,
    limit: usize,
) -> Result<Vec<SearchCandidate>> {
    let query = build_search_query(&song.title, &song.normalized_artist);
    tracing::info!("Searching {} for \"{}\"", source.name(), query);

    let candidates = source.search(&query, limit)?;
    tracing::debug!("{} candidate(s) returned", candidates.len());
    Ok(candidates)
}

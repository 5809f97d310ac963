use std::sync::LazyLock;

use regex::Regex;

/// Greedy: spans from the first `(` to the last `)` on the line.
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s?\(.*\)").expect("valid regex"));

/// Remove parenthesized parts ("(feat. X)", "(Live)") from an artist name
/// and trim the result.
///
/// With several groups everything between the first `(` and the final `)`
/// goes, including any text between the groups.
pub fn clean_artist_name(artist: &str) -> String {
    PARENTHESIZED.replace_all(artist, "").trim().to_string()
}

/// Artist string used for searching and uploader matching.
/// Falls back to the trimmed raw artist when cleaning leaves nothing.
pub fn match_key(artist: &str) -> String {
    let cleaned = clean_artist_name(artist);
    if cleaned.is_empty() {
        artist.trim().to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_feature_credit() {
        assert_eq!(clean_artist_name("Artist (feat. X)"), "Artist");
    }

    #[test]
    fn test_multiple_groups_strip_greedily() {
        assert_eq!(clean_artist_name("Artist (A) (B)"), "Artist");
        assert_eq!(clean_artist_name("Artist (A) and Friends (B)"), "Artist");
    }

    #[test]
    fn test_no_parentheses_is_noop() {
        assert_eq!(clean_artist_name("Artist"), "Artist");
        assert_eq!(clean_artist_name("  Artist  "), "Artist");
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(clean_artist_name("Artist (Live"), "Artist (Live");
        assert_eq!(clean_artist_name("Artist Live)"), "Artist Live)");
    }

    #[test]
    fn test_match_key_never_empty() {
        assert_eq!(match_key("Bar (Live)"), "Bar");
        assert_eq!(match_key("(Unknown)"), "(Unknown)");
        assert_eq!(match_key(" (hide) "), "(hide)");
    }
}

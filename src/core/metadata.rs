use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::core::normalize;
use crate::error::{Error, Result};
use crate::models::SongRecord;

pub const METADATA_FILE: &str = "song.ini";
const SONG_SECTION: &str = "song";

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=\s]+)\s*=\s*(.*)$").expect("valid regex"));

/// Title and artist as written in the `[song]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongIni {
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl SongIni {
    fn is_complete(&self) -> bool {
        self.title.is_some() && self.artist.is_some()
    }
}

/// Find song.ini (case-insensitive) anywhere under `dir`.
///
/// Files of a directory are visited before its subdirectories, so the
/// shallowest match wins.
pub fn find_metadata_file(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(METADATA_FILE))
        })
        .map(|entry| entry.into_path())
}

/// Parse the `[song]` section of a song.ini.
///
/// Keys outside that section are ignored. The first non-empty `name` and
/// `artist` win; values keep everything after the `=` except surrounding
/// whitespace.
pub fn parse_metadata(text: &str) -> SongIni {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut info = SongIni::default();
    let mut in_song_section = false;

    for line in text.lines() {
        let line = line.trim();

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_song_section = header.trim().eq_ignore_ascii_case(SONG_SECTION);
            continue;
        }
        if !in_song_section {
            continue;
        }

        let Some(caps) = KEY_VALUE.captures(line) else {
            continue;
        };
        let key = &caps[1];
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }

        if key.eq_ignore_ascii_case("name") && info.title.is_none() {
            info.title = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("artist") && info.artist.is_none() {
            info.artist = Some(value.to_string());
        }

        if info.is_complete() {
            break;
        }
    }

    info
}

/// Read the song.ini under `dir` into a SongRecord.
pub fn read_song(dir: &Path) -> Result<SongRecord> {
    let ini_path = find_metadata_file(dir).ok_or_else(|| Error::MetadataNotFound(dir.to_path_buf()))?;

    // Malformed bytes are replaced rather than rejected.
    let bytes = std::fs::read(&ini_path)?;
    let text = String::from_utf8_lossy(&bytes);

    let (title, artist) = match parse_metadata(&text) {
        SongIni {
            title: Some(title),
            artist: Some(artist),
        } => (title, artist),
        _ => return Err(Error::MetadataIncomplete(ini_path)),
    };

    let source_directory = ini_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.to_path_buf());

    Ok(SongRecord {
        normalized_artist: normalize::match_key(&artist),
        title,
        artist,
        source_directory,
    })
}

//! Locating external tools (yt-dlp, ffmpeg).

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::error::{Error, Result};

/// Resolve an external tool.
///
/// Lookup order: the configured path, then `PATH`, then the directory of
/// the running executable.
pub fn locate_tool(name: &'static str, configured: Option<&Path>) -> Result<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    locate_in(name, configured, &dirs)
}

fn locate_in(name: &'static str, configured: Option<&Path>, dirs: &[PathBuf]) -> Result<PathBuf> {
    if let Some(path) = configured {
        // An explicit path that doesn't exist is an error, not a hint.
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(Error::ToolMissing(name))
        };
    }

    dirs.iter()
        .flat_map(|dir| executable_names(name).map(move |file| dir.join(file)))
        .find(|candidate| candidate.is_file())
        .ok_or(Error::ToolMissing(name))
}

fn executable_names(name: &str) -> impl Iterator<Item = String> {
    let mut names = vec![name.to_string()];
    if cfg!(target_os = "windows") {
        names.push(format!("{}.exe", name));
    }
    names.into_iter()
}

/// One-line description of a failed subprocess: exit status plus the last
/// non-empty stderr line.
pub fn failure_message(status: ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    match stderr.lines().rev().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) => format!("{}: {}", status, line),
        None => status.to_string(),
    }
}

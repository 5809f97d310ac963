use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::Input;

use crate::config::{self, Config};
use crate::core::pipeline::{Pipeline, PipelineOptions};
use crate::core::scanner;
use crate::core::selector::SelectionPolicy;
use crate::core::transcoder::FfmpegTranscoder;
use crate::models::{FetchKind, FolderReport};
use crate::sources::ytdlp::YtDlp;

#[derive(Parser)]
#[command(
    name = "songvid",
    about = "Find and download background music videos for rhythm-game song folders"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Root song directory (asked for interactively when omitted)
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Path to the ffmpeg executable
    #[arg(long, global = true, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the yt-dlp executable
    #[arg(long = "yt-dlp", global = true, value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,

    /// Number of search results to request
    #[arg(long, global = true)]
    pub results: Option<usize>,

    /// Which search result to try
    #[arg(long, global = true, value_enum)]
    pub pick: Option<SelectionPolicy>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search, download and convert videos for every song folder (default)
    Fetch {
        /// Root song directory
        directory: Option<PathBuf>,
    },
    /// List song folders and their video status without any network access
    Scan {
        /// Root song directory
        directory: Option<PathBuf>,
    },
    /// Set external tool paths
    Config,
}

impl Cli {
    /// Config file values with command-line overrides applied.
    fn effective_config(&self) -> Config {
        let mut cfg = config::load_config();
        if let Some(ref path) = self.ffmpeg {
            cfg.tools.ffmpeg = Some(path.clone());
        }
        if let Some(ref path) = self.yt_dlp {
            cfg.tools.yt_dlp = Some(path.clone());
        }
        if let Some(results) = self.results {
            cfg.search.results = results;
        }
        if let Some(pick) = self.pick {
            cfg.search.selection = pick;
        }
        cfg
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let cfg = cli.effective_config();
    match cli.command {
        Some(Commands::Fetch { directory }) => cmd_fetch(&root_directory(directory.or(cli.directory))?, &cfg),
        Some(Commands::Scan { directory }) => cmd_scan(&root_directory(directory.or(cli.directory))?),
        Some(Commands::Config) => cmd_config(),
        None => cmd_fetch(&root_directory(cli.directory)?, &cfg),
    }
}

fn root_directory(arg: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path);
    }
    let input: String = Input::new()
        .with_prompt("Enter the path to the root song directory")
        .interact_text()
        .context("Failed to read the root directory")?;
    Ok(PathBuf::from(clean_path_input(&input)))
}

/// Trim whitespace and the quotes a pasted or dragged-in path often carries.
fn clean_path_input(input: &str) -> &str {
    let trimmed = input.trim();
    ['"', '\'']
        .iter()
        .find_map(|q| trimmed.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
        .unwrap_or(trimmed)
}

fn cmd_fetch(root: &Path, cfg: &Config) -> Result<()> {
    let source = YtDlp::new(cfg.tools.yt_dlp.clone());
    let transcoder = FfmpegTranscoder::new(cfg.tools.ffmpeg.clone(), cfg.transcode.clone());
    let options = PipelineOptions {
        policy: cfg.search.selection,
        search_results: cfg.search.results.max(1),
    };
    let pipeline = Pipeline::new(&source, &transcoder, options);

    let reports = scanner::walk(root, &pipeline)?;
    print_summary(&reports);
    Ok(())
}

fn print_summary(reports: &[FolderReport]) {
    let attempted: Vec<_> = reports.iter().filter(|r| r.song.is_some()).collect();

    if !attempted.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Folder", "Song", "Result", "Detail"]);
        for report in &attempted {
            let song = report.song.as_ref().map(|s| s.summary()).unwrap_or_default();
            let detail = match (&report.result.output_path, &report.result.reason) {
                (_, Some(reason)) => reason.clone(),
                (Some(path), None) => path.display().to_string(),
                (None, None) => String::new(),
            };
            table.add_row(vec![
                Cell::new(folder_name(&report.directory)),
                Cell::new(song),
                Cell::new(report.result.kind.label()),
                Cell::new(detail),
            ]);
        }
        println!("{table}");
    }

    let count = |kind: FetchKind| reports.iter().filter(|r| r.result.kind == kind).count();
    println!(
        "\n{} folders (downloaded: {}, already present: {}, skipped: {}, failed: {})",
        reports.len(),
        count(FetchKind::Downloaded),
        count(FetchKind::AlreadyExists),
        count(FetchKind::Skipped),
        count(FetchKind::Failed),
    );
}

fn cmd_scan(root: &Path) -> Result<()> {
    let entries = scanner::scan(root)?;
    let songs: Vec<_> = entries.iter().filter(|e| e.song.is_ok()).collect();

    if songs.is_empty() {
        println!("No song folders found in {}", root.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Folder", "Title", "Artist", "Match key", "Video"]);

    for entry in &songs {
        let Ok(song) = &entry.song else { continue };
        let video = if entry.has_video { "yes" } else { "no" };
        table.add_row(vec![
            Cell::new(folder_name(&entry.directory)),
            Cell::new(&song.title),
            Cell::new(&song.artist),
            Cell::new(&song.normalized_artist),
            Cell::new(video),
        ]);
    }

    println!("{table}");
    println!(
        "\n{} song folders (with video: {}, without video: {}, incomplete song.ini: {})",
        songs.len(),
        songs.iter().filter(|e| e.has_video).count(),
        songs.iter().filter(|e| !e.has_video).count(),
        entries
            .iter()
            .filter(|e| matches!(e.song, Err(crate::error::Error::MetadataIncomplete(_))))
            .count(),
    );

    Ok(())
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_config() -> Result<()> {
    let mut cfg = config::load_config();

    println!("External tool paths");
    println!("(leave empty to look them up on PATH or next to songvid)\n");

    cfg.tools.yt_dlp = prompt_tool_path("yt-dlp", cfg.tools.yt_dlp.take())?;
    cfg.tools.ffmpeg = prompt_tool_path("ffmpeg", cfg.tools.ffmpeg.take())?;

    config::save_config(&cfg)?;
    println!("\nConfiguration saved!");
    Ok(())
}

fn prompt_tool_path(name: &str, current: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let current = current
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let input: String = Input::new()
        .with_prompt(name)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;

    let input = clean_path_input(&input);
    Ok((!input.is_empty()).then(|| PathBuf::from(input)))
}

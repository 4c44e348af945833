use std::{collections::BTreeSet, path::PathBuf};

use crate::{
    acquire::{Acquire, ResolvedSong, as_acquisition, resolve_songs, ytdlp::YtDlpAcquirer},
    config::settings::{OutputMode, ReelConfig},
    foundation::error::ReelResult,
    intake::sheet::{IntakeOptions, read_requests},
    render::ffmpeg::{RenderConfig, RenderOutputs, describe_render, render_timeline},
    timeline::builder::{Timeline, build_timeline},
};

/// Download-area name of the bumper. The `!` keeps it apart from `"<song> - <artist>"` names.
pub const BUMPER_NAME: &str = "!countdown";

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub settings_path: PathBuf,
    pub sheet_path: PathBuf,
    pub download_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Overrides `mp3_only` from the settings file.
    pub audio_only: Option<bool>,
    /// Overrides `download_jobs` from the settings file.
    pub download_jobs: Option<usize>,
    pub keep_downloads: bool,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("settings.json"),
            sheet_path: PathBuf::from("data/entry.csv"),
            download_dir: PathBuf::from("downloads"),
            out_dir: PathBuf::from("final"),
            audio_only: None,
            download_jobs: None,
            keep_downloads: false,
            dry_run: false,
        }
    }
}

/// A built timeline plus what went into it.
#[derive(Clone, Debug)]
pub struct Prepared {
    pub config: ReelConfig,
    pub songs: Vec<ResolvedSong>,
    pub timeline: Timeline,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    /// The sheet held no complete rows.
    Nothing,
    DryRun(String),
    Rendered(RenderOutputs),
}

pub fn load_config(opts: &RunOptions) -> ReelResult<ReelConfig> {
    let mut config = ReelConfig::load(&opts.settings_path)?;
    if let Some(audio_only) = opts.audio_only {
        config.settings.mode = OutputMode::from_mp3_only(audio_only);
    }
    if let Some(jobs) = opts.download_jobs {
        config.settings.download_jobs = jobs;
    }
    config.settings.validate()?;
    Ok(config)
}

/// Load, read, fetch and build. `None` when there is nothing to compose.
pub fn prepare(
    config: ReelConfig,
    opts: &RunOptions,
    acquirer: &dyn Acquire,
) -> ReelResult<Option<Prepared>> {
    let requests = read_requests(
        &opts.sheet_path,
        &IntakeOptions {
            columns: config.columns.clone(),
            mirror_marker: config.settings.mirror_marker.clone(),
        },
    )?;
    if requests.is_empty() {
        tracing::info!("no clips to process");
        return Ok(None);
    }
    tracing::info!(count = requests.len(), "read song requests");

    let bumper = acquirer
        .resolve(BUMPER_NAME, &config.settings.countdown.url)
        .map_err(|e| as_acquisition(e).for_request(BUMPER_NAME))?;
    let songs = resolve_songs(acquirer, &requests, config.settings.download_jobs)?;
    let timeline = build_timeline(&songs, &bumper, &config.settings)?;
    tracing::info!(
        segments = timeline.len(),
        duration_sec = timeline.duration_sec(),
        "timeline built"
    );

    Ok(Some(Prepared {
        config,
        songs,
        timeline,
    }))
}

/// Everything up to the built timeline, with the yt-dlp acquirer. Empty when the sheet is.
pub fn plan(opts: &RunOptions) -> ReelResult<Timeline> {
    let config = load_config(opts)?;
    let acquirer = YtDlpAcquirer::new(&opts.download_dir, config.settings.mode);
    Ok(prepare(config, opts, &acquirer)?
        .map(|prepared| prepared.timeline)
        .unwrap_or_default())
}

/// The full run with the yt-dlp acquirer.
pub fn run(opts: &RunOptions) -> ReelResult<RunOutcome> {
    let config = load_config(opts)?;
    let acquirer = YtDlpAcquirer::new(&opts.download_dir, config.settings.mode);
    run_with(config, opts, &acquirer)
}

pub fn run_with(
    config: ReelConfig,
    opts: &RunOptions,
    acquirer: &dyn Acquire,
) -> ReelResult<RunOutcome> {
    let Some(prepared) = prepare(config, opts, acquirer)? else {
        return Ok(RunOutcome::Nothing);
    };

    let render_cfg = RenderConfig::new(&opts.out_dir, prepared.config.settings.mode);
    if opts.dry_run {
        return describe_render(&prepared.timeline, &render_cfg).map(RunOutcome::DryRun);
    }

    let outputs = render_timeline(&prepared.timeline, &render_cfg)?;
    if !opts.keep_downloads {
        cleanup_downloads(&prepared.songs);
    }
    Ok(RunOutcome::Rendered(outputs))
}

/// Remove song files this tool downloaded. The bumper stays cached for the next run.
pub fn cleanup_downloads(songs: &[ResolvedSong]) {
    let owned: BTreeSet<&PathBuf> = songs
        .iter()
        .filter(|s| s.media.owned)
        .map(|s| &s.media.path)
        .collect();
    for path in owned {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed download"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), "failed to remove download: {e}"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;

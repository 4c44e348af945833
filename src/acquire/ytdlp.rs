use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    acquire::{Acquire, ResolvedMedia, probe::probe_media},
    config::settings::OutputMode,
    foundation::{
        error::{ReelError, ReelResult},
        process::{display_command, ensure_parent_dir},
    },
};

/// Fetches sources with the system `yt-dlp` binary into a flat download area.
///
/// Files are keyed by display name + mode extension, so a second run (or a repeated request)
/// reuses what is already on disk. A `source_ref` that names an existing local file is used
/// in place and never counts as owned.
#[derive(Clone, Debug)]
pub struct YtDlpAcquirer {
    download_dir: PathBuf,
    mode: OutputMode,
    program: OsString,
}

impl YtDlpAcquirer {
    pub fn new(download_dir: impl Into<PathBuf>, mode: OutputMode) -> Self {
        Self {
            download_dir: download_dir.into(),
            mode,
            program: OsString::from("yt-dlp"),
        }
    }

    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn target_path(&self, name: &str) -> PathBuf {
        self.download_dir
            .join(format!("{name}.{}", self.mode.extension()))
    }

    pub(crate) fn download_command(&self, name: &str, url: &str) -> Command {
        // yt-dlp expands `%(...)s` in the output template; a literal percent must be doubled.
        let template = self
            .download_dir
            .join(format!("{}.%(ext)s", name.replace('%', "%%")));

        let mut cmd = Command::new(&self.program);
        cmd.args(["--no-playlist", "--quiet", "--no-warnings", "--no-progress"]);
        match self.mode {
            OutputMode::Video => {
                cmd.args(["-f", "mp4"]);
            }
            OutputMode::Audio => {
                cmd.args([
                    "-f",
                    "bestaudio/best",
                    "-x",
                    "--audio-format",
                    "mp3",
                    "--audio-quality",
                    "0",
                ]);
            }
        }
        cmd.arg("-o").arg(template).arg("--").arg(url);
        cmd
    }

    fn download(&self, name: &str, url: &str, target: &Path) -> ReelResult<()> {
        ensure_parent_dir(target)?;
        let mut cmd = self.download_command(name, url);
        tracing::info!(name, "downloading");
        tracing::debug!(cmd = %display_command(&cmd));

        let out = cmd.output().map_err(|e| {
            ReelError::acquisition(format!(
                "failed to spawn yt-dlp (is it installed and on PATH?): {e}"
            ))
        })?;
        if !out.status.success() {
            return Err(ReelError::acquisition(format!(
                "yt-dlp exited with status {} for '{url}': {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        if !target.is_file() {
            return Err(ReelError::acquisition(format!(
                "yt-dlp finished but '{}' was not produced",
                target.display()
            )));
        }
        tracing::info!(name, "downloaded");
        Ok(())
    }
}

impl Acquire for YtDlpAcquirer {
    fn resolve(&self, name: &str, source_ref: &str) -> ReelResult<ResolvedMedia> {
        let local = Path::new(source_ref);
        let (path, owned) = if local.is_file() {
            tracing::debug!(name, path = %local.display(), "using local source");
            (local.to_path_buf(), false)
        } else {
            let target = self.target_path(name);
            if target.is_file() {
                tracing::debug!(name, path = %target.display(), "already downloaded");
            } else {
                self.download(name, source_ref, &target)?;
            }
            (target, true)
        };

        let info = probe_media(&path, self.mode)?;
        Ok(ResolvedMedia {
            name: name.to_string(),
            path,
            duration_sec: info.duration_sec,
            dimensions: info.dimensions,
            owned,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/acquire/ytdlp.rs"]
mod tests;

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::{
    config::settings::OutputMode,
    foundation::{
        error::{ReelError, ReelResult},
        process::{display_command, ensure_parent_dir, is_tool_on_path},
    },
    render::filtergraph::{
        AUDIO_OUT, AUDIO_SIBLING_OUT, Canvas, VIDEO_OUT, build_filter_graph,
    },
    timeline::builder::Timeline,
};

pub const OUTPUT_STEM: &str = "final_output";

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub out_dir: PathBuf,
    pub mode: OutputMode,
    pub fps: u32,
    /// Overrides the canvas taken from the first segment.
    pub canvas_size: Option<(u32, u32)>,
    pub overwrite: bool,
}

impl RenderConfig {
    pub fn new(out_dir: impl Into<PathBuf>, mode: OutputMode) -> Self {
        Self {
            out_dir: out_dir.into(),
            mode,
            fps: 30,
            canvas_size: None,
            overwrite: true,
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.fps == 0 {
            return Err(ReelError::validation("render fps must be non-zero"));
        }
        if let Some((w, h)) = self.canvas_size {
            validate_canvas(w, h)?;
        }
        Ok(())
    }

    pub fn outputs(&self) -> RenderOutputs {
        let video = (!self.mode.is_audio_only())
            .then(|| self.out_dir.join(format!("{OUTPUT_STEM}.mp4")));
        RenderOutputs {
            video,
            audio: self.out_dir.join(format!("{OUTPUT_STEM}.mp3")),
        }
    }
}

fn validate_canvas(width: u32, height: u32) -> ReelResult<()> {
    if width == 0 || height == 0 {
        return Err(ReelError::validation("canvas width/height must be non-zero"));
    }
    if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
        return Err(ReelError::validation(
            "canvas width/height must be even (required for yuv420p mp4 output)",
        ));
    }
    Ok(())
}

/// Files written by a render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutputs {
    pub video: Option<PathBuf>,
    pub audio: PathBuf,
}

/// Assemble the single ffmpeg invocation that renders `timeline`.
pub fn build_ffmpeg_command(timeline: &Timeline, cfg: &RenderConfig) -> ReelResult<Command> {
    cfg.validate()?;

    let canvas = match cfg.mode {
        OutputMode::Audio => None,
        OutputMode::Video => {
            let (width, height) = cfg
                .canvas_size
                .or_else(|| timeline.segments().first().and_then(|s| s.dimensions))
                .ok_or_else(|| {
                    ReelError::render("first segment has no video size; set a canvas explicitly")
                })?;
            validate_canvas(width, height)?;
            Some(Canvas {
                width,
                height,
                fps: cfg.fps,
            })
        }
    };
    let graph = build_filter_graph(timeline, cfg.mode, canvas)?;
    let outputs = cfg.outputs();

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-loglevel", "error"]);
    cmd.arg(if cfg.overwrite { "-y" } else { "-n" });
    for seg in timeline.segments() {
        cmd.arg("-i").arg(&seg.source);
    }
    cmd.arg("-filter_complex").arg(graph);

    let video_label = format!("[{VIDEO_OUT}]");
    let audio_label = format!("[{AUDIO_OUT}]");
    let sibling_label = format!("[{AUDIO_SIBLING_OUT}]");
    if let Some(video) = &outputs.video {
        cmd.args(["-map", video_label.as_str(), "-map", audio_label.as_str()])
            .args([
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "-b:a",
                "192k",
                "-movflags",
                "+faststart",
            ])
            .arg(video);
        cmd.args(["-map", sibling_label.as_str()]);
    } else {
        cmd.args(["-map", audio_label.as_str()]);
    }
    cmd.args(["-c:a", "libmp3lame", "-q:a", "0"])
        .arg(&outputs.audio);

    Ok(cmd)
}

/// Render `timeline` with the system `ffmpeg` binary and wait for it to finish.
#[tracing::instrument(skip_all, fields(segments = timeline.len(), mode = ?cfg.mode))]
pub fn render_timeline(timeline: &Timeline, cfg: &RenderConfig) -> ReelResult<RenderOutputs> {
    let mut cmd = build_ffmpeg_command(timeline, cfg)?;
    let outputs = cfg.outputs();

    if !cfg.overwrite {
        for path in outputs.video.iter().chain(std::iter::once(&outputs.audio)) {
            if path.exists() {
                return Err(ReelError::render(format!(
                    "output file '{}' already exists",
                    path.display()
                )));
            }
        }
    }
    ensure_parent_dir(&outputs.audio)?;

    if !is_tool_on_path("ffmpeg") {
        return Err(ReelError::render(
            "ffmpeg is required for rendering, but was not found on PATH",
        ));
    }

    if let Some(video) = &outputs.video {
        tracing::info!(path = %video.display(), "exporting final video");
    }
    tracing::info!(path = %outputs.audio.display(), "exporting final audio");
    tracing::debug!(cmd = %display_command(&cmd));

    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            ReelError::render(format!("failed to spawn ffmpeg (is it installed and on PATH?): {e}"))
        })?;
    if !output.status.success() {
        return Err(ReelError::render(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(outputs)
}

/// The command line `render_timeline` would run.
pub fn describe_render(timeline: &Timeline, cfg: &RenderConfig) -> ReelResult<String> {
    build_ffmpeg_command(timeline, cfg).map(|cmd| display_command(&cmd))
}

#[cfg(test)]
#[path = "../../tests/unit/render/ffmpeg.rs"]
mod tests;

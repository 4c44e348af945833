use std::path::Path;

use crate::{
    config::settings::OutputMode,
    foundation::error::{ReelError, ReelResult},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaInfo {
    pub duration_sec: f64,
    /// Width/height of the first video stream (video mode only).
    pub dimensions: Option<(u32, u32)>,
}

pub fn probe_media(path: &Path, mode: OutputMode) -> ReelResult<MediaInfo> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| ReelError::acquisition(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::acquisition(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(&out.stdout, mode)
        .map_err(|e| ReelError::acquisition(format!("'{}': {e}", path.display())))
}

pub(crate) fn parse_probe_json(bytes: &[u8], mode: OutputMode) -> ReelResult<MediaInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| ReelError::acquisition(format!("ffprobe json parse failed: {e}")))?;

    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));

    let dimensions = match mode {
        OutputMode::Audio => {
            if !has_audio {
                return Err(ReelError::acquisition("no audio stream found"));
            }
            None
        }
        OutputMode::Video => {
            let v = video.ok_or_else(|| ReelError::acquisition("no video stream found"))?;
            let width = v
                .width
                .ok_or_else(|| ReelError::acquisition("missing video width from ffprobe"))?;
            let height = v
                .height
                .ok_or_else(|| ReelError::acquisition("missing video height from ffprobe"))?;
            Some((width, height))
        }
    };

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or_else(|| parsed.streams.iter().find_map(|s| s.duration.as_deref()))
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| ReelError::acquisition("ffprobe reported no usable duration"))?;

    Ok(MediaInfo {
        duration_sec,
        dimensions,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/acquire/probe.rs"]
mod tests;

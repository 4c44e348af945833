use std::fmt::Write as _;

use crate::{
    config::settings::OutputMode,
    foundation::error::{ReelError, ReelResult},
    timeline::{
        builder::Timeline,
        segment::{Effect, Segment},
    },
};

pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Final stream labels produced by [`build_filter_graph`].
pub const VIDEO_OUT: &str = "vout";
pub const AUDIO_OUT: &str = "aout";
/// Second copy of the mixed audio, for the mp3 sibling of a video render.
pub const AUDIO_SIBLING_OUT: &str = "aout_mp3";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Build an ffmpeg `-filter_complex` graph for a timeline whose segment `i` is input `i`.
///
/// Each segment is trimmed, re-based to zero, effected and then shifted to its timeline start.
/// Video is stacked with `overlay` on a black canvas (later segments on top); audio is summed
/// with `amix` so overlapping segments mix rather than cut.
pub fn build_filter_graph(
    timeline: &Timeline,
    mode: OutputMode,
    canvas: Option<Canvas>,
) -> ReelResult<String> {
    if timeline.is_empty() {
        return Err(ReelError::render("cannot build a filter graph for an empty timeline"));
    }

    let mut chains = Vec::<String>::new();
    for (i, seg) in timeline.segments().iter().enumerate() {
        chains.push(audio_chain(i, seg));
    }

    let mix_inputs: String = (0..timeline.len()).map(|i| format!("[a{i}]")).collect();
    let mixed = format!(
        "{mix_inputs}amix=inputs={}:duration=longest:normalize=0",
        timeline.len()
    );

    match mode {
        OutputMode::Audio => {
            chains.push(format!("{mixed}[{AUDIO_OUT}]"));
        }
        OutputMode::Video => {
            let canvas = canvas
                .ok_or_else(|| ReelError::render("video render needs a canvas size"))?;
            for (i, seg) in timeline.segments().iter().enumerate() {
                chains.push(video_chain(i, seg, canvas));
            }
            chains.push(format!(
                "color=c=black:s={}x{}:r={}:d={}[base]",
                canvas.width,
                canvas.height,
                canvas.fps,
                secs(timeline.duration_sec())
            ));
            let mut below = "base".to_string();
            for i in 0..timeline.len() {
                let out = format!("o{i}");
                chains.push(format!("[{below}][v{i}]overlay=x=0:y=0:eof_action=pass[{out}]"));
                below = out;
            }
            chains.push(format!("[{below}]format=yuv420p[{VIDEO_OUT}]"));
            chains.push(format!(
                "{mixed},asplit=2[{AUDIO_OUT}][{AUDIO_SIBLING_OUT}]"
            ));
        }
    }

    Ok(chains.join(";"))
}

fn video_chain(i: usize, seg: &Segment, canvas: Canvas) -> String {
    let mut c = format!(
        "[{i}:v]trim=start={}:end={},setpts=PTS-STARTPTS,fps={},\
         scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1",
        secs(seg.trim.start_sec),
        secs(seg.trim.end_sec),
        canvas.fps,
        w = canvas.width,
        h = canvas.height,
    );
    let len = seg.len_sec();
    for fx in &seg.effects {
        match *fx {
            Effect::FadeIn { duration_sec } if duration_sec > 0.0 => {
                let _ = write!(c, ",fade=t=in:st=0:d={}", secs(duration_sec.min(len)));
            }
            Effect::FadeOut { duration_sec } if duration_sec > 0.0 => {
                let d = duration_sec.min(len);
                let _ = write!(c, ",fade=t=out:st={}:d={}", secs(len - d), secs(d));
            }
            Effect::Mirror => c.push_str(",hflip"),
            _ => {}
        }
    }
    let start = seg.start_sec();
    if start < 0.0 {
        let _ = write!(c, ",trim=start={},setpts=PTS-STARTPTS", secs(-start));
    }
    let _ = write!(c, ",setpts=PTS+{}/TB[v{i}]", secs(start));
    c
}

fn audio_chain(i: usize, seg: &Segment) -> String {
    let mut c = format!(
        "[{i}:a]atrim=start={}:end={},asetpts=PTS-STARTPTS",
        secs(seg.trim.start_sec),
        secs(seg.trim.end_sec),
    );
    let len = seg.len_sec();
    for fx in &seg.effects {
        match *fx {
            Effect::AudioNormalize => c.push_str(",loudnorm"),
            Effect::AudioFadeIn { duration_sec } if duration_sec > 0.0 => {
                let _ = write!(c, ",afade=t=in:st=0:d={}", secs(duration_sec.min(len)));
            }
            Effect::AudioFadeOut { duration_sec } if duration_sec > 0.0 => {
                let d = duration_sec.min(len);
                let _ = write!(c, ",afade=t=out:st={}:d={}", secs(len - d), secs(d));
            }
            _ => {}
        }
    }
    let start = seg.start_sec();
    if start < 0.0 {
        let _ = write!(c, ",atrim=start={},asetpts=PTS-STARTPTS", secs(-start));
    }
    let delay_ms = (start * 1000.0).round().max(0.0) as u64;
    let _ = write!(
        c,
        ",aresample={MIX_SAMPLE_RATE},aformat=channel_layouts=stereo,adelay={delay_ms}:all=1[a{i}]"
    );
    c
}

/// Seconds with millisecond precision and no trailing zeros (`"8"`, `"4.5"`, `"0.125"`).
fn secs(v: f64) -> String {
    let s = format!("{:.3}", v.max(0.0));
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/render/filtergraph.rs"]
mod tests;

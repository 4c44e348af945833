use crate::{
    acquire::{ResolvedMedia, ResolvedSong},
    config::settings::{OutputMode, Settings},
    foundation::error::{ReelError, ReelResult},
    timeline::segment::{Effect, Segment, SegmentRole, TrimWindow},
};

/// Pad `[requested_start, requested_end]` by `fade_margin` on both sides, clamped to the source.
pub fn padded_window(
    requested_start: f64,
    requested_end: f64,
    fade_margin: f64,
    source_duration: f64,
) -> ReelResult<TrimWindow> {
    let start_sec = (requested_start - fade_margin).max(0.0);
    let end_sec = (requested_end + fade_margin).min(source_duration);
    if end_sec <= start_sec {
        return Err(ReelError::invalid_trim_window(format!(
            "requested {requested_start}s..{requested_end}s (+/- {fade_margin}s) leaves nothing \
             of a {source_duration}s source"
        )));
    }
    Ok(TrimWindow { start_sec, end_sec })
}

/// The bumper plays exactly `[start, end)`, with `end` clamped to the source (no fade padding).
pub fn bumper_window(
    start_sec: f64,
    end_sec: Option<f64>,
    source_duration: f64,
) -> ReelResult<TrimWindow> {
    let end = end_sec.map_or(source_duration, |e| e.min(source_duration));
    if end <= start_sec {
        return Err(ReelError::invalid_trim_window(format!(
            "countdown window {start_sec}s..{end}s is empty for a {source_duration}s source"
        )));
    }
    Ok(TrimWindow {
        start_sec,
        end_sec: end,
    })
}

/// Effects for one segment.
///
/// Video mode fades picture and sound, normalizes, and flips sources that are not already
/// mirrored. Audio-only mode never touches the picture.
pub fn select_effects(mode: OutputMode, fade_sec: f64, is_mirrored: bool) -> Vec<Effect> {
    let audio = [
        Effect::AudioNormalize,
        Effect::AudioFadeIn {
            duration_sec: fade_sec,
        },
        Effect::AudioFadeOut {
            duration_sec: fade_sec,
        },
    ];
    match mode {
        OutputMode::Audio => audio.to_vec(),
        OutputMode::Video => {
            let mut fx = vec![
                Effect::FadeIn {
                    duration_sec: fade_sec,
                },
                Effect::FadeOut {
                    duration_sec: fade_sec,
                },
            ];
            fx.extend(audio);
            if !is_mirrored {
                fx.push(Effect::Mirror);
            }
            fx
        }
    }
}

pub fn trim_song(song: &ResolvedSong, settings: &Settings) -> ReelResult<Segment> {
    let req = &song.request;
    let window = padded_window(
        req.start_sec,
        req.end_sec,
        settings.fade_duration_sec,
        song.media.duration_sec,
    )?;
    tracing::debug!(
        name = %req.display_name,
        start = window.start_sec,
        end = window.end_sec,
        "trimmed song"
    );
    Ok(Segment::new(
        SegmentRole::Content,
        &req.display_name,
        &song.media.path,
        song.media.dimensions,
        window,
        select_effects(
            settings.mode,
            settings.fade_duration_sec,
            req.is_mirrored,
        ),
    ))
}

/// The bumper is never mirrored and fades with the countdown's own duration.
pub fn trim_bumper(media: &ResolvedMedia, settings: &Settings) -> ReelResult<Segment> {
    let cd = &settings.countdown;
    let window = bumper_window(cd.start_sec, cd.end_sec, media.duration_sec)?;
    Ok(Segment::new(
        SegmentRole::Bumper,
        &media.name,
        &media.path,
        media.dimensions,
        window,
        select_effects(settings.mode, cd.fade_duration_sec, true),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/trim.rs"]
mod tests;

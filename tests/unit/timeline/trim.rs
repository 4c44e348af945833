use std::path::PathBuf;

use super::*;
use crate::{
    config::settings::CountdownSettings,
    foundation::error::ErrorKind,
    intake::sheet::SongRequest,
    timeline::segment::EffectKind,
};

fn settings(mode: OutputMode) -> Settings {
    Settings {
        fade_duration_sec: 2.0,
        mode,
        countdown: CountdownSettings {
            url: "cd".to_string(),
            start_sec: 1.0,
            end_sec: Some(11.0),
            fade_duration_sec: 0.5,
            start_offset_sec: 0.0,
            end_offset_sec: 0.0,
        },
        mirror_marker: "yes".to_string(),
        download_jobs: 1,
    }
}

fn song(start: f64, end: f64, duration: f64, is_mirrored: bool) -> ResolvedSong {
    ResolvedSong {
        request: SongRequest {
            display_name: "Song - Band".to_string(),
            source_ref: "u".to_string(),
            start_sec: start,
            end_sec: end,
            is_mirrored,
        },
        media: ResolvedMedia {
            name: "Song - Band".to_string(),
            path: PathBuf::from("dl/Song - Band.mp4"),
            duration_sec: duration,
            dimensions: Some((1280, 720)),
            owned: true,
        },
    }
}

#[test]
fn pads_both_sides_by_fade_margin() {
    let w = padded_window(10.0, 20.0, 2.0, 100.0).unwrap();
    assert_eq!(w, TrimWindow { start_sec: 8.0, end_sec: 22.0 });
    assert_eq!(w.len_sec(), 14.0);
}

#[test]
fn start_is_clamped_at_zero() {
    let w = padded_window(1.0, 20.0, 2.0, 100.0).unwrap();
    assert_eq!(w.start_sec, 0.0);
}

#[test]
fn end_is_clamped_at_source_duration() {
    let w = padded_window(50.0, 100.0, 5.0, 102.0).unwrap();
    assert_eq!(w.end_sec, 102.0);
}

#[test]
fn window_outside_short_source_is_rejected() {
    let err = padded_window(5.0, 6.0, 0.0, 3.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTrimWindow);
}

#[test]
fn zero_margin_keeps_request_exactly() {
    let w = padded_window(3.0, 7.5, 0.0, 10.0).unwrap();
    assert_eq!(w, TrimWindow { start_sec: 3.0, end_sec: 7.5 });
}

#[test]
fn bumper_window_clamps_end_but_not_start() {
    assert_eq!(
        bumper_window(1.0, Some(30.0), 12.0).unwrap(),
        TrimWindow { start_sec: 1.0, end_sec: 12.0 }
    );
    assert_eq!(
        bumper_window(2.0, None, 9.0).unwrap(),
        TrimWindow { start_sec: 2.0, end_sec: 9.0 }
    );
    let err = bumper_window(10.0, Some(20.0), 8.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTrimWindow);
}

#[test]
fn video_effects_mirror_only_unmirrored_sources() {
    let flipped = select_effects(OutputMode::Video, 2.0, false);
    assert!(flipped.contains(&Effect::Mirror));
    let straight = select_effects(OutputMode::Video, 2.0, true);
    assert!(!straight.contains(&Effect::Mirror));

    for fx in [&flipped, &straight] {
        assert!(fx.contains(&Effect::FadeIn { duration_sec: 2.0 }));
        assert!(fx.contains(&Effect::FadeOut { duration_sec: 2.0 }));
        assert!(fx.contains(&Effect::AudioNormalize));
        assert!(fx.contains(&Effect::AudioFadeIn { duration_sec: 2.0 }));
        assert!(fx.contains(&Effect::AudioFadeOut { duration_sec: 2.0 }));
    }
}

#[test]
fn audio_only_never_touches_picture() {
    for is_mirrored in [true, false] {
        let fx = select_effects(OutputMode::Audio, 1.5, is_mirrored);
        assert_eq!(
            fx,
            vec![
                Effect::AudioNormalize,
                Effect::AudioFadeIn { duration_sec: 1.5 },
                Effect::AudioFadeOut { duration_sec: 1.5 },
            ]
        );
    }
}

#[test]
fn song_segment_uses_padded_window_and_request_flags() {
    let seg = trim_song(&song(10.0, 20.0, 100.0, false), &settings(OutputMode::Video)).unwrap();
    assert_eq!(seg.role, SegmentRole::Content);
    assert_eq!(seg.label, "Song - Band");
    assert_eq!(seg.trim, TrimWindow { start_sec: 8.0, end_sec: 22.0 });
    assert_eq!(seg.start_sec(), 0.0);
    assert!(seg.has_effect(EffectKind::Mirror));
    assert_eq!(seg.dimensions, Some((1280, 720)));
}

#[test]
fn song_too_short_for_request_fails() {
    let err = trim_song(&song(5.0, 6.0, 3.0, true), &settings(OutputMode::Audio)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTrimWindow);
}

#[test]
fn bumper_segment_uses_countdown_fade_and_no_mirror() {
    let media = ResolvedMedia {
        name: "!countdown".to_string(),
        path: PathBuf::from("dl/!countdown.mp4"),
        duration_sec: 8.0,
        dimensions: Some((640, 360)),
        owned: true,
    };
    let seg = trim_bumper(&media, &settings(OutputMode::Video)).unwrap();
    assert!(seg.is_bumper());
    assert_eq!(seg.trim, TrimWindow { start_sec: 1.0, end_sec: 8.0 });
    assert!(!seg.has_effect(EffectKind::Mirror));
    assert!(seg.effects.contains(&Effect::FadeIn { duration_sec: 0.5 }));
    assert!(seg.effects.contains(&Effect::AudioFadeOut { duration_sec: 0.5 }));
}

use std::path::PathBuf;

use super::*;
use crate::{
    acquire::{ResolvedMedia, ResolvedSong},
    config::settings::{CountdownSettings, Settings},
    intake::sheet::SongRequest,
    timeline::builder::build_timeline,
};

fn settings(mode: OutputMode) -> Settings {
    Settings {
        fade_duration_sec: 2.0,
        mode,
        countdown: CountdownSettings {
            url: "cd".to_string(),
            start_sec: 0.0,
            end_sec: Some(5.0),
            fade_duration_sec: 1.0,
            start_offset_sec: 1.0,
            end_offset_sec: 0.5,
        },
        mirror_marker: "yes".to_string(),
        download_jobs: 1,
    }
}

fn media(name: &str, duration_sec: f64) -> ResolvedMedia {
    ResolvedMedia {
        name: name.to_string(),
        path: PathBuf::from(format!("{name}.mp4")),
        duration_sec,
        dimensions: Some((640, 360)),
        owned: false,
    }
}

fn timeline(mode: OutputMode) -> Timeline {
    let songs = vec![
        ResolvedSong {
            request: SongRequest {
                display_name: "a".to_string(),
                source_ref: "a.mp4".to_string(),
                start_sec: 10.0,
                end_sec: 20.0,
                is_mirrored: false,
            },
            media: media("a", 100.0),
        },
        ResolvedSong {
            request: SongRequest {
                display_name: "b".to_string(),
                source_ref: "b.mp4".to_string(),
                start_sec: 10.0,
                end_sec: 20.0,
                is_mirrored: true,
            },
            media: media("b", 100.0),
        },
    ];
    build_timeline(&songs, &media("!countdown", 10.0), &settings(mode)).unwrap()
}

const CANVAS: Canvas = Canvas {
    width: 640,
    height: 360,
    fps: 30,
};

#[test]
fn seconds_are_compact() {
    assert_eq!(secs(8.0), "8");
    assert_eq!(secs(4.5), "4.5");
    assert_eq!(secs(0.125), "0.125");
    assert_eq!(secs(0.0), "0");
    assert_eq!(secs(100.0), "100");
    assert_eq!(secs(-3.0), "0");
}

#[test]
fn video_graph_places_every_segment() {
    let g = build_filter_graph(&timeline(OutputMode::Video), OutputMode::Video, Some(CANVAS))
        .unwrap();
    let chains: Vec<&str> = g.split(';').collect();

    // Song "a" (input 1): padded 8..22, starts at 4.5, mirrored with 2s fades.
    let a_video = chains.iter().find(|c| c.starts_with("[1:v]")).unwrap();
    assert!(a_video.contains("trim=start=8:end=22"));
    assert!(a_video.contains("fade=t=in:st=0:d=2"));
    assert!(a_video.contains("fade=t=out:st=12:d=2"));
    assert!(a_video.contains("hflip"));
    assert!(a_video.ends_with("setpts=PTS+4.5/TB[v1]"));

    let b_video = chains.iter().find(|c| c.starts_with("[3:v]")).unwrap();
    assert!(!b_video.contains("hflip"));

    let a_audio = chains.iter().find(|c| c.starts_with("[1:a]")).unwrap();
    assert!(a_audio.contains("atrim=start=8:end=22"));
    assert!(a_audio.contains("loudnorm"));
    assert!(a_audio.contains("afade=t=in:st=0:d=2"));
    assert!(a_audio.contains("adelay=4500:all=1[a1]"));

    // Bumper fades with its own duration.
    let bumper = chains.iter().find(|c| c.starts_with("[0:v]")).unwrap();
    assert!(bumper.contains("fade=t=out:st=4:d=1"));

    assert!(g.contains("color=c=black:s=640x360:r=30:d=36[base]"));
    assert!(g.contains("[base][v0]overlay"));
    assert!(g.contains("[o3]format=yuv420p[vout]"));
    assert!(g.contains("[a0][a1][a2][a3]amix=inputs=4:duration=longest:normalize=0"));
    assert!(g.contains("asplit=2[aout][aout_mp3]"));
}

#[test]
fn audio_graph_has_no_video_chains() {
    let g = build_filter_graph(&timeline(OutputMode::Audio), OutputMode::Audio, None).unwrap();
    assert!(!g.contains(":v]"));
    assert!(!g.contains("overlay"));
    assert!(!g.contains("asplit"));
    assert!(g.ends_with("amix=inputs=4:duration=longest:normalize=0[aout]"));
}

#[test]
fn video_graph_requires_canvas() {
    assert!(build_filter_graph(&timeline(OutputMode::Video), OutputMode::Video, None).is_err());
}

#[test]
fn empty_timeline_is_rejected() {
    assert!(build_filter_graph(&Timeline::default(), OutputMode::Audio, None).is_err());
}

#[test]
fn segment_before_origin_loses_its_head() {
    let mut s = settings(OutputMode::Video);
    // 5s bumper, 6s end offset: song "a" starts at -1s.
    s.countdown.end_offset_sec = 6.0;
    let song = ResolvedSong {
        request: SongRequest {
            display_name: "a".to_string(),
            source_ref: "a.mp4".to_string(),
            start_sec: 10.0,
            end_sec: 20.0,
            is_mirrored: true,
        },
        media: media("a", 100.0),
    };
    let tl = build_timeline(&[song], &media("!countdown", 10.0), &s).unwrap();
    assert_eq!(tl.segments()[1].start_sec(), -1.0);

    let g = build_filter_graph(&tl, OutputMode::Video, Some(CANVAS)).unwrap();
    let chains: Vec<&str> = g.split(';').collect();
    let video = chains.iter().find(|c| c.starts_with("[1:v]")).unwrap();
    assert!(video.ends_with("trim=start=1,setpts=PTS-STARTPTS,setpts=PTS+0/TB[v1]"));
    let audio = chains.iter().find(|c| c.starts_with("[1:a]")).unwrap();
    assert!(audio.contains("atrim=start=1,asetpts=PTS-STARTPTS,aresample="));
    assert!(audio.ends_with("adelay=0:all=1[a1]"));
}

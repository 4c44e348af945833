use super::*;

fn args(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().to_string())
        .collect()
}

#[test]
fn target_path_uses_mode_extension() {
    let video = YtDlpAcquirer::new("downloads", OutputMode::Video);
    assert_eq!(
        video.target_path("Song - Band"),
        PathBuf::from("downloads").join("Song - Band.mp4")
    );
    let audio = YtDlpAcquirer::new("downloads", OutputMode::Audio);
    assert_eq!(
        audio.target_path("!countdown"),
        PathBuf::from("downloads").join("!countdown.mp3")
    );
}

#[test]
fn video_download_requests_mp4() {
    let acq = YtDlpAcquirer::new("dl", OutputMode::Video);
    let a = args(&acq.download_command("Song", "https://v/x"));
    assert!(a.windows(2).any(|w| w == ["-f", "mp4"]));
    assert!(!a.iter().any(|s| s == "-x"));
    assert_eq!(a.last().map(String::as_str), Some("https://v/x"));
    assert_eq!(a[a.len() - 2], "--");
}

#[test]
fn audio_download_extracts_mp3() {
    let acq = YtDlpAcquirer::new("dl", OutputMode::Audio);
    let a = args(&acq.download_command("Song", "https://v/x"));
    assert!(a.iter().any(|s| s == "-x"));
    assert!(a.windows(2).any(|w| w == ["--audio-format", "mp3"]));
}

#[test]
fn output_template_escapes_percent() {
    let acq = YtDlpAcquirer::new("dl", OutputMode::Video);
    let a = args(&acq.download_command("100% Pure", "u"));
    let idx = a.iter().position(|s| s == "-o").unwrap();
    assert!(a[idx + 1].ends_with("100%% Pure.%(ext)s"));
}

#[test]
fn missing_downloader_surfaces_acquisition_error() {
    let tmp = std::env::temp_dir().join(format!(
        "reelcut_ytdlp_missing_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let acq = YtDlpAcquirer::new(&tmp, OutputMode::Video)
        .with_program("reelcut-definitely-not-a-real-tool");
    let err = acq.resolve("Song", "https://v/x").unwrap_err();
    assert_eq!(
        err.kind(),
        crate::foundation::error::ErrorKind::AcquisitionPropagated
    );
    std::fs::remove_dir_all(&tmp).ok();
}

use super::*;

#[test]
fn display_command_quotes_only_when_needed() {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-i", "downloads/Song - Band.mp4", "it's"]);
    assert_eq!(
        display_command(&cmd),
        r"ffmpeg -y -i 'downloads/Song - Band.mp4' 'it'\''s'"
    );
}

#[test]
fn missing_tool_is_not_on_path() {
    assert!(!is_tool_on_path("reelcut-definitely-not-a-real-tool"));
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    ensure_parent_dir(Path::new("out.mp4")).unwrap();
}

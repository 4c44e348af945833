//! reelcut assembles one continuous reel from a sheet of song clips, with a countdown
//! bumper in front of every song.
//!
//! # Pipeline overview
//!
//! 1. **Intake**: sheet rows -> [`SongRequest`]s (stops at the first incomplete row)
//! 2. **Acquire**: each request -> a local file + real duration ([`ResolvedMedia`])
//! 3. **Compose**: trim, pick effects and place every segment ([`build_timeline`] -> [`Timeline`])
//! 4. **Render**: stream the timeline through the system `ffmpeg` binary
//!
//! Composition is pure and sequential: every segment's start is chained off the end of the
//! one before it, so a single failing request aborts the whole build.
#![forbid(unsafe_code)]

mod acquire;
mod config;
mod foundation;
mod intake;
mod pipeline;
mod render;
mod timeline;

pub use acquire::probe::{MediaInfo, probe_media};
pub use acquire::ytdlp::YtDlpAcquirer;
pub use acquire::{Acquire, ResolvedMedia, ResolvedSong, resolve_songs};
pub use config::settings::{
    ColumnMap, CountdownSettings, OutputMode, ReelConfig, Settings, column_index,
};
pub use foundation::error::{ErrorKind, ReelError, ReelResult};
pub use foundation::process::{display_command, is_tool_on_path};
pub use foundation::time::{format_seconds, parse_timestamp};
pub use intake::sheet::{IntakeOptions, SongRequest, parse_requests, read_requests};
pub use pipeline::{
    BUMPER_NAME, Prepared, RunOptions, RunOutcome, cleanup_downloads, load_config, plan, prepare,
    run, run_with,
};
pub use render::ffmpeg::{
    OUTPUT_STEM, RenderConfig, RenderOutputs, build_ffmpeg_command, describe_render,
    render_timeline,
};
pub use render::filtergraph::{Canvas, build_filter_graph};
pub use timeline::builder::{Timeline, build_timeline};
pub use timeline::bumper::BumperTemplate;
pub use timeline::segment::{Effect, EffectKind, Segment, SegmentRole, TrimWindow};
pub use timeline::trim::{bumper_window, padded_window, select_effects, trim_bumper, trim_song};

pub mod ffmpeg;
pub mod filtergraph;

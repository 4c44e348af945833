use std::path::Path;

use crate::foundation::{
    error::{ReelError, ReelResult},
    time::parse_timestamp,
};

/// Whether the reel is rendered as video (+ an mp3 sibling) or audio only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Video,
    Audio,
}

impl OutputMode {
    pub fn from_mp3_only(mp3_only: bool) -> Self {
        if mp3_only { Self::Audio } else { Self::Video }
    }

    pub fn is_audio_only(self) -> bool {
        matches!(self, Self::Audio)
    }

    /// Container extension used for downloads and the primary render.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "mp3",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CountdownSettings {
    pub url: String,
    pub start_sec: f64,
    /// `None` plays the bumper to the end of its source.
    pub end_sec: Option<f64>,
    pub fade_duration_sec: f64,
    /// Overlap subtracted when a bumper follows a song.
    pub start_offset_sec: f64,
    /// Overlap subtracted when a song follows its bumper.
    pub end_offset_sec: f64,
}

/// Process-wide, read-only settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Settings {
    pub fade_duration_sec: f64,
    pub mode: OutputMode,
    pub countdown: CountdownSettings,
    /// Cell text in the mirror column that marks a source as needing a horizontal flip.
    pub mirror_marker: String,
    pub download_jobs: usize,
}

/// 0-based column indices into the intake sheet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ColumnMap {
    pub song_name: usize,
    pub song_artist: Option<usize>,
    pub url: usize,
    pub start_ts: usize,
    pub end_ts: usize,
    pub is_mirrored: Option<usize>,
}

impl ColumnMap {
    /// Smallest row length that holds every required column.
    pub fn required_len(&self) -> usize {
        [self.song_name, self.url, self.start_ts, self.end_ts]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Everything loaded from the settings JSON file.
#[derive(Clone, Debug, PartialEq)]
pub struct ReelConfig {
    pub settings: Settings,
    pub columns: ColumnMap,
}

pub const DEFAULT_FADE_DURATION_SEC: f64 = 2.0;
pub const DEFAULT_COUNTDOWN_FADE_SEC: f64 = 1.0;
pub const DEFAULT_MIRROR_MARKER: &str = "ใช่";

impl ReelConfig {
    pub fn load(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReelError::config(format!("failed to read settings '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> ReelResult<Self> {
        let raw: RawFile = serde_json::from_str(text)
            .map_err(|e| ReelError::config(format!("settings JSON parse failed: {e}")))?;
        let cfg = Self {
            settings: raw.settings.into_settings()?,
            columns: raw.columns.into_columns()?,
        };
        cfg.settings.validate()?;
        Ok(cfg)
    }
}

impl Settings {
    pub fn validate(&self) -> ReelResult<()> {
        check_non_negative("fade_duration", self.fade_duration_sec)?;
        let cd = &self.countdown;
        if cd.url.trim().is_empty() {
            return Err(ReelError::config("countdown_url must be non-empty"));
        }
        check_non_negative("countdown_start_time", cd.start_sec)?;
        check_non_negative("countdown_fade_duration", cd.fade_duration_sec)?;
        check_non_negative("countdown_start_offset", cd.start_offset_sec)?;
        check_non_negative("countdown_end_offset", cd.end_offset_sec)?;
        if let Some(end) = cd.end_sec {
            check_non_negative("countdown_end_time", end)?;
            if end <= cd.start_sec {
                return Err(ReelError::config(format!(
                    "countdown_end_time ({end}) must be greater than countdown_start_time ({})",
                    cd.start_sec
                )));
            }
        }
        if self.download_jobs == 0 {
            return Err(ReelError::config("download_jobs must be >= 1"));
        }
        Ok(())
    }
}

fn check_non_negative(name: &str, v: f64) -> ReelResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(ReelError::config(format!(
            "{name} must be a finite, non-negative number of seconds (got {v})"
        )));
    }
    Ok(())
}

/// Convert a spreadsheet column letter (`"A"`, `"C"`, `"AA"`) into a 0-based index.
pub fn column_index(letters: &str) -> ReelResult<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(ReelError::config("column letter must be non-empty"));
    }
    let mut idx = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(ReelError::config(format!("invalid column letter '{letters}'")));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        idx = idx
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| ReelError::config(format!("column '{letters}' is out of range")))?;
    }
    Ok(idx - 1)
}

#[derive(serde::Deserialize)]
struct RawFile {
    settings: RawSettings,
    columns: RawColumns,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum SecondsValue {
    Number(f64),
    Stamp(String),
}

impl SecondsValue {
    fn to_secs(&self, field: &str) -> ReelResult<f64> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Stamp(s) => parse_timestamp(s)
                .map(|v| v as f64)
                .map_err(|e| ReelError::config(format!("{field}: {e}"))),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(default)]
struct RawSettings {
    fade_duration: SecondsValue,
    mp3_only: bool,
    countdown_url: Option<String>,
    countdown_start_time: SecondsValue,
    countdown_end_time: Option<SecondsValue>,
    countdown_fade_duration: SecondsValue,
    countdown_start_offset: SecondsValue,
    countdown_end_offset: SecondsValue,
    mirror_marker: String,
    download_jobs: usize,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            fade_duration: SecondsValue::Number(DEFAULT_FADE_DURATION_SEC),
            mp3_only: false,
            countdown_url: None,
            countdown_start_time: SecondsValue::Number(0.0),
            countdown_end_time: None,
            countdown_fade_duration: SecondsValue::Number(DEFAULT_COUNTDOWN_FADE_SEC),
            countdown_start_offset: SecondsValue::Number(0.0),
            countdown_end_offset: SecondsValue::Number(0.0),
            mirror_marker: DEFAULT_MIRROR_MARKER.to_string(),
            download_jobs: 1,
        }
    }
}

impl RawSettings {
    fn into_settings(self) -> ReelResult<Settings> {
        let url = self
            .countdown_url
            .ok_or_else(|| ReelError::config("settings.countdown_url is required"))?;
        let end_sec = match &self.countdown_end_time {
            Some(v) => Some(v.to_secs("countdown_end_time")?),
            None => None,
        };
        Ok(Settings {
            fade_duration_sec: self.fade_duration.to_secs("fade_duration")?,
            mode: OutputMode::from_mp3_only(self.mp3_only),
            countdown: CountdownSettings {
                url,
                start_sec: self.countdown_start_time.to_secs("countdown_start_time")?,
                end_sec,
                fade_duration_sec: self
                    .countdown_fade_duration
                    .to_secs("countdown_fade_duration")?,
                start_offset_sec: self
                    .countdown_start_offset
                    .to_secs("countdown_start_offset")?,
                end_offset_sec: self.countdown_end_offset.to_secs("countdown_end_offset")?,
            },
            mirror_marker: self.mirror_marker,
            download_jobs: self.download_jobs,
        })
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ColumnRef {
    Index(usize),
    Letter(String),
}

impl ColumnRef {
    fn resolve(&self) -> ReelResult<usize> {
        match self {
            Self::Index(i) => Ok(*i),
            Self::Letter(s) => column_index(s),
        }
    }
}

#[derive(serde::Deserialize)]
struct RawColumns {
    song_name: ColumnRef,
    song_artist: Option<ColumnRef>,
    url: ColumnRef,
    start_ts: ColumnRef,
    end_ts: ColumnRef,
    is_mirrored: Option<ColumnRef>,
}

impl RawColumns {
    fn into_columns(self) -> ReelResult<ColumnMap> {
        Ok(ColumnMap {
            song_name: self.song_name.resolve()?,
            song_artist: self.song_artist.as_ref().map(ColumnRef::resolve).transpose()?,
            url: self.url.resolve()?,
            start_ts: self.start_ts.resolve()?,
            end_ts: self.end_ts.resolve()?,
            is_mirrored: self.is_mirrored.as_ref().map(ColumnRef::resolve).transpose()?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;

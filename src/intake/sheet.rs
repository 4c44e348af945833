use std::{io::Read, path::Path};

use crate::{
    config::settings::ColumnMap,
    foundation::{
        error::{ReelError, ReelResult},
        time::parse_timestamp,
    },
};

/// One requested song, taken from a single sheet row.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SongRequest {
    /// `"<song> - <artist>"`, filename-safe. Also keys the download area.
    pub display_name: String,
    pub source_ref: String,
    pub start_sec: f64,
    pub end_sec: f64,
    /// `false` means the source is flipped and gets a corrective horizontal mirror.
    pub is_mirrored: bool,
}

#[derive(Clone, Debug)]
pub struct IntakeOptions {
    pub columns: ColumnMap,
    pub mirror_marker: String,
}

pub fn read_requests(path: &Path, opts: &IntakeOptions) -> ReelResult<Vec<SongRequest>> {
    let file = std::fs::File::open(path).map_err(|e| {
        ReelError::intake(format!("failed to open sheet '{}': {e}", path.display()))
    })?;
    parse_requests(file, opts)
}

/// Parse sheet rows (first row is a header) into requests.
///
/// The list ends at the first blank row or the first row missing a url, song name, start or
/// end. Rows after it are never looked at, even if they are complete.
pub fn parse_requests<R: Read>(
    mut reader: R,
    opts: &IntakeOptions,
) -> ReelResult<Vec<SongRequest>> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| ReelError::intake(format!("failed to read sheet: {e}")))?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(until_blank_row(&text).as_bytes());

    let mut out = Vec::new();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record
            .map_err(|e| ReelError::intake(format!("sheet row {}: {e}", row_idx + 2)))?;
        match request_from_record(&record, opts)? {
            Some(req) => out.push(req),
            None => {
                tracing::debug!(row = row_idx + 2, "intake stopped at incomplete row");
                break;
            }
        }
    }
    Ok(out)
}

/// The sheet text up to (not including) the first blank line after the header.
///
/// The csv reader skips empty lines, which would let rows past a gap through. Lines inside a
/// quoted field are not rows, so quotes are tracked across lines.
fn until_blank_row(text: &str) -> &str {
    let mut offset = 0;
    let mut in_quotes = false;
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        if idx > 0 && !in_quotes && line.trim().is_empty() {
            return &text[..offset];
        }
        if !line.bytes().filter(|&b| b == b'"').count().is_multiple_of(2) {
            in_quotes = !in_quotes;
        }
        offset += line.len();
    }
    text
}

fn request_from_record(
    record: &csv::StringRecord,
    opts: &IntakeOptions,
) -> ReelResult<Option<SongRequest>> {
    let cols = &opts.columns;
    if record.len() < cols.required_len() {
        return Ok(None);
    }
    let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");

    let url = cell(cols.url);
    let song = sanitize_filename::sanitize(cell(cols.song_name));
    let start = cell(cols.start_ts);
    let end = cell(cols.end_ts);
    if url.is_empty() || song.trim().is_empty() || start.is_empty() || end.is_empty() {
        return Ok(None);
    }

    let artist = cols
        .song_artist
        .map(|idx| sanitize_filename::sanitize(cell(idx)))
        .unwrap_or_default();
    let display_name = if artist.trim().is_empty() {
        song.trim().to_string()
    } else {
        format!("{song} - {artist}").trim().to_string()
    };

    let start_sec = parse_timestamp(start).map_err(|e| e.for_request(&display_name))? as f64;
    let end_sec = parse_timestamp(end).map_err(|e| e.for_request(&display_name))? as f64;
    if end_sec <= start_sec {
        return Err(ReelError::invalid_trim_window(format!(
            "requested end {end} is not after start {start}"
        ))
        .for_request(display_name));
    }

    let is_mirrored = cols
        .is_mirrored
        .and_then(|idx| record.get(idx))
        .map(|c| c.trim() != opts.mirror_marker)
        .unwrap_or(true);

    Ok(Some(SongRequest {
        display_name,
        source_ref: url.to_string(),
        start_sec,
        end_sec,
        is_mirrored,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/intake/sheet.rs"]
mod tests;

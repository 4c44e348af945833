use crate::{
    acquire::{ResolvedMedia, ResolvedSong},
    config::settings::Settings,
    foundation::{error::ReelResult, time::format_seconds},
    timeline::{bumper::BumperTemplate, segment::Segment, trim::trim_song},
};

/// Ordered, positioned segments: `[bumper, song, bumper, song, ...]`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Latest end time over all segments (overlaps can make this differ from the last end).
    pub fn duration_sec(&self) -> f64 {
        self.segments
            .iter()
            .map(Segment::end_sec)
            .fold(0.0, f64::max)
    }
}

/// Fold state: the segments so far plus where the last one ended.
#[derive(Default)]
struct Placement {
    segments: Vec<Segment>,
    previous_end: Option<f64>,
}

impl Placement {
    fn placed(&self) -> usize {
        self.segments.len()
    }

    /// Starts are placed as computed, so an offset longer than the previous segment gives a
    /// negative start. The renderer drops whatever falls before 0.
    fn append(mut self, segment: Segment) -> Self {
        self.previous_end = Some(segment.end_sec());
        self.segments.push(segment);
        self
    }

    fn previous_end(&self) -> f64 {
        self.previous_end.unwrap_or(0.0)
    }

    fn push_pair(
        self,
        template: &BumperTemplate,
        song: &ResolvedSong,
        settings: &Settings,
    ) -> ReelResult<Self> {
        let cd = &settings.countdown;

        // The opening bumper has nothing to overlap, so it stays at 0.
        let mut bumper = template.instantiate();
        if self.placed() >= 2 {
            bumper = bumper.with_start(self.previous_end() - cd.start_offset_sec);
        }
        let state = self.append(bumper);

        let content = trim_song(song, settings)
            .map_err(|e| e.for_request(&song.request.display_name))?
            .with_start(state.previous_end() - cd.end_offset_sec);
        tracing::info!(
            name = %song.request.display_name,
            at = %format_seconds(content.start_sec()),
            "finished queuing"
        );
        Ok(state.append(content))
    }
}

/// Alternate a bumper before every song and chain each start off the previous end.
///
/// An empty song list gives an empty timeline without touching the bumper. Any failure
/// aborts the whole build.
#[tracing::instrument(skip_all, fields(songs = songs.len()))]
pub fn build_timeline(
    songs: &[ResolvedSong],
    bumper: &ResolvedMedia,
    settings: &Settings,
) -> ReelResult<Timeline> {
    if songs.is_empty() {
        return Ok(Timeline::default());
    }

    let template = BumperTemplate::new(bumper, settings)?;
    tracing::debug!(
        len = %format_seconds(template.template().len_sec()),
        "bumper template ready"
    );
    let placement = songs.iter().try_fold(Placement::default(), |state, song| {
        state.push_pair(&template, song, settings)
    })?;

    Ok(Timeline {
        segments: placement.segments,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;

use crate::{
    acquire::ResolvedMedia,
    config::settings::Settings,
    foundation::error::ReelResult,
    timeline::{segment::Segment, trim::trim_bumper},
};

/// The one trimmed, effected countdown segment that every insertion point copies.
#[derive(Clone, Debug)]
pub struct BumperTemplate {
    segment: Segment,
}

impl BumperTemplate {
    pub fn new(media: &ResolvedMedia, settings: &Settings) -> ReelResult<Self> {
        let segment = trim_bumper(media, settings).map_err(|e| e.for_request(&media.name))?;
        Ok(Self { segment })
    }

    /// An independent copy, free to be positioned without affecting the template or siblings.
    pub fn instantiate(&self) -> Segment {
        self.segment.clone()
    }

    pub fn template(&self) -> &Segment {
        &self.segment
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/bumper.rs"]
mod tests;

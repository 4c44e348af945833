use std::path::PathBuf;

/// Which transform a segment carries, without its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    FadeIn,
    FadeOut,
    AudioNormalize,
    AudioFadeIn,
    AudioFadeOut,
    Mirror,
}

/// A per-segment transform, applied by the renderer in list order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    FadeIn { duration_sec: f64 },
    FadeOut { duration_sec: f64 },
    AudioNormalize,
    AudioFadeIn { duration_sec: f64 },
    AudioFadeOut { duration_sec: f64 },
    /// Horizontal flip.
    Mirror,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::FadeIn { .. } => EffectKind::FadeIn,
            Self::FadeOut { .. } => EffectKind::FadeOut,
            Self::AudioNormalize => EffectKind::AudioNormalize,
            Self::AudioFadeIn { .. } => EffectKind::AudioFadeIn,
            Self::AudioFadeOut { .. } => EffectKind::AudioFadeOut,
            Self::Mirror => EffectKind::Mirror,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentRole {
    Bumper,
    Content,
}

/// `[start_sec, end_sec)` inside a source file.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TrimWindow {
    pub start_sec: f64,
    pub end_sec: f64,
}

impl TrimWindow {
    pub fn len_sec(self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// A trimmed, effected piece of a source, positioned on the master timeline.
///
/// Everything except the timeline position is fixed at construction; the position is
/// assigned once by the builder through [`Segment::with_start`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Segment {
    pub role: SegmentRole,
    pub label: String,
    pub source: PathBuf,
    /// Source frame size, when the source has video.
    pub dimensions: Option<(u32, u32)>,
    pub trim: TrimWindow,
    pub effects: Vec<Effect>,
    start_sec: f64,
}

impl Segment {
    pub fn new(
        role: SegmentRole,
        label: impl Into<String>,
        source: impl Into<PathBuf>,
        dimensions: Option<(u32, u32)>,
        trim: TrimWindow,
        effects: Vec<Effect>,
    ) -> Self {
        Self {
            role,
            label: label.into(),
            source: source.into(),
            dimensions,
            trim,
            effects,
            start_sec: 0.0,
        }
    }

    pub fn with_start(mut self, start_sec: f64) -> Self {
        self.start_sec = start_sec;
        self
    }

    pub fn start_sec(&self) -> f64 {
        self.start_sec
    }

    pub fn end_sec(&self) -> f64 {
        self.start_sec + self.len_sec()
    }

    pub fn len_sec(&self) -> f64 {
        self.trim.len_sec()
    }

    pub fn is_bumper(&self) -> bool {
        self.role == SegmentRole::Bumper
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind() == kind)
    }
}

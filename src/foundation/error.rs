pub type ReelResult<T> = Result<T, ReelError>;

#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("invalid trim window: {0}")]
    InvalidTrimWindow(String),

    #[error("acquisition error: {0}")]
    Acquisition(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("intake error: {0}")]
    Intake(String),

    #[error("render error: {0}")]
    Render(String),

    /// Wraps any of the above with the display name of the request that caused it.
    #[error("'{name}': {source}")]
    Request {
        name: String,
        #[source]
        source: Box<ReelError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Flat classification of a [`ReelError`], looking through [`ReelError::Request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedTimestamp,
    InvalidTrimWindow,
    AcquisitionPropagated,
    Validation,
    Config,
    Intake,
    Render,
    Other,
}

impl ReelError {
    pub fn malformed_timestamp(msg: impl Into<String>) -> Self {
        Self::MalformedTimestamp(msg.into())
    }

    pub fn invalid_trim_window(msg: impl Into<String>) -> Self {
        Self::InvalidTrimWindow(msg.into())
    }

    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn intake(msg: impl Into<String>) -> Self {
        Self::Intake(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Attach a request display name. Already-attached errors keep their original name.
    pub fn for_request(self, name: impl Into<String>) -> Self {
        match self {
            Self::Request { .. } => self,
            other => Self::Request {
                name: name.into(),
                source: Box::new(other),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedTimestamp(_) => ErrorKind::MalformedTimestamp,
            Self::InvalidTrimWindow(_) => ErrorKind::InvalidTrimWindow,
            Self::Acquisition(_) => ErrorKind::AcquisitionPropagated,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
            Self::Intake(_) => ErrorKind::Intake,
            Self::Render(_) => ErrorKind::Render,
            Self::Request { source, .. } => source.kind(),
            Self::Other(_) => ErrorKind::Other,
        }
    }

    pub fn request_name(&self) -> Option<&str> {
        match self {
            Self::Request { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

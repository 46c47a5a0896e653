use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid window size {width}x{height}")]
    InvalidWindow { width: f64, height: f64 },
    #[error("malformed asset `{name}`: {reason}")]
    MalformedAsset { name: String, reason: String },
    #[error("pipe gap of {gap} does not fit a viewport {viewport_height} high")]
    PipeGapOutOfRange { viewport_height: f64, gap: f64 },
    #[error("action {0} is outside the action space")]
    InvalidAction(i64),
    #[error("environment stepped before reset")]
    NotReset,
    #[error("episode is over; call reset before stepping again")]
    EpisodeDone,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GameError {
    pub(crate) fn asset(name: &str, reason: impl Into<String>) -> Self {
        GameError::MalformedAsset {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

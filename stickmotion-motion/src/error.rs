use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("cannot resample an empty keyframe sequence")]
    EmptyKeyframes,

    #[error("target frame count must be at least 2, got {0}")]
    InvalidFrameCount(usize),

    #[error("script template `{name}` rejected: {reason}")]
    Script { name: String, reason: String },

    #[error("lua error: {0}")]
    Lua(#[from] mlua::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unable to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MotionError>;

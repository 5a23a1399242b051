use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Empty time text")]
    Empty,

    #[error("Unrecognised time text: {0:?}")]
    Malformed(String),

    #[error("Hour {hour} out of range in {text:?}")]
    HourOutOfRange { hour: u32, text: String },

    #[error("Minute {minute} out of range in {text:?}")]
    MinuteOutOfRange { minute: u32, text: String },
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Tag not found: {0}")]
    NotFound(String),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Malformed tag store: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

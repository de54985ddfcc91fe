use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("mismatch: {0}")]
    Mismatch(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("empty sample: {0}")]
    EmptySample(String),
    #[error("frame range error: {0}")]
    Range(String),
}

pub type SdfResult<T> = Result<T, SdfError>;

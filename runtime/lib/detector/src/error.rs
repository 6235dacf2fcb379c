use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectorError>;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("model has not been fitted")]
    NotFitted,

    #[error("expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("training dataset is empty")]
    EmptyDataset,

    #[error("malformed feature matrix: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

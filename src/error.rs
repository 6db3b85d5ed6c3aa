use thiserror::Error;

pub type Result<T, E = ChartError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ChartError {
  #[error("collection is empty")]
  EmptyCollection,
  #[error("no point recorded at timestamp {0}")]
  NotFound(i64),
  #[error("bucket size must be positive, got {0}")]
  InvalidBucketSize(usize),
  #[error("indicator window must be positive, got {0}")]
  InvalidWindow(usize),
  #[error("series length mismatch: expected {expected}, found {found}")]
  LengthMismatch { expected: usize, found: usize },
  #[error("malformed options: {0}")]
  MalformedOptions(String),
  #[error("render failed: {0}")]
  Render(String),
  #[error("encoding failed: {0}")]
  Encode(#[from] image::ImageError),
}

impl ChartError {
  pub fn render(e: impl std::fmt::Display) -> Self { Self::Render(e.to_string()) }
}

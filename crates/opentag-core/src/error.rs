//! Error types for `opentag-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed entity key: {0:?}")]
  MalformedKey(String),

  #[error("unknown entity type: {0:?}")]
  UnknownEntityType(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

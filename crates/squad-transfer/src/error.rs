//! Error types for the squad-transfer codecs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("CSV error: {0}")]
  Csv(#[from] ::csv::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("could not finish writing CSV: {0}")]
  Io(#[from] std::io::Error),

  #[error("CSV output is not valid UTF-8")]
  Utf8(#[from] std::string::FromUtf8Error),

  /// A key every import of this kind must carry.
  #[error("missing required field `{0}`")]
  MissingField(&'static str),

  #[error("expected a JSON object at the top level")]
  NotAnObject,

  #[error("no tournament with id {0}")]
  UnknownTournament(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

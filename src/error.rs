use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

use crate::door::identifier::Identifier;
pub type GarageResult<T> = Result<T, GarageError>;

#[derive(Debug, Error)]
pub enum GarageError {
  #[error(transparent)]
  #[cfg(feature = "arm")]
  Gpio(#[from] rppal::gpio::Error),
  #[cfg(not(feature = "arm"))]
  #[error(transparent)]
  Gpio(#[from] crate::mock_gpio::Error),
  #[error("unable to read {path:?}: {source}")]
  ConfigRead { path: PathBuf, source: std::io::Error },
  #[error(transparent)]
  ConfigParse(#[from] toml::de::Error),
  #[error("invalid relay pin {0}, expected a BCM GPIO number from 0 to 27")]
  InvalidPin(u8),
  #[error("invalid target state {0:?}")]
  InvalidTargetState(String),
  #[error("malformed command {0:?}")]
  MalformedCommand(String),
  #[error("no door configured as {0}")]
  UnknownDoor(Identifier),
  #[error("{0} is no longer running")]
  DoorClosed(Identifier),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  JoinError(#[from] JoinError),
}

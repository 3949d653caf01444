use std::time::Duration;

use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};

use super::{controller::DEFAULT_TRANSIT_DELAY, state::DefaultState};
use crate::error::GarageError;

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct DoorConfig {
  /// Label used in logs and state updates, defaults to the door's identifier
  pub name: Option<String>,

  /// The pin of the relay wired across the remote's button
  pub pin: RelayPin,

  #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
  #[serde(default)]
  /// How long the door takes to go to/from open/close, in milliseconds.
  ///
  /// Missing or zero falls back to [`DEFAULT_TRANSIT_DELAY`].
  pub transit_delay: Option<Duration>,

  /// The state the door is assumed to be in on start up
  #[serde(default)]
  pub default_state: DefaultState,
}

impl DoorConfig {
  pub fn transit_delay(&self) -> Duration {
    match self.transit_delay {
      Some(delay) if !delay.is_zero() => delay,
      _ => DEFAULT_TRANSIT_DELAY,
    }
  }
}

/// A BCM GPIO number on the Raspberry Pi header.
/// See: https://pinout.xyz/
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8")]
pub struct RelayPin(u8);

impl RelayPin {
  pub fn bcm_number(&self) -> u8 {
    self.0
  }
}

impl TryFrom<u8> for RelayPin {
  type Error = GarageError;

  fn try_from(pin: u8) -> Result<Self, Self::Error> {
    if pin <= 27 {
      Ok(RelayPin(pin))
    }
    else {
      Err(GarageError::InvalidPin(pin))
    }
  }
}

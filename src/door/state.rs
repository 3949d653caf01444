use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GarageError;

/// The state the door is asked to get to
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
  #[serde(rename = "OPEN")]
  Open,
  #[serde(rename = "CLOSED")]
  Closed,
}

impl TargetState {
  /// The state the door is in while travelling towards this target
  pub fn travel_state(self) -> CurrentState {
    match self {
      TargetState::Open => CurrentState::Opening,
      TargetState::Closed => CurrentState::Closing,
    }
  }
}

impl FromStr for TargetState {
  type Err = GarageError;

  /// Accepts the command payloads as well as the HomeKit TargetDoorState values
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "OPEN" | "0" => Ok(TargetState::Open),
      "CLOSED" | "1" => Ok(TargetState::Closed),
      _ => Err(GarageError::InvalidTargetState(s.to_owned())),
    }
  }
}

impl fmt::Display for TargetState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetState::Open => write!(f, "OPEN"),
      TargetState::Closed => write!(f, "CLOSED"),
    }
  }
}

/// What we believe the door is physically doing
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CurrentState {
  Open,
  Closed,
  Opening,
  Closing,
  /// Declared by the accessory protocol but never entered by the controller.
  /// Once in it, move requests are ignored.
  Stopped,
}

impl CurrentState {
  /// The HomeKit CurrentDoorState characteristic value
  pub fn characteristic_value(self) -> u8 {
    match self {
      CurrentState::Open => 0,
      CurrentState::Closed => 1,
      CurrentState::Opening => 2,
      CurrentState::Closing => 3,
      CurrentState::Stopped => 4,
    }
  }

  /// True if the state is opening or closing (i.e. in transit)
  pub fn is_travelling(self) -> bool {
    matches!(self, CurrentState::Opening | CurrentState::Closing)
  }
}

impl fmt::Display for CurrentState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CurrentState::Open => write!(f, "open"),
      CurrentState::Closed => write!(f, "closed"),
      CurrentState::Opening => write!(f, "opening"),
      CurrentState::Closing => write!(f, "closing"),
      CurrentState::Stopped => write!(f, "stopped"),
    }
  }
}

impl From<TargetState> for CurrentState {
  fn from(target_state: TargetState) -> Self {
    match target_state {
      TargetState::Open => CurrentState::Open,
      TargetState::Closed => CurrentState::Closed,
    }
  }
}

/// The state a door is assumed to be in when first started
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefaultState {
  #[default]
  Open,
  Close,
}

impl From<DefaultState> for CurrentState {
  fn from(default_state: DefaultState) -> Self {
    match default_state {
      DefaultState::Open => CurrentState::Open,
      DefaultState::Close => CurrentState::Closed,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_commands_and_characteristic_values() {
    assert_eq!("OPEN".parse::<TargetState>().unwrap(), TargetState::Open);
    assert_eq!("CLOSED".parse::<TargetState>().unwrap(), TargetState::Closed);
    assert_eq!("0".parse::<TargetState>().unwrap(), TargetState::Open);
    assert_eq!("1".parse::<TargetState>().unwrap(), TargetState::Closed);
  }

  #[test]
  fn rejects_anything_else() {
    for payload in ["open", "STOP", "2", ""] {
      assert!(matches!(
        payload.parse::<TargetState>(),
        Err(GarageError::InvalidTargetState(p)) if p == payload
      ));
    }
  }

  #[test]
  fn characteristic_values_match_homekit() {
    let values: Vec<u8> = [
      CurrentState::Open,
      CurrentState::Closed,
      CurrentState::Opening,
      CurrentState::Closing,
      CurrentState::Stopped,
    ]
    .into_iter()
    .map(CurrentState::characteristic_value)
    .collect();
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
  }

  #[test]
  fn default_state_maps_to_settled_state() {
    assert_eq!(CurrentState::from(DefaultState::default()), CurrentState::Open);
    assert_eq!(CurrentState::from(DefaultState::Close), CurrentState::Closed);
  }
}

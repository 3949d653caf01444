use serde::Serialize;
use tokio::sync::{mpsc, watch};

use super::{identifier::Identifier, state::CurrentState};

/// Whatever is presenting the door to the user, told about every state change as it happens
pub trait Accessory {
  fn update_current_state(&mut self, state: CurrentState);
}

/// A current state update, ready to be written out by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePublish {
  pub door: Identifier,
  pub name: String,
  pub state: CurrentState,
  /// HomeKit CurrentDoorState characteristic value
  pub value: u8,
}

impl StatePublish {
  pub fn new(door: Identifier, name: String, state: CurrentState) -> Self {
    StatePublish {
      door,
      name,
      value: state.characteristic_value(),
      state,
    }
  }
}

pub type PublishSender = mpsc::UnboundedSender<StatePublish>;
pub type PublishReceiver = mpsc::UnboundedReceiver<StatePublish>;

/// Keeps the latest state queryable and forwards every change to the publisher
#[derive(Debug)]
pub struct ChannelAccessory {
  identifier: Identifier,
  name: String,
  state_tx: watch::Sender<CurrentState>,
  publish_tx: PublishSender,
}

impl ChannelAccessory {
  pub fn new(
    identifier: Identifier,
    name: String,
    initial_state: CurrentState,
    publish_tx: PublishSender,
  ) -> (ChannelAccessory, watch::Receiver<CurrentState>) {
    let (state_tx, state_rx) = watch::channel(initial_state);
    let accessory = ChannelAccessory {
      identifier,
      name,
      state_tx,
      publish_tx,
    };
    (accessory, state_rx)
  }
}

impl Accessory for ChannelAccessory {
  fn update_current_state(&mut self, state: CurrentState) {
    self.state_tx.send_replace(state);
    let publish = StatePublish::new(self.identifier.clone(), self.name.clone(), state);
    if self.publish_tx.send(publish).is_err() {
      log::warn!("{} state publisher has gone away, dropping state {}", self.identifier, state);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn updates_watch_and_publishes() {
    let (publish_tx, mut publish_rx) = mpsc::unbounded_channel();
    let (mut accessory, state_rx) =
      ChannelAccessory::new("garage".into(), "Garage".to_owned(), CurrentState::Open, publish_tx);

    accessory.update_current_state(CurrentState::Closing);

    assert_eq!(*state_rx.borrow(), CurrentState::Closing);
    assert_eq!(
      publish_rx.try_recv().unwrap(),
      StatePublish::new("garage".into(), "Garage".to_owned(), CurrentState::Closing)
    );
  }

  #[test]
  fn serialises_state_and_characteristic_value() {
    let publish = StatePublish::new("garage".into(), "Garage".to_owned(), CurrentState::Closing);
    assert_eq!(
      serde_json::to_string(&publish).unwrap(),
      r#"{"door":"garage","name":"Garage","state":"closing","value":3}"#
    );
  }

  #[test]
  fn survives_publisher_going_away() {
    let (publish_tx, publish_rx) = mpsc::unbounded_channel();
    drop(publish_rx);
    let (mut accessory, state_rx) =
      ChannelAccessory::new("garage".into(), "Garage".to_owned(), CurrentState::Closed, publish_tx);

    accessory.update_current_state(CurrentState::Opening);
    assert_eq!(*state_rx.borrow(), CurrentState::Opening);
  }
}

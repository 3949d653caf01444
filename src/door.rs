use std::fmt;

pub use config::DoorConfig;
pub use identifier::Identifier;
use log::{debug, info, warn};
use tokio::{
  select,
  sync::{
    mpsc::{self, UnboundedReceiver, UnboundedSender},
    oneshot, watch,
  },
  task::JoinHandle,
};

use self::{
  accessory::{ChannelAccessory, PublishSender},
  controller::DoorController,
  remote::Relay,
  schedule::{FiredTimer, TokioScheduler},
  state::{CurrentState, TargetState},
};
use crate::error::{GarageError, GarageResult};

pub mod accessory;
pub mod config;
pub mod controller;
pub mod identifier;
pub mod remote;
pub mod schedule;
pub mod state;
#[cfg(test)]
mod testing;

#[derive(Debug)]
enum DoorCommand {
  Move {
    target_state: TargetState,
    reply: oneshot::Sender<CurrentState>,
  },
  Shutdown,
}

/// A door's controller, owned by the single task that feeds it commands and timers
#[derive(Debug)]
pub struct Door<R: Relay> {
  identifier: Identifier,
  controller: DoorController<R, TokioScheduler, ChannelAccessory>,
  command_rx: UnboundedReceiver<DoorCommand>,
  fired_rx: UnboundedReceiver<FiredTimer>,
}

impl<R: Relay> fmt::Display for Door<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Door ({})", self.identifier)
  }
}

impl<R: Relay + Send + 'static> Door<R> {
  pub fn with_config(
    identifier: Identifier,
    config: DoorConfig,
    relay: R,
    publish_tx: PublishSender,
  ) -> (Door<R>, DoorHandle) {
    let initial_state: CurrentState = config.default_state.into();
    let transit_delay = config.transit_delay();
    let name = config.name.unwrap_or_else(|| identifier.to_string());

    let (accessory, state_rx) =
      ChannelAccessory::new(identifier.clone(), name.clone(), initial_state, publish_tx);
    let (scheduler, fired_rx) = TokioScheduler::new();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let door = Door {
      identifier: identifier.clone(),
      controller: DoorController::new(name.clone(), initial_state, transit_delay, relay, scheduler, accessory),
      command_rx,
      fired_rx,
    };
    let handle = DoorHandle {
      identifier,
      name,
      command_tx,
      state_rx,
    };
    (door, handle)
  }

  /// Process commands and timers until shut down, or until every handle is dropped
  pub fn listen(mut self) -> JoinHandle<()> {
    info!(
      "{} listening with initial state: {}, transit delay: {:?}",
      &self,
      self.controller.current_state(),
      self.controller.transit_delay()
    );

    tokio::spawn(async move {
      loop {
        select! {
          biased;

          Some(fired) = self.fired_rx.recv() => {
            self.controller.on_timer(fired.id, fired.event);
          }

          command = self.command_rx.recv() => match command {
            Some(DoorCommand::Move { target_state, reply }) => {
              debug!("{} was commanded to move to state: {}", &self, target_state);
              let current_state = self.controller.request_move(target_state);
              // the requester may have given up waiting, the move still happened
              let _ = reply.send(current_state);
            }
            Some(DoorCommand::Shutdown) | None => break,
          },
        }
      }

      self.controller.shutdown();
      let current_state = self.controller.current_state();
      if current_state.is_travelling() {
        warn!("{} stopped while {}, the door may still be moving", &self, current_state);
      }
      else {
        info!("{} stopped in state: {}", &self, current_state);
      }
    })
  }
}

/// Cheap to clone way of talking to a running [`Door`]
#[derive(Debug, Clone)]
pub struct DoorHandle {
  identifier: Identifier,
  name: String,
  command_tx: UnboundedSender<DoorCommand>,
  state_rx: watch::Receiver<CurrentState>,
}

impl DoorHandle {
  pub fn identifier(&self) -> &Identifier {
    &self.identifier
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// The door's current state, never blocks
  pub fn current_state(&self) -> CurrentState {
    *self.state_rx.borrow()
  }

  /// Notified of every state change from now on
  pub fn subscribe(&self) -> watch::Receiver<CurrentState> {
    let mut state_rx = self.state_rx.clone();
    state_rx.borrow_and_update();
    state_rx
  }

  /// Ask the door to move, returning its state once the request has been handled
  pub async fn request_move(&self, target_state: TargetState) -> GarageResult<CurrentState> {
    let (reply, reply_rx) = oneshot::channel();
    self
      .command_tx
      .send(DoorCommand::Move { target_state, reply })
      .map_err(|_| GarageError::DoorClosed(self.identifier.clone()))?;
    reply_rx
      .await
      .map_err(|_| GarageError::DoorClosed(self.identifier.clone()))
  }

  pub fn shutdown(&self) {
    // already stopped is fine
    let _ = self.command_tx.send(DoorCommand::Shutdown);
  }
}

use std::{collections::HashMap, str::FromStr};

use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
  door::{
    accessory::{PublishSender, StatePublish},
    state::TargetState,
    DoorHandle, Identifier,
  },
  error::{GarageError, GarageResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
  Move(TargetState),
  /// Publish the door's current state
  Query,
}

/// A single line of input, i.e. `<door> OPEN|CLOSED|0|1|STATE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleCommand {
  pub door: Identifier,
  pub action: ConsoleAction,
}

impl FromStr for ConsoleCommand {
  type Err = GarageError;

  fn from_str(line: &str) -> Result<Self, Self::Err> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
      (Some(door), Some(action), None) => {
        let action = if action == "STATE" {
          ConsoleAction::Query
        }
        else {
          ConsoleAction::Move(action.parse()?)
        };
        Ok(ConsoleCommand {
          door: door.into(),
          action,
        })
      }
      _ => Err(GarageError::MalformedCommand(line.to_owned())),
    }
  }
}

fn decode_line(bytes: Vec<u8>) -> GarageResult<String> {
  String::from_utf8(bytes)
    .map_err(|err| GarageError::MalformedCommand(String::from_utf8_lossy(err.as_bytes()).into_owned()))
}

pub struct CommandReceiver {
  doors: HashMap<Identifier, DoorHandle>,
  /// Query replies go out alongside the state changes
  publish_tx: PublishSender,
}

impl CommandReceiver {
  pub fn new(doors: HashMap<Identifier, DoorHandle>, publish_tx: PublishSender) -> CommandReceiver {
    CommandReceiver { doors, publish_tx }
  }

  /// Act on every line of `input` until it ends.
  ///
  /// Bad lines, including ones that are not UTF-8, are logged and skipped. Only failing to read stops early.
  pub async fn receive_commands<I: AsyncBufRead + Unpin>(&mut self, input: I) -> GarageResult<()> {
    let mut lines = input.split(b'\n');
    while let Some(bytes) = lines.next_segment().await? {
      let handled = match decode_line(bytes) {
        Ok(line) => {
          let line = line.trim();
          if line.is_empty() || line.starts_with('#') {
            continue;
          }
          match line.parse::<ConsoleCommand>() {
            Ok(command) => self.handle(command).await,
            Err(err) => Err(err),
          }
        }
        Err(err) => Err(err),
      };
      if let Err(err) = handled {
        warn!("Ignoring command: {}", err);
      }
    }
    Ok(())
  }

  async fn handle(&mut self, command: ConsoleCommand) -> GarageResult<()> {
    let door = self
      .doors
      .get(&command.door)
      .ok_or_else(|| GarageError::UnknownDoor(command.door.clone()))?;

    match command.action {
      ConsoleAction::Move(target_state) => {
        let current_state = door.request_move(target_state).await?;
        info!(
          "{} acknowledged {}, current state: {}",
          door.identifier(),
          target_state,
          current_state
        );
      }
      ConsoleAction::Query => {
        let publish = StatePublish::new(door.identifier().clone(), door.name().to_owned(), door.current_state());
        self
          .publish_tx
          .send(publish)
          .map_err(|_| GarageError::DoorClosed(door.identifier().clone()))?;
      }
    }
    Ok(())
  }

  /// Stop every door
  pub fn shutdown(self) {
    for door in self.doors.values() {
      door.shutdown();
    }
  }
}

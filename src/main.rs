#![warn(rust_2018_idioms)]

use std::{collections::HashMap, env, path::PathBuf, process};

use relay_garage::{
  config::{Config, CONFIG_FILE},
  console::{CommandReceiver, StatePublisher},
  door::{remote::GpioRelay, Door},
  error::GarageResult,
};
use simple_logger::SimpleLogger;
use tokio::{
  self,
  io::{self, BufReader},
  sync::mpsc,
};

#[tokio::main]
async fn main() {
  SimpleLogger::new()
    .with_level(log::LevelFilter::Info)
    .env()
    .init()
    .expect("failed to initialise logger");

  if let Err(err) = run().await {
    log::error!("Error occurred, exiting: {}", err);
    process::exit(1);
  }
}

/// Start every configured door and feed them commands from stdin.
/// Runs until stdin closes unless an error occurs
async fn run() -> GarageResult<()> {
  let config_path = env::args_os()
    .nth(1)
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
  let config = Config::from_file(&config_path)?;

  let (publish_tx, publish_rx) = mpsc::unbounded_channel();

  let mut doors = HashMap::new();
  let mut listeners = Vec::new();
  for (identifier, door_config) in config.doors {
    let relay = GpioRelay::new(identifier.clone(), door_config.pin)?;
    let (door, handle) = Door::with_config(identifier.clone(), door_config, relay, publish_tx.clone());
    listeners.push(door.listen());
    doors.insert(identifier, handle);
  }

  let mut publisher = StatePublisher::new(publish_rx);
  let publish = tokio::spawn(async move { publisher.publish_states(io::stdout()).await });

  let mut receiver = CommandReceiver::new(doors, publish_tx);
  let received = receiver.receive_commands(BufReader::new(io::stdin())).await;

  // input has ended, let every door tidy up before leaving
  receiver.shutdown();
  for listener in listeners {
    listener.await?;
  }
  publish.await??;

  received
}

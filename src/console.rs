//! The host side of the doors: commands come in as lines, state updates go out as JSON lines

pub use self::{
  publisher::StatePublisher,
  receiver::{CommandReceiver, ConsoleAction, ConsoleCommand},
};

mod publisher;
mod receiver;

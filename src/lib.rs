pub mod config;
pub mod console;
pub mod door;
pub mod error;
#[cfg(not(feature = "arm"))]
mod mock_gpio;

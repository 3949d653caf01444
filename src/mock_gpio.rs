//! Mimics rppal's output API without the need to compile to ARM and use physical hardware

pub use std::fmt::Error;

pub struct Gpio;

impl Gpio {
  pub fn new() -> Result<Gpio, Error> {
    Ok(Gpio)
  }

  pub fn get(&self, pin: u8) -> Result<Pin, Error> {
    Ok(Pin(pin))
  }
}

#[derive(Debug)]
pub struct Pin(u8);

impl Pin {
  pub fn into_output(self) -> OutputPin {
    OutputPin(self.0)
  }
}

#[derive(Debug)]
pub struct OutputPin(u8);

impl OutputPin {
  pub fn set_high(&mut self) {
    log::info!("GPIO {} set to high", self.0)
  }

  pub fn set_low(&mut self) {
    log::info!("GPIO {} set to low", self.0)
  }
}

use log::debug;
#[cfg(feature = "arm")]
use rppal::gpio::{Gpio, OutputPin};

use super::{config::RelayPin, identifier::Identifier};
use crate::error::GarageResult;
#[cfg(not(feature = "arm"))]
use crate::mock_gpio::{Gpio, OutputPin};

/// The output wired to the door's remote. Setting it active holds the remote's button down.
pub trait Relay {
  fn set_level(&mut self, active: bool);
}

#[derive(Debug)]
pub struct GpioRelay {
  identifier: Identifier,
  pin: OutputPin,
}

impl GpioRelay {
  pub fn new(identifier: Identifier, pin: RelayPin) -> GarageResult<Self> {
    let gpio = Gpio::new()?;
    let pin = gpio.get(pin.bcm_number())?.into_output();

    Ok(GpioRelay { identifier, pin })
  }
}

impl Relay for GpioRelay {
  fn set_level(&mut self, active: bool) {
    if active {
      self.pin.set_high();
      debug!("{} remote pin on", self.identifier);
    }
    else {
      self.pin.set_low();
      debug!("{} remote pin off", self.identifier);
    }
  }
}

use std::{collections::HashMap, fs, path::Path, str::FromStr};

use serde::Deserialize;

use crate::{
  door,
  error::{GarageError, GarageResult},
};

/// Where the config is read from when no path is given
pub const CONFIG_FILE: &str = "garage-config.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
  /// A list of all doors to control
  pub doors: HashMap<door::Identifier, door::DoorConfig>,
}

impl Config {
  pub fn from_file(path: &Path) -> GarageResult<Config> {
    let config = fs::read_to_string(path).map_err(|source| GarageError::ConfigRead {
      path: path.to_owned(),
      source,
    })?;
    config.parse()
  }
}

impl FromStr for Config {
  type Err = GarageError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(toml::from_str(s)?)
  }
}

use crate::{
  error::{ModboardError, ModboardErrorExt, ModboardErrorType},
  settings::structs::{ClientConfig, Settings},
};
use deser_hjson::from_str;
use lazy_static::lazy_static;
use merge::Merge;
use std::{env, fs};

pub mod defaults;
pub mod structs;

static CONFIG_FILE: &str = "config/config.hjson";

lazy_static! {
  static ref SETTINGS: Settings = Settings::init().expect("Failed to load settings file");
}

impl Settings {
  /// Reads config from the file and environment.
  /// The config file is optional; values from the environment (with prefix MODBOARD) fill
  /// anything the file leaves unset, and built-in defaults fill the rest.
  fn init() -> Result<Self, ModboardError> {
    let file = Self::read_config_file().unwrap_or_else(|_| String::from("{}"));
    let mut config = from_str::<Settings>(&file)
      .with_modboard_type(ModboardErrorType::ConfigError(String::from(
        "invalid config file",
      )))?;

    // Merge with env vars
    config.merge(
      envy::prefixed("MODBOARD_")
        .from_env::<Settings>()
        .with_modboard_type(ModboardErrorType::ConfigError(String::from(
          "invalid environment variable",
        )))?,
    );

    // Merge with defaults
    config.merge(Settings::default());

    Ok(config)
  }

  /// Returns the config as a struct.
  pub fn get() -> Self {
    SETTINGS.to_owned()
  }

  pub fn get_config_location() -> String {
    env::var("MODBOARD_CONFIG_LOCATION").unwrap_or_else(|_| CONFIG_FILE.to_string())
  }

  pub fn read_config_file() -> Result<String, std::io::Error> {
    fs::read_to_string(Self::get_config_location())
  }

  pub fn store_url(&self) -> String {
    self
      .store_url
      .to_owned()
      .unwrap_or_else(|| "http://localhost:8570".into())
  }

  pub fn client(&self) -> ClientConfig {
    self.client.to_owned().unwrap_or_default()
  }

  pub fn page_size(&self) -> i64 {
    self.page_size.unwrap_or(20)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn file_values_win_over_defaults() -> Result<(), ModboardError> {
    let mut config = from_str::<Settings>(
      r#"{
        store_url: "https://reports.example.com"
        page_size: 50
      }"#,
    )
    .with_modboard_type(ModboardErrorType::ConfigError(String::from("bad test file")))?;
    config.merge(Settings::default());

    assert_eq!("https://reports.example.com", config.store_url());
    assert_eq!(50, config.page_size());
    assert_eq!(ClientConfig::default(), config.client());

    Ok(())
  }

  #[test]
  fn empty_file_falls_back_to_defaults() -> Result<(), ModboardError> {
    let mut config = from_str::<Settings>("{}")
      .with_modboard_type(ModboardErrorType::ConfigError(String::from("bad test file")))?;
    config.merge(Settings::default());

    assert_eq!("http://localhost:8570", config.store_url());
    assert_eq!(20, config.page_size());

    Ok(())
  }
}

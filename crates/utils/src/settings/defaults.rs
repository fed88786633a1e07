use crate::settings::structs::*;

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_url: Some("http://localhost:8570".into()),
      auth_token: None,
      client: Some(ClientConfig::default()),
      page_size: Some(20),
    }
  }
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      timeout: 30,
      retries: 3,
    }
  }
}

use crate::sensitive::Sensitive;
use merge::Merge;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Merge)]
pub struct Settings {
  /// Base URL of the report store, e.g. `http://localhost:8570`
  pub store_url: Option<String>,
  /// Bearer token identifying the moderator against the store
  pub auth_token: Option<Sensitive>,
  /// Settings for the HTTP client talking to the store
  pub client: Option<ClientConfig>,
  /// Default page size for report listings
  pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// Request timeout in seconds
  pub timeout: u64,
  /// How often a timed-out request is retried before giving up
  pub retries: u8,
}

use std::ops::Deref;

/// A string that must never end up in logs, such as the moderator auth token.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Sensitive(String);

impl Sensitive {
  pub fn new(string: String) -> Self {
    Sensitive(string)
  }

  pub fn into_inner(this: Self) -> String {
    this.0
  }
}

impl std::fmt::Debug for Sensitive {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Sensitive").finish()
  }
}

impl AsRef<str> for Sensitive {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl Deref for Sensitive {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl From<String> for Sensitive {
  fn from(s: String) -> Self {
    Sensitive(s)
  }
}

impl From<&str> for Sensitive {
  fn from(s: &str) -> Self {
    Sensitive(s.into())
  }
}

use serde::{Deserialize, Serialize};
use std::{backtrace::Backtrace, fmt, fmt::Debug};
use strum::{Display, EnumIter};

/// Machine-readable error kinds, serialized as `{"error": "...", "message": "..."}` on the wire.
/// The Report Store replies with the same shape, so its rejections map straight into this enum.
#[derive(Display, Debug, Serialize, Deserialize, Clone, PartialEq, Eq, EnumIter, Hash)]
#[serde(tag = "error", content = "message", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ModboardErrorType {
  CouldntListReports(String),
  CouldntResolveReport(String),
  CouldntUpdateReport(String),
  CouldntCreateReport(String),
  ReportReasonRequired,
  ReportTooLong,
  ReportAlreadyHandled,
  NoReportSelected,
  ResolveDateRequired,
  ReportStoreUnreachable(String),
  InvalidResponse(String),
  ConfigError(String),
  NotFound,
  Unknown(String),
}

impl ModboardErrorType {
  /// Human-readable form: the carried store message when there is one, the bare
  /// error code otherwise. Dialogs surface this inline.
  pub fn message(&self) -> String {
    use ModboardErrorType::*;
    match self {
      CouldntListReports(m) | CouldntResolveReport(m) | CouldntUpdateReport(m)
      | CouldntCreateReport(m) | ReportStoreUnreachable(m) | InvalidResponse(m)
      | ConfigError(m) | Unknown(m) => m.clone(),
      other => other.to_string(),
    }
  }
}

pub type ModboardResult<T> = Result<T, ModboardError>;

pub struct ModboardError {
  pub error_type: ModboardErrorType,
  pub inner: anyhow::Error,
  pub context: Backtrace,
}

impl<T> From<T> for ModboardError
where
  T: Into<anyhow::Error>,
{
  fn from(t: T) -> Self {
    let cause = t.into();
    ModboardError {
      error_type: ModboardErrorType::Unknown(format!("{}", &cause)),
      inner: cause,
      context: Backtrace::capture(),
    }
  }
}

impl Debug for ModboardError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ModboardError")
      .field("message", &self.error_type)
      .field("inner", &self.inner)
      .field("context", &self.context)
      .finish()
  }
}

impl fmt::Display for ModboardError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: ", &self.error_type)?;
    writeln!(f, "{}", self.inner)?;
    fmt::Display::fmt(&self.context, f)
  }
}

impl From<ModboardErrorType> for ModboardError {
  fn from(error_type: ModboardErrorType) -> Self {
    let inner = anyhow::anyhow!("{}", error_type);
    ModboardError {
      error_type,
      inner,
      context: Backtrace::capture(),
    }
  }
}

pub trait ModboardErrorExt<T, E: Into<anyhow::Error>> {
  fn with_modboard_type(self, error_type: ModboardErrorType) -> ModboardResult<T>;
}

impl<T, E: Into<anyhow::Error>> ModboardErrorExt<T, E> for Result<T, E> {
  fn with_modboard_type(self, error_type: ModboardErrorType) -> ModboardResult<T> {
    self.map_err(|error| ModboardError {
      error_type,
      inner: error.into(),
      context: Backtrace::capture(),
    })
  }
}

pub trait ModboardErrorExt2<T> {
  fn with_modboard_type(self, error_type: ModboardErrorType) -> ModboardResult<T>;
  fn into_anyhow(self) -> Result<T, anyhow::Error>;
}

impl<T> ModboardErrorExt2<T> for ModboardResult<T> {
  fn with_modboard_type(self, error_type: ModboardErrorType) -> ModboardResult<T> {
    self.map_err(|mut e| {
      e.error_type = error_type;
      e
    })
  }
  // this can't be an impl From because it would conflict with the blanket Into<> implementation
  fn into_anyhow(self) -> Result<T, anyhow::Error> {
    self.map_err(|e| e.inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn serializes_no_message() -> ModboardResult<()> {
    let json = serde_json::to_string(&ModboardErrorType::ReportReasonRequired)?;
    assert_eq!(&json, "{\"error\":\"report_reason_required\"}");

    Ok(())
  }

  #[test]
  fn serializes_with_message() -> ModboardResult<()> {
    let rejected = ModboardErrorType::CouldntResolveReport(String::from("already resolved"));
    let json = serde_json::to_string(&rejected)?;
    assert_eq!(
      &json,
      "{\"error\":\"couldnt_resolve_report\",\"message\":\"already resolved\"}"
    );

    Ok(())
  }

  #[test]
  fn deserializes_store_rejection() -> ModboardResult<()> {
    let parsed: ModboardErrorType =
      serde_json::from_str("{\"error\":\"report_already_handled\"}")?;
    assert_eq!(ModboardErrorType::ReportAlreadyHandled, parsed);

    Ok(())
  }

  #[test]
  fn message_prefers_carried_store_text() {
    let rejected = ModboardErrorType::CouldntResolveReport(String::from("already resolved"));
    assert_eq!("already resolved", rejected.message());
    assert_eq!("NotFound", ModboardErrorType::NotFound.message());
  }

  #[test]
  fn ext_trait_overrides_error_type() {
    let err: ModboardResult<()> = Err(ModboardError::from(ModboardErrorType::NotFound))
      .with_modboard_type(ModboardErrorType::CouldntUpdateReport(String::from("gone")));
    assert_eq!(
      ModboardErrorType::CouldntUpdateReport(String::from("gone")),
      err.expect_err("error was just constructed").error_type
    );
  }
}

use crate::{retry, ReportStore};
use async_trait::async_trait;
use modboard_api_common::{
  newtypes::ReportId,
  report::{
    check_report_reason, CreateReport, ListReportsQuery, Report, ResolveReportForm,
    UpdateReportStatus,
  },
};
use modboard_utils::{
  error::{ModboardErrorExt, ModboardErrorType, ModboardResult},
  settings::structs::Settings,
};
use reqwest::{
  header::{HeaderMap, HeaderValue, AUTHORIZATION},
  Client, Response,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Clone, Debug, Error)]
#[error("Error sending request, {0}")]
struct SendError(pub String);

/// Error body the store replies with on rejections.
#[derive(Deserialize, Debug)]
struct ErrorBody {
  error: String,
  message: Option<String>,
}

/// reqwest-backed [`ReportStore`]. Base URL, bearer token, timeout and retry count
/// come from settings.
pub struct HttpReportStore {
  client: Client,
  base_url: Url,
  retries: u8,
}

impl HttpReportStore {
  pub fn new(settings: &Settings) -> ModboardResult<Self> {
    let config = settings.client();

    let mut headers = HeaderMap::new();
    if let Some(token) = &settings.auth_token {
      let value = HeaderValue::from_str(&format!("Bearer {}", token.as_ref()))
        .with_modboard_type(ModboardErrorType::ConfigError(String::from(
          "auth token is not a valid header value",
        )))?;
      headers.insert(AUTHORIZATION, value);
    }

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout))
      .default_headers(headers)
      .build()
      .with_modboard_type(ModboardErrorType::ConfigError(String::from(
        "could not build http client",
      )))?;

    let base_url = Url::parse(&settings.store_url()).with_modboard_type(
      ModboardErrorType::ConfigError(format!("invalid store url {}", settings.store_url())),
    )?;

    Ok(HttpReportStore {
      client,
      base_url,
      retries: config.retries,
    })
  }

  fn endpoint(&self, path: &str) -> ModboardResult<Url> {
    self
      .base_url
      .join(path)
      .with_modboard_type(ModboardErrorType::ConfigError(format!(
        "invalid endpoint path {path}"
      )))
  }
}

fn transport_error(e: reqwest::Error) -> ModboardErrorType {
  if e.is_connect() || e.is_timeout() {
    ModboardErrorType::ReportStoreUnreachable(SendError(e.to_string()).to_string())
  } else {
    ModboardErrorType::Unknown(e.to_string())
  }
}

/// Decodes a success body, or maps a rejection into the mutation-specific error type
/// so the message reaches the dialog that triggered it.
async fn json_or_error<T: DeserializeOwned>(
  response: Response,
  reject: fn(String) -> ModboardErrorType,
) -> ModboardResult<T> {
  let status = response.status();
  if status.is_success() {
    return response
      .json::<T>()
      .await
      .with_modboard_type(ModboardErrorType::InvalidResponse(String::from(
        "malformed body from report store",
      )));
  }

  let body = response.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ErrorBody>(&body)
    .map(|b| b.message.unwrap_or(b.error))
    .unwrap_or_else(|_| format!("{status}"));
  debug!("report store rejected request: {message}");
  Err(reject(message).into())
}

#[async_trait]
impl ReportStore for HttpReportStore {
  async fn list_pending(
    &self,
    skip: Option<i64>,
    take: Option<i64>,
  ) -> ModboardResult<Vec<Report>> {
    let url = self.endpoint("/reports/pending")?;
    let response = retry(self.retries, || {
      self
        .client
        .get(url.clone())
        .query(&[("skip", skip), ("take", take)])
        .send()
    })
    .await
    .map_err(transport_error)?;

    json_or_error(response, ModboardErrorType::CouldntListReports).await
  }

  async fn list_view(&self, query: &ListReportsQuery) -> ModboardResult<Vec<Report>> {
    let url = self.endpoint("/reports/view")?;
    let response = retry(self.retries, || {
      self.client.post(url.clone()).json(query).send()
    })
    .await
    .map_err(transport_error)?;

    json_or_error(response, ModboardErrorType::CouldntListReports).await
  }

  async fn update_status(
    &self,
    id: ReportId,
    form: &UpdateReportStatus,
  ) -> ModboardResult<Report> {
    let url = self.endpoint(&format!("/reports/{id}/status"))?;
    let response = retry(self.retries, || {
      self.client.patch(url.clone()).json(form).send()
    })
    .await
    .map_err(transport_error)?;

    let report: Report = json_or_error(response, ModboardErrorType::CouldntUpdateReport).await?;
    report.check_invariants()?;
    Ok(report)
  }

  async fn resolve(&self, id: ReportId, form: &ResolveReportForm) -> ModboardResult<Report> {
    let url = self.endpoint(&format!("/reports/{id}/resolve"))?;
    let response = retry(self.retries, || {
      self.client.patch(url.clone()).json(form).send()
    })
    .await
    .map_err(transport_error)?;

    let report: Report = json_or_error(response, ModboardErrorType::CouldntResolveReport).await?;
    report.check_invariants()?;
    Ok(report)
  }

  async fn create(&self, form: &CreateReport) -> ModboardResult<Report> {
    check_report_reason(&form.reason)?;

    let url = self.endpoint("/reports")?;
    let response = retry(self.retries, || {
      self.client.post(url.clone()).json(form).send()
    })
    .await
    .map_err(transport_error)?;

    json_or_error(response, ModboardErrorType::CouldntCreateReport).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn settings_with_url(url: &str) -> Settings {
    Settings {
      store_url: Some(url.into()),
      ..Settings::default()
    }
  }

  #[test]
  fn builds_endpoints_from_store_url() -> ModboardResult<()> {
    let store = HttpReportStore::new(&settings_with_url("https://store.example.com"))?;
    assert_eq!(
      "https://store.example.com/reports/pending",
      store.endpoint("/reports/pending")?.as_str()
    );
    assert_eq!(
      "https://store.example.com/reports/7/resolve",
      store
        .endpoint(&format!("/reports/{}/resolve", ReportId(7)))?
        .as_str()
    );

    Ok(())
  }

  #[test]
  fn rejects_invalid_store_url() {
    assert!(HttpReportStore::new(&settings_with_url("not a url")).is_err());
  }

  #[test]
  fn error_body_prefers_message_over_code() -> ModboardResult<()> {
    let body: ErrorBody =
      serde_json::from_str("{\"error\":\"report_already_handled\",\"message\":\"already resolved\"}")?;
    assert_eq!(Some(String::from("already resolved")), body.message);

    Ok(())
  }
}

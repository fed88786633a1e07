use async_trait::async_trait;
use modboard_api_common::{
  newtypes::ReportId,
  report::{CreateReport, ListReportsQuery, Report, ResolveReportForm, UpdateReportStatus},
};
use modboard_utils::error::ModboardResult;
use std::future::Future;

pub mod http;

pub use http::HttpReportStore;

/// The Report Store collaborator. The store owns report state and is the single
/// authority on status transitions; everything above it only caches.
#[async_trait]
pub trait ReportStore: Send + Sync {
  /// GET /reports/pending
  async fn list_pending(&self, skip: Option<i64>, take: Option<i64>)
    -> ModboardResult<Vec<Report>>;

  /// POST /reports/view
  async fn list_view(&self, query: &ListReportsQuery) -> ModboardResult<Vec<Report>>;

  /// PATCH /reports/:id/status
  async fn update_status(
    &self,
    id: ReportId,
    form: &UpdateReportStatus,
  ) -> ModboardResult<Report>;

  /// PATCH /reports/:id/resolve
  async fn resolve(&self, id: ReportId, form: &ResolveReportForm) -> ModboardResult<Report>;

  /// POST /reports
  async fn create(&self, form: &CreateReport) -> ModboardResult<Report>;
}

/// Retries a request a bounded number of times when it times out; any other
/// failure is returned immediately.
pub async fn retry<F, Fut, T>(attempts: u8, f: F) -> Result<T, reqwest::Error>
where
  F: Fn() -> Fut,
  Fut: Future<Output = Result<T, reqwest::Error>>,
{
  let mut response = None;

  for _ in 0..attempts.max(1) {
    match (f)().await {
      Ok(t) => return Ok(t),
      Err(e) => {
        if e.is_timeout() {
          response = Some(Err(e));
          continue;
        }
        return Err(e);
      }
    }
  }

  response.expect("retry http request")
}

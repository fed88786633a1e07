use crate::{
  dialog::{DetailDialog, ResolutionDialog},
  filter::visible_reports,
};
use chrono::{DateTime, Utc};
use modboard_api_common::{
  newtypes::ReportId,
  report::{ListReportsQuery, Report, ReportStatus},
};
use modboard_query::ReportQuery;
use std::sync::Arc;
use tracing::debug;

/// Lifecycle of a fetched resource; the loading window is what the page renders
/// a spinner over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Loadable<T> {
  #[default]
  NotLoaded,
  Loading,
  Loaded(T),
  Failed(String),
}

impl<T> Loadable<T> {
  pub fn loaded(&self) -> Option<&T> {
    match self {
      Loadable::Loaded(data) => Some(data),
      _ => None,
    }
  }
}

/// Everything a moderator can do on the reports page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
  Load,
  /// Drops the cached lists first, then reloads.
  Refresh,
  SetSearch(String),
  SetStatusFilter(Option<ReportStatus>),
  OpenDetail(ReportId),
  CloseDetail,
  OpenResolve(ReportId),
  SetResolveDate(Option<DateTime<Utc>>),
  SetResolveComment(String),
  ConfirmResolve,
  CancelResolve,
  Dismiss(ReportId),
}

/// State of the report management page. Owns filter/search state, the loaded
/// list and both dialog state machines; all state is per-visit and reset by
/// constructing a fresh view.
#[derive(Default)]
pub struct ReportsView {
  pub search_term: String,
  pub status_filter: Option<ReportStatus>,
  pub reports: Loadable<Arc<Vec<Report>>>,
  pub detail: DetailDialog,
  pub resolution: ResolutionDialog,
  /// Defensive surface for actions arriving in states the UI should prevent.
  pub alert: Option<String>,
  deep_link: Option<ReportId>,
}

impl ReportsView {
  pub fn new() -> Self {
    Self::default()
  }

  /// Entered from an external link: opens the detail dialog for `target` once
  /// the list is loaded, if the report is in the loaded page. A miss is a
  /// silent no-op, consumed either way.
  pub fn with_deep_link(target: ReportId) -> Self {
    ReportsView {
      deep_link: Some(target),
      ..Default::default()
    }
  }

  /// The derived subset the table renders. Empty while loading or failed.
  pub fn visible(&self) -> Vec<&Report> {
    match self.reports.loaded() {
      Some(reports) => visible_reports(reports, &self.search_term, self.status_filter),
      None => Vec::new(),
    }
  }

  pub fn report(&self, id: ReportId) -> Option<&Report> {
    self
      .reports
      .loaded()
      .and_then(|reports| reports.iter().find(|r| r.id == id))
  }

  /// The report shown by the detail dialog, when it is open and still loaded.
  pub fn active_report(&self) -> Option<&Report> {
    self.detail.report_id().and_then(|id| self.report(id))
  }

  pub async fn update(&mut self, query: &ReportQuery, msg: Msg) {
    match msg {
      Msg::Load => self.load(query).await,
      Msg::Refresh => {
        query.invalidate().await;
        self.load(query).await;
      }
      Msg::SetSearch(term) => self.search_term = term,
      Msg::SetStatusFilter(status) => self.status_filter = status,
      Msg::OpenDetail(id) => self.detail.open(id),
      Msg::CloseDetail => self.detail.close(),
      Msg::OpenResolve(id) => self.resolution.open(id, Utc::now()),
      Msg::SetResolveDate(date) => self.resolution.set_date(date),
      Msg::SetResolveComment(text) => self.resolution.set_comment(text),
      Msg::CancelResolve => self.resolution.close(),
      Msg::ConfirmResolve => self.confirm_resolve(query).await,
      Msg::Dismiss(id) => self.dismiss(query, id).await,
    }
  }

  async fn load(&mut self, query: &ReportQuery) {
    self.reports = Loadable::Loading;
    match query.list(ListReportsQuery::default()).await {
      Ok(reports) => {
        self.reports = Loadable::Loaded(reports);
        self.consume_deep_link();
      }
      Err(e) => self.reports = Loadable::Failed(e.error_type.message()),
    }
  }

  fn consume_deep_link(&mut self) {
    if let Some(target) = self.deep_link.take() {
      if self.report(target).is_some() {
        self.detail.open(target);
      } else {
        debug!("deep-linked report {target} not in the loaded page, ignoring");
      }
    }
  }

  async fn confirm_resolve(&mut self, query: &ReportQuery) {
    let (id, form) = match self.resolution.begin_submit() {
      Ok(input) => input,
      Err(e) => {
        self.alert = Some(e.error_type.message());
        return;
      }
    };

    match query.resolve(id, form).await {
      Ok(_) => {
        self.resolution.close();
        self.detail.close();
        self.load(query).await;
      }
      Err(e) => self.resolution.submit_failed(e.error_type.message()),
    }
  }

  async fn dismiss(&mut self, query: &ReportQuery, id: ReportId) {
    match query.update_status(id, ReportStatus::Dismissed).await {
      Ok(_) => {
        self.detail.close();
        self.load(query).await;
      }
      Err(e) => {
        if self.detail.report_id().is_some() {
          self.detail.fail(e.error_type.message());
        } else {
          self.alert = Some(e.error_type.message());
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use modboard_client::test::{test_report, TestReportStore};
  use modboard_utils::error::{ModboardErrorType, ModboardResult};
  use pretty_assertions::assert_eq;

  fn seeded_view() -> (Arc<TestReportStore>, ReportQuery, ReportsView) {
    let store = Arc::new(TestReportStore::seeded(vec![
      test_report(1, "alice", "spam", ReportStatus::Pending),
      test_report(2, "bob", "abuse", ReportStatus::Resolved),
    ]));
    let query = ReportQuery::new(store.clone());
    (store, query, ReportsView::new())
  }

  #[tokio::test]
  async fn load_then_search_then_filter() {
    let (_store, query, mut view) = seeded_view();

    view.update(&query, Msg::Load).await;
    assert_eq!(2, view.visible().len());

    view.update(&query, Msg::SetSearch(String::from("ali"))).await;
    assert_eq!(vec![ReportId(1)], view.visible().iter().map(|r| r.id).collect::<Vec<_>>());

    view.update(&query, Msg::SetSearch(String::new())).await;
    view
      .update(&query, Msg::SetStatusFilter(Some(ReportStatus::Resolved)))
      .await;
    assert_eq!(vec![ReportId(2)], view.visible().iter().map(|r| r.id).collect::<Vec<_>>());
  }

  #[tokio::test]
  async fn failed_load_keeps_table_empty_with_message() {
    let (store, query, mut view) = seeded_view();
    store.fail_next(ModboardErrorType::CouldntListReports(String::from(
      "store down",
    )));

    view.update(&query, Msg::Load).await;
    assert_eq!(Loadable::Failed(String::from("store down")), view.reports);
    assert!(view.visible().is_empty());
  }

  #[tokio::test]
  async fn resolve_workflow_refreshes_the_list() -> ModboardResult<()> {
    let (store, query, mut view) = seeded_view();

    view.update(&query, Msg::Load).await;
    view.update(&query, Msg::OpenDetail(ReportId(1))).await;
    view.update(&query, Msg::OpenResolve(ReportId(1))).await;
    view
      .update(&query, Msg::SetResolveComment(String::from("cleaned up")))
      .await;
    view.update(&query, Msg::ConfirmResolve).await;

    assert_eq!(ResolutionDialog::Closed, view.resolution);
    assert_eq!(DetailDialog::Closed, view.detail);
    let report = view.report(ReportId(1)).ok_or(ModboardErrorType::NotFound)?;
    assert_eq!(ReportStatus::Resolved, report.status);
    assert!(report.resolved_at.is_some());
    assert_eq!(Some(String::from("cleaned up")), report.resolution_comment);
    // initial load plus the refetch after invalidation
    assert_eq!(2, store.list_calls());

    Ok(())
  }

  #[tokio::test]
  async fn failed_resolve_keeps_dialog_open_for_retry() {
    let (store, query, mut view) = seeded_view();

    view.update(&query, Msg::Load).await;
    view.update(&query, Msg::OpenResolve(ReportId(1))).await;
    store.fail_next(ModboardErrorType::CouldntResolveReport(String::from(
      "already resolved",
    )));
    view.update(&query, Msg::ConfirmResolve).await;

    assert!(matches!(
      view.resolution,
      ResolutionDialog::Editing {
        error: Some(_),
        ..
      }
    ));
    // prior list state intact
    assert_eq!(2, view.visible().len());
  }

  #[tokio::test]
  async fn failed_dismiss_stays_open_with_inline_error() -> ModboardResult<()> {
    let (store, query, mut view) = seeded_view();

    view.update(&query, Msg::Load).await;
    view.update(&query, Msg::OpenDetail(ReportId(1))).await;
    store.fail_next(ModboardErrorType::CouldntUpdateReport(String::from(
      "network error",
    )));
    view.update(&query, Msg::Dismiss(ReportId(1))).await;

    assert_eq!(
      DetailDialog::Open {
        report_id: ReportId(1),
        error: Some(String::from("network error")),
      },
      view.detail
    );
    // cached status unchanged
    let report = view.report(ReportId(1)).ok_or(ModboardErrorType::NotFound)?;
    assert_eq!(ReportStatus::Pending, report.status);
    assert_eq!(1, store.list_calls());

    Ok(())
  }

  #[tokio::test]
  async fn dismiss_closes_detail_and_refreshes() -> ModboardResult<()> {
    let (_store, query, mut view) = seeded_view();

    view.update(&query, Msg::Load).await;
    view.update(&query, Msg::OpenDetail(ReportId(1))).await;
    view.update(&query, Msg::Dismiss(ReportId(1))).await;

    assert_eq!(DetailDialog::Closed, view.detail);
    let report = view.report(ReportId(1)).ok_or(ModboardErrorType::NotFound)?;
    assert_eq!(ReportStatus::Dismissed, report.status);

    Ok(())
  }

  #[tokio::test]
  async fn deep_link_auto_opens_when_found() {
    let (_store, query, _) = seeded_view();
    let mut view = ReportsView::with_deep_link(ReportId(2));

    view.update(&query, Msg::Load).await;
    assert_eq!(Some(ReportId(2)), view.detail.report_id());
  }

  #[tokio::test]
  async fn deep_link_miss_is_a_silent_noop() {
    let (_store, query, _) = seeded_view();
    let mut view = ReportsView::with_deep_link(ReportId(99));

    view.update(&query, Msg::Load).await;
    assert_eq!(None, view.detail.report_id());
    assert_eq!(None, view.alert);

    // consumed: a later reload does not retry the deep link
    view.update(&query, Msg::Refresh).await;
    assert_eq!(None, view.detail.report_id());
  }

  #[tokio::test]
  async fn confirm_without_open_dialog_raises_defensive_alert() {
    let (_store, query, mut view) = seeded_view();

    view.update(&query, Msg::Load).await;
    view.update(&query, Msg::ConfirmResolve).await;

    assert_eq!(
      Some(ModboardErrorType::NoReportSelected.message()),
      view.alert
    );
    assert_eq!(ResolutionDialog::Closed, view.resolution);
  }
}

//! Cached query layer over the Report Store. Lists are cached per filter key and
//! every successful mutation invalidates the whole reports namespace, so a read
//! is never older than the write that triggered it. Cached lists are never
//! patched in place.

use modboard_api_common::{
  newtypes::ReportId,
  report::{
    ListReportsQuery, Report, ReportCount, ReportStatus, ResolveReportForm, UpdateReportStatus,
  },
};
use modboard_client::ReportStore;
use modboard_utils::error::{ModboardErrorType, ModboardResult};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

type ListProgress = Option<Result<Arc<Vec<Report>>, ModboardErrorType>>;

enum Role {
  Fetch(watch::Sender<ListProgress>),
  Wait(watch::Receiver<ListProgress>),
}

pub struct ReportQuery {
  store: Arc<dyn ReportStore>,
  lists: Mutex<HashMap<ListReportsQuery, Arc<Vec<Report>>>>,
  inflight: Mutex<HashMap<ListReportsQuery, watch::Receiver<ListProgress>>>,
}

impl ReportQuery {
  pub fn new(store: Arc<dyn ReportStore>) -> Self {
    ReportQuery {
      store,
      lists: Mutex::new(HashMap::new()),
      inflight: Mutex::new(HashMap::new()),
    }
  }

  /// Fetches the report list for `query`, from cache when possible. Concurrent
  /// identical requests share one in-flight fetch. Errors are never cached.
  pub async fn list(&self, query: ListReportsQuery) -> ModboardResult<Arc<Vec<Report>>> {
    if let Some(cached) = self.lists.lock().await.get(&query) {
      return Ok(cached.clone());
    }

    let role = {
      let mut inflight = self.inflight.lock().await;
      match inflight.get(&query) {
        Some(receiver) => Role::Wait(receiver.clone()),
        None => {
          let (sender, receiver) = watch::channel(None);
          inflight.insert(query, receiver);
          Role::Fetch(sender)
        }
      }
    };

    match role {
      Role::Wait(mut receiver) => {
        let progress = receiver.wait_for(|p| p.is_some()).await.map(|p| p.clone());
        match progress {
          Ok(Some(Ok(reports))) => Ok(reports),
          Ok(Some(Err(error_type))) => Err(error_type.into()),
          // Sender dropped without a value: the fetching caller was cancelled
          // mid-flight. Clear the stale entry so the next call refetches.
          _ => {
            self.inflight.lock().await.remove(&query);
            Err(
              ModboardErrorType::CouldntListReports(String::from("fetch was abandoned")).into(),
            )
          }
        }
      }
      Role::Fetch(sender) => match self.store.list_view(&query).await {
        Ok(reports) => {
          let shared = Arc::new(reports);
          self.lists.lock().await.insert(query, shared.clone());
          sender.send_replace(Some(Ok(shared.clone())));
          self.inflight.lock().await.remove(&query);
          Ok(shared)
        }
        Err(e) => {
          sender.send_replace(Some(Err(e.error_type.clone())));
          self.inflight.lock().await.remove(&query);
          Err(e)
        }
      },
    }
  }

  /// Transitions a report to resolved. Invalidation runs only after the store's
  /// response is observed.
  pub async fn resolve(&self, id: ReportId, form: ResolveReportForm) -> ModboardResult<Report> {
    let report = self
      .store
      .resolve(id, &form)
      .await
      .inspect_err(|e| warn!("resolving report {id} failed: {}", e.error_type))?;

    debug!("report {id} resolved, invalidating cached report lists");
    self.invalidate().await;
    Ok(report)
  }

  /// Generic status transition, used for the dismiss path. Same invalidation
  /// contract as [`ReportQuery::resolve`].
  pub async fn update_status(
    &self,
    id: ReportId,
    status: ReportStatus,
  ) -> ModboardResult<Report> {
    let report = self
      .store
      .update_status(id, &UpdateReportStatus { status })
      .await
      .inspect_err(|e| warn!("updating report {id} to {status} failed: {}", e.error_type))?;

    debug!("report {id} moved to {status}, invalidating cached report lists");
    self.invalidate().await;
    Ok(report)
  }

  /// Pending totals for the dashboard header, derived from the cached pending list
  /// so it invalidates together with everything else.
  pub async fn report_count(&self) -> ModboardResult<ReportCount> {
    let pending = self
      .list(ListReportsQuery {
        status: Some(ReportStatus::Pending),
        ..Default::default()
      })
      .await?;
    Ok(ReportCount::from_pending(&pending))
  }

  /// Drops every cached list; the next read refetches from the store.
  pub async fn invalidate(&self) {
    self.lists.lock().await.clear();
  }
}

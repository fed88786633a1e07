//! Dialog state machines. Both dialogs are tagged unions so illegal
//! combinations (submitting without a report, an error on a closed dialog)
//! cannot be represented.

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use modboard_api_common::{
  newtypes::ReportId,
  report::{Report, ResolveReportForm},
};
use modboard_utils::error::{ModboardErrorType, ModboardResult};

const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Renders an instant the way a datetime-local input shows it: `2024-01-01T10:00`.
pub fn datetime_local(dt: DateTime<Utc>) -> String {
  dt.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Parses a datetime-local field value back into an instant.
pub fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
    .ok()
    .map(|naive| Utc.from_utc_datetime(&naive))
}

/// The resolve timestamp is initialized to "now" truncated to minute precision,
/// matching what the date field can represent.
pub fn truncate_to_minute(dt: DateTime<Utc>) -> DateTime<Utc> {
  dt.with_second(0)
    .and_then(|t| t.with_nanosecond(0))
    .unwrap_or(dt)
}

/// Captures resolution metadata and drives the resolve mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolutionDialog {
  #[default]
  Closed,
  Editing {
    report_id: ReportId,
    resolve_date: Option<DateTime<Utc>>,
    comment: String,
    error: Option<String>,
  },
  Submitting {
    report_id: ReportId,
    resolve_date: DateTime<Utc>,
    comment: String,
  },
}

impl ResolutionDialog {
  /// Opens the dialog for a report, clearing any prior comment and error.
  pub fn open(&mut self, report_id: ReportId, now: DateTime<Utc>) {
    *self = ResolutionDialog::Editing {
      report_id,
      resolve_date: Some(truncate_to_minute(now)),
      comment: String::new(),
      error: None,
    };
  }

  pub fn close(&mut self) {
    *self = ResolutionDialog::Closed;
  }

  pub fn set_date(&mut self, date: Option<DateTime<Utc>>) {
    if let ResolutionDialog::Editing { resolve_date, .. } = self {
      *resolve_date = date;
    }
  }

  pub fn set_comment(&mut self, text: String) {
    if let ResolutionDialog::Editing { comment, .. } = self {
      *comment = text;
    }
  }

  /// What the date field shows while editing.
  pub fn date_field(&self) -> Option<String> {
    match self {
      ResolutionDialog::Editing {
        resolve_date: Some(date),
        ..
      } => Some(datetime_local(*date)),
      _ => None,
    }
  }

  /// Confirm is enabled only while editing with a date set; in particular it is
  /// disabled for the whole submit window, which is the duplicate-click guard.
  pub fn can_confirm(&self) -> bool {
    matches!(
      self,
      ResolutionDialog::Editing {
        resolve_date: Some(_),
        ..
      }
    )
  }

  /// Editing -> Submitting. Returns the mutation input; empty comments are sent
  /// as absent.
  pub fn begin_submit(&mut self) -> ModboardResult<(ReportId, ResolveReportForm)> {
    match self {
      ResolutionDialog::Editing {
        report_id,
        resolve_date: Some(date),
        comment,
        ..
      } => {
        let id = *report_id;
        let form = ResolveReportForm {
          resolve_date: *date,
          resolution_comment: (!comment.trim().is_empty()).then(|| comment.trim().to_string()),
        };
        *self = ResolutionDialog::Submitting {
          report_id: id,
          resolve_date: form.resolve_date,
          comment: comment.clone(),
        };
        Ok((id, form))
      }
      ResolutionDialog::Editing {
        resolve_date: None, ..
      } => Err(ModboardErrorType::ResolveDateRequired.into()),
      _ => Err(ModboardErrorType::NoReportSelected.into()),
    }
  }

  /// Submitting -> Editing, keeping the fields for retry and showing the error inline.
  pub fn submit_failed(&mut self, message: String) {
    if let ResolutionDialog::Submitting {
      report_id,
      resolve_date,
      comment,
    } = self
    {
      *self = ResolutionDialog::Editing {
        report_id: *report_id,
        resolve_date: Some(*resolve_date),
        comment: comment.clone(),
        error: Some(message),
      };
    }
  }
}

/// Read-only presentation of one report plus action dispatch. A failed dismiss
/// keeps the dialog open with the error inline, same as the resolution dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailDialog {
  #[default]
  Closed,
  Open {
    report_id: ReportId,
    error: Option<String>,
  },
}

impl DetailDialog {
  pub fn open(&mut self, report_id: ReportId) {
    *self = DetailDialog::Open {
      report_id,
      error: None,
    };
  }

  pub fn close(&mut self) {
    *self = DetailDialog::Closed;
  }

  pub fn fail(&mut self, message: String) {
    if let DetailDialog::Open { error, .. } = self {
      *error = Some(message);
    }
  }

  pub fn report_id(&self) -> Option<ReportId> {
    match self {
      DetailDialog::Open { report_id, .. } => Some(*report_id),
      DetailDialog::Closed => None,
    }
  }
}

/// Resolve and dismiss are offered only while the report is still pending.
pub fn is_actionable(report: &Report) -> bool {
  report.is_actionable()
}

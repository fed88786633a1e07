use crate::newtypes::{PersonId, ReportId, TargetId};
use chrono::{DateTime, Utc};
use modboard_utils::error::{ModboardErrorType, ModboardResult};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum::{Display, EnumIter, EnumString};
use url::Url;

pub const MAX_REPORT_LEN: usize = 1000;

#[derive(
  Display, EnumString, EnumIter, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ReportStatus {
  Pending,
  Resolved,
  Dismissed,
}

impl ReportStatus {
  /// Transitions are one-way: a pending report can be resolved or dismissed, and
  /// nothing leaves a terminal status. The store is the authority; this mirrors it
  /// so the view can hide actions that would be rejected anyway.
  pub fn can_transition_to(self, next: ReportStatus) -> bool {
    match self {
      ReportStatus::Pending => next != ReportStatus::Pending,
      ReportStatus::Resolved | ReportStatus::Dismissed => false,
    }
  }
}

#[derive(
  Display, EnumString, EnumIter, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ReportTargetType {
  Post,
  Blog,
  Comment,
  User,
}

#[skip_serializing_none]
#[derive(PartialEq, Eq, Serialize, Deserialize, Debug, Clone)]
/// A moderation ticket filed against a post, blog, comment or user.
pub struct Report {
  pub id: ReportId,
  pub creator_id: PersonId,
  /// Username snapshot taken when the report was filed.
  pub creator_name: String,
  pub target_id: TargetId,
  pub target_type: ReportTargetType,
  pub reason: String,
  pub status: ReportStatus,
  pub moderator_id: Option<PersonId>,
  pub moderator_name: Option<String>,
  pub published_at: DateTime<Utc>,
  pub resolved_at: Option<DateTime<Utc>>,
  pub resolution_comment: Option<String>,
  /// Link to the reported content, absent when the target was deleted.
  pub target_url: Option<Url>,
}

impl Report {
  /// Checks the cross-field rules the store is supposed to uphold. Run on mutation
  /// responses so a misbehaving store surfaces as `InvalidResponse` instead of
  /// corrupting the cached lists.
  pub fn check_invariants(&self) -> ModboardResult<()> {
    if self.resolved_at.is_some() != (self.status == ReportStatus::Resolved) {
      return Err(
        ModboardErrorType::InvalidResponse(format!(
          "report {} has resolved_at {:?} but status {}",
          self.id, self.resolved_at, self.status
        ))
        .into(),
      );
    }
    if self.moderator_id.is_some() != (self.status != ReportStatus::Pending) {
      return Err(
        ModboardErrorType::InvalidResponse(format!(
          "report {} has moderator_id {:?} but status {}",
          self.id, self.moderator_id, self.status
        ))
        .into(),
      );
    }
    Ok(())
  }

  pub fn is_actionable(&self) -> bool {
    self.status == ReportStatus::Pending
  }
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResolveReportForm {
  #[serde(with = "serde_millis")]
  pub resolve_date: DateTime<Utc>,
  pub resolution_comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReportStatus {
  pub status: ReportStatus,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Server-side tab/pagination filter; also the cache key in the query layer.
pub struct ListReportsQuery {
  pub status: Option<ReportStatus>,
  pub target_type: Option<ReportTargetType>,
  pub skip: Option<i64>,
  pub take: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CreateReport {
  pub target_id: TargetId,
  pub target_type: ReportTargetType,
  pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
/// Pending totals shown in the dashboard header, derived from the pending list.
pub struct ReportCount {
  pub post_reports: i64,
  pub blog_reports: i64,
  pub comment_reports: i64,
  pub user_reports: i64,
}

impl ReportCount {
  pub fn from_pending(reports: &[Report]) -> Self {
    let mut count = ReportCount::default();
    for report in reports {
      match report.target_type {
        ReportTargetType::Post => count.post_reports += 1,
        ReportTargetType::Blog => count.blog_reports += 1,
        ReportTargetType::Comment => count.comment_reports += 1,
        ReportTargetType::User => count.user_reports += 1,
      }
    }
    count
  }

  pub fn total(&self) -> i64 {
    self.post_reports + self.blog_reports + self.comment_reports + self.user_reports
  }
}

/// Check size of report reason and check for whitespace
pub fn check_report_reason(reason: &str) -> ModboardResult<()> {
  let reason = reason.trim();
  if reason.is_empty() {
    Err(ModboardErrorType::ReportReasonRequired.into())
  } else if reason.len() > MAX_REPORT_LEN {
    Err(ModboardErrorType::ReportTooLong.into())
  } else {
    Ok(())
  }
}

/// The store expects resolve timestamps as ISO-8601 instants with millisecond
/// precision (`2024-01-01T10:00:00.000Z`); chrono's default emits variable precision.
pub mod serde_millis {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serialize, Serializer};

  pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
      .serialize(serializer)
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime<Utc>, D::Error> {
    DateTime::<Utc>::deserialize(deserializer)
  }
}

//! Plain-text rendering for the console. Presentation only; all derivation
//! happens in the view crate.

use modboard_api_common::report::{Report, ReportCount};
use modboard_view::dialog::datetime_local;

pub fn render_count(count: &ReportCount) -> String {
  format!(
    "{} open reports (posts {}, blogs {}, comments {}, users {})",
    count.total(),
    count.post_reports,
    count.blog_reports,
    count.comment_reports,
    count.user_reports
  )
}

pub fn render_table(reports: &[&Report]) -> String {
  let mut out = format!(
    "{:>5}  {:<10}  {:<9}  {:<8}  {:<30}\n",
    "id", "status", "type", "reporter", "reason"
  );
  if reports.is_empty() {
    out.push_str("no reports found\n");
    return out;
  }
  for report in reports {
    out.push_str(&format!(
      "{:>5}  {:<10}  {:<9}  {:<8}  {:<30}\n",
      report.id.0,
      report.status.to_string(),
      report.target_type.to_string(),
      report.creator_name,
      truncate(&report.reason, 30),
    ));
  }
  out
}

pub fn render_detail(report: &Report) -> String {
  let mut out = format!(
    "report {}\n  status: {}\n  target: {} {}\n  reporter: {} ({})\n  reason: {}\n  published: {}\n",
    report.id,
    report.status,
    report.target_type,
    report.target_id,
    report.creator_name,
    report.creator_id,
    report.reason,
    datetime_local(report.published_at),
  );
  if let (Some(id), Some(name)) = (&report.moderator_id, &report.moderator_name) {
    out.push_str(&format!("  moderator: {name} ({id})\n"));
  }
  if let Some(resolved_at) = report.resolved_at {
    out.push_str(&format!("  resolved: {}\n", datetime_local(resolved_at)));
  }
  if let Some(comment) = &report.resolution_comment {
    out.push_str(&format!("  comment: {comment}\n"));
  }
  if let Some(url) = &report.target_url {
    out.push_str(&format!("  url: {url}\n"));
  }
  out
}

fn truncate(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    text.to_string()
  } else {
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use modboard_api_common::report::ReportStatus;
  use modboard_client::test::test_report;
  use pretty_assertions::assert_eq;

  #[test]
  fn empty_table_renders_the_no_reports_row() {
    let rendered = render_table(&[]);
    assert!(rendered.contains("no reports found"));
  }

  #[test]
  fn table_lists_each_report_once() {
    let reports = vec![
      test_report(1, "alice", "spam", ReportStatus::Pending),
      test_report(2, "bob", "abuse", ReportStatus::Resolved),
    ];
    let refs: Vec<&_> = reports.iter().collect();
    let rendered = render_table(&refs);
    assert_eq!(3, rendered.lines().count());
    assert!(rendered.contains("alice"));
    assert!(rendered.contains("RESOLVED"));
  }

  #[test]
  fn detail_shows_resolution_fields_only_when_present() {
    let pending = render_detail(&test_report(1, "alice", "spam", ReportStatus::Pending));
    assert!(!pending.contains("resolved:"));
    assert!(!pending.contains("moderator:"));

    let resolved = render_detail(&test_report(2, "bob", "abuse", ReportStatus::Resolved));
    assert!(resolved.contains("resolved:"));
    assert!(resolved.contains("comment: handled"));
  }

  #[test]
  fn long_reasons_are_truncated() {
    assert_eq!("short", truncate("short", 30));
    assert_eq!(30, truncate(&"x".repeat(40), 30).chars().count());
  }
}

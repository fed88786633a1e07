use modboard_api_common::report::{Report, ReportStatus};

/// Derives the visible subset of the fetched list: case-insensitive search over
/// reporter username and reason, then an exact status match. Server order is
/// preserved; no sort is applied.
pub fn visible_reports<'a>(
  reports: &'a [Report],
  search_term: &str,
  status_filter: Option<ReportStatus>,
) -> Vec<&'a Report> {
  let term = search_term.to_lowercase();
  reports
    .iter()
    .filter(|r| {
      term.is_empty()
        || r.creator_name.to_lowercase().contains(&term)
        || r.reason.to_lowercase().contains(&term)
    })
    .filter(|r| status_filter.is_none_or(|s| r.status == s))
    .collect()
}

//! The modboard moderation console.

use clap::{Parser, Subcommand};
use modboard_api_common::{
  newtypes::ReportId,
  report::{ListReportsQuery, ReportStatus, ReportTargetType, ResolveReportForm},
};
use modboard_client::HttpReportStore;
use modboard_query::ReportQuery;
use modboard_utils::{
  error::{ModboardErrorType, ModboardResult},
  settings::structs::Settings,
};
use modboard_view::dialog::{parse_datetime_local, truncate_to_minute};
use std::sync::Arc;

pub mod console;
pub mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Moderation report console for the content platform")]
pub struct CmdArgs {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List reports, optionally filtered
  List {
    /// Keep only reports with this status (pending/resolved/dismissed)
    #[arg(long)]
    status: Option<ReportStatus>,
    /// Keep only reports with this target type (post/blog/comment/user)
    #[arg(long)]
    target: Option<ReportTargetType>,
    /// Case-insensitive match on reporter username or reason
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    skip: Option<i64>,
    #[arg(long)]
    take: Option<i64>,
  },
  /// Show one report in full
  Show { id: i32 },
  /// Resolve a report
  Resolve {
    id: i32,
    /// Optional resolution comment
    #[arg(long)]
    comment: Option<String>,
    /// Resolve timestamp as YYYY-MM-DDTHH:MM, defaults to now
    #[arg(long)]
    date: Option<String>,
  },
  /// Dismiss a report without action
  Dismiss { id: i32 },
  /// Interactive console over the reports page
  Console {
    /// Deep link: open this report's detail once loaded
    #[arg(long)]
    report: Option<i32>,
  },
}

pub async fn start_modboard(args: CmdArgs) -> ModboardResult<()> {
  let settings = Settings::get();
  let store = Arc::new(HttpReportStore::new(&settings)?);
  let query = ReportQuery::new(store);

  match args.command {
    Command::List {
      status,
      target,
      search,
      skip,
      take,
    } => {
      let reports = query
        .list(ListReportsQuery {
          status,
          target_type: target,
          skip,
          take: take.or(Some(settings.page_size())),
        })
        .await?;
      let visible =
        modboard_view::visible_reports(&reports, search.as_deref().unwrap_or(""), None);
      println!("{}", render::render_count(&query.report_count().await?));
      println!("{}", render::render_table(&visible));
      Ok(())
    }
    Command::Show { id } => {
      let reports = query.list(ListReportsQuery::default()).await?;
      let report = reports
        .iter()
        .find(|r| r.id == ReportId(id))
        .ok_or(ModboardErrorType::NotFound)?;
      println!("{}", render::render_detail(report));
      Ok(())
    }
    Command::Resolve { id, comment, date } => {
      let resolve_date = match date {
        Some(value) => parse_datetime_local(&value)
          .ok_or(ModboardErrorType::ResolveDateRequired)?,
        None => truncate_to_minute(chrono::Utc::now()),
      };
      let report = query
        .resolve(
          ReportId(id),
          ResolveReportForm {
            resolve_date,
            resolution_comment: comment,
          },
        )
        .await?;
      println!("{}", render::render_detail(&report));
      Ok(())
    }
    Command::Dismiss { id } => {
      let report = query
        .update_status(ReportId(id), ReportStatus::Dismissed)
        .await?;
      println!("{}", render::render_detail(&report));
      Ok(())
    }
    Command::Console { report } => console::run(&query, report.map(ReportId)).await,
  }
}

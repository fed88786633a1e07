//! Interactive mode: a line-oriented rendition of the reports page, driving the
//! view state machine one message at a time on the current thread.

use crate::render;
use modboard_api_common::{newtypes::ReportId, report::ReportStatus};
use modboard_query::ReportQuery;
use modboard_utils::error::ModboardResult;
use modboard_view::{DetailDialog, Loadable, Msg, ReportsView, ResolutionDialog};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const HELP: &str = "commands:
  search <term>      filter by reporter or reason (empty clears)
  filter <status>    pending | resolved | dismissed | all
  open <id>          show one report
  close              close the detail view
  resolve <id>       open the resolution dialog
  date <YYYY-MM-DDTHH:MM>   change the resolve timestamp
  comment <text>     set the resolution comment
  confirm            submit the resolution
  cancel             discard the resolution dialog
  dismiss <id>       dismiss a report
  refresh            drop caches and refetch
  counts             pending totals
  quit";

pub async fn run(query: &ReportQuery, deep_link: Option<ReportId>) -> ModboardResult<()> {
  let mut view = match deep_link {
    Some(target) => ReportsView::with_deep_link(target),
    None => ReportsView::new(),
  };

  info!("loading reports");
  view.update(query, Msg::Load).await;
  print_state(&mut view);

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  loop {
    let Some(line) = lines.next_line().await? else {
      return Ok(());
    };
    let line = line.trim();
    let (command, rest) = match line.split_once(' ') {
      Some((c, r)) => (c, r.trim()),
      None => (line, ""),
    };

    match command {
      "" => continue,
      "quit" | "exit" => return Ok(()),
      "help" => {
        println!("{HELP}");
        continue;
      }
      "counts" => {
        match query.report_count().await {
          Ok(count) => println!("{}", render::render_count(&count)),
          Err(e) => println!("error: {}", e.error_type.message()),
        }
        continue;
      }
      "search" => view.update(query, Msg::SetSearch(rest.to_string())).await,
      "filter" => {
        let status = match rest {
          "all" | "" => None,
          other => match ReportStatus::from_str(other) {
            Ok(status) => Some(status),
            Err(_) => {
              println!("unknown status {other:?}, try pending/resolved/dismissed/all");
              continue;
            }
          },
        };
        view.update(query, Msg::SetStatusFilter(status)).await;
      }
      "open" => match parse_id(rest) {
        Some(id) => view.update(query, Msg::OpenDetail(id)).await,
        None => {
          println!("usage: open <id>");
          continue;
        }
      },
      "close" => view.update(query, Msg::CloseDetail).await,
      "resolve" => match parse_id(rest) {
        Some(id) => view.update(query, Msg::OpenResolve(id)).await,
        None => {
          println!("usage: resolve <id>");
          continue;
        }
      },
      "date" => {
        let date = modboard_view::dialog::parse_datetime_local(rest);
        if date.is_none() && !rest.is_empty() {
          println!("could not parse {rest:?} as YYYY-MM-DDTHH:MM");
          continue;
        }
        view.update(query, Msg::SetResolveDate(date)).await;
      }
      "comment" => {
        view
          .update(query, Msg::SetResolveComment(rest.to_string()))
          .await
      }
      "confirm" => view.update(query, Msg::ConfirmResolve).await,
      "cancel" => view.update(query, Msg::CancelResolve).await,
      "dismiss" => match parse_id(rest) {
        Some(id) => view.update(query, Msg::Dismiss(id)).await,
        None => {
          println!("usage: dismiss <id>");
          continue;
        }
      },
      "refresh" => view.update(query, Msg::Refresh).await,
      other => {
        println!("unknown command {other:?}, try help");
        continue;
      }
    }

    print_state(&mut view);
  }
}

fn parse_id(value: &str) -> Option<ReportId> {
  value.parse::<i32>().ok().map(ReportId)
}

fn print_state(view: &mut ReportsView) {
  if let Some(alert) = view.alert.take() {
    println!("! {alert}");
  }

  match &view.resolution {
    ResolutionDialog::Editing {
      report_id,
      comment,
      error,
      ..
    } => {
      println!("resolving report {report_id}");
      if let Some(date) = view.resolution.date_field() {
        println!("  date: {date}");
      } else {
        println!("  date: (unset, required)");
      }
      if !comment.is_empty() {
        println!("  comment: {comment}");
      }
      if let Some(error) = error {
        println!("  error: {error}");
      }
      println!("  confirm / cancel / date / comment");
      return;
    }
    ResolutionDialog::Submitting { report_id, .. } => {
      println!("submitting resolution for report {report_id}...");
      return;
    }
    ResolutionDialog::Closed => {}
  }

  if let DetailDialog::Open { error, .. } = &view.detail {
    if let Some(error) = error {
      println!("! {error}");
    }
    match view.active_report() {
      Some(report) => {
        print!("{}", render::render_detail(report));
        if report.is_actionable() {
          println!("  actions: resolve {0} / dismiss {0} / close", report.id);
        } else {
          println!("  actions: close");
        }
      }
      None => println!("report no longer in the loaded page (close to continue)"),
    }
    return;
  }

  match &view.reports {
    Loadable::Failed(message) => println!("error loading reports: {message}"),
    Loadable::Loading => println!("loading..."),
    _ => print!("{}", render::render_table(&view.visible())),
  }
}

// Report builders: one module per report kind, all funneling through the
// generic group/aggregate/pipeline engine.

pub mod attendance;
pub mod invoices;
pub mod movements;
pub mod stock;
pub mod trips;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::fetch::FetchOutcome;
use crate::group::GroupBucket;
use crate::model::{GroupView, RangeInfo, ReportView};
use crate::pipeline::SortSpec;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ReportKind {
  Trips,
  Godown,
  Attendance,
  Invoices,
  Stock,
  /// Dashboard run: every section above, fetched in parallel.
  All,
}

impl ReportKind {
  pub fn label(&self) -> &'static str {
    match self {
      ReportKind::Trips => "trips",
      ReportKind::Godown => "godown",
      ReportKind::Attendance => "attendance",
      ReportKind::Invoices => "invoices",
      ReportKind::Stock => "stock",
      ReportKind::All => "all",
    }
  }

  /// Backend endpoint path for this report's records.
  pub fn endpoint(&self) -> &'static str {
    match self {
      ReportKind::Trips => "driver-trips",
      ReportKind::Godown => "godown-movements",
      ReportKind::Attendance => "staff-attendance",
      ReportKind::Invoices => "invoices",
      ReportKind::Stock => "stock-valuation",
      ReportKind::All => "dashboard",
    }
  }

  /// Fixed page size per report (buckets per page).
  pub fn page_size(&self) -> usize {
    match self {
      ReportKind::Trips | ReportKind::Invoices => 10,
      ReportKind::Godown | ReportKind::Stock => 15,
      ReportKind::Attendance => 20,
      ReportKind::All => 10,
    }
  }

  /// The concrete sections a dashboard run fans out over.
  pub fn sections() -> [ReportKind; 5] {
    [
      ReportKind::Trips,
      ReportKind::Godown,
      ReportKind::Attendance,
      ReportKind::Invoices,
      ReportKind::Stock,
    ]
  }
}

/// Per-call view parameters. Stateless: the caller owns filter/sort/page state
/// and passes it in fresh each evaluation (page resets to 1 whenever filter or
/// sort criteria change).
#[derive(Debug, Clone)]
pub struct ViewRequest {
  pub query: String,
  pub sort: SortSpec,
  pub page_index: usize,
  pub page_size: usize,
}

impl ViewRequest {
  pub fn first_page(kind: ReportKind) -> Self {
    ViewRequest {
      query: String::new(),
      sort: SortSpec::default(),
      page_index: 1,
      page_size: kind.page_size(),
    }
  }
}

/// Dispatch to the builder for `kind`. `kind` must be a concrete section.
pub fn build_view(
  kind: ReportKind,
  outcome: &FetchOutcome,
  range: RangeInfo,
  location: &str,
  req: &ViewRequest,
) -> ReportView {
  match kind {
    ReportKind::Trips => trips::build(outcome, range, location, req),
    ReportKind::Godown => movements::build(outcome, range, location, req),
    ReportKind::Attendance => attendance::build(outcome, range, location, req),
    ReportKind::Invoices => invoices::build(outcome, range, location, req),
    ReportKind::Stock => stock::build(outcome, range, location, req),
    ReportKind::All => unreachable!("dashboard runs fan out over concrete sections"),
  }
}

/// Project a bucket to its view: serialized items, full-precision total, count.
/// Builders decorate the result with sections or percentages as needed.
pub(crate) fn project_bucket<R, F>(bucket: &GroupBucket<R>, measure: F) -> GroupView
where
  R: Serialize,
  F: Fn(&R) -> f64,
{
  GroupView {
    group_name: bucket.key.clone(),
    items: bucket
      .items
      .iter()
      .map(|r| serde_json::to_value(r).unwrap_or(serde_json::Value::Null))
      .collect(),
    total_measure: crate::aggregate::bucket_total(bucket, measure),
    item_count: bucket.items.len(),
    sections: None,
    percentage: None,
  }
}

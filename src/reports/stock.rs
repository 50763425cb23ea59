use crate::aggregate;
use crate::fetch::FetchOutcome;
use crate::group::group_by;
use crate::model::{RangeInfo, ReportStatus, ReportView};
use crate::pipeline::{Searchable, filter_records, paginate, sort_buckets};
use crate::record::{StockRecord, non_blank, parse_records};
use crate::reports::{ViewRequest, project_bucket};

impl Searchable for StockRecord {
  fn search_fields(&self) -> Vec<String> {
    vec![self.item_name.clone(), self.stock_group.clone()]
  }
}

/// Stock valuation: grouped by stock group, measure = quantity × rate per
/// record (both zero-defaulted at the boundary).
pub fn build(outcome: &FetchOutcome, range: RangeInfo, location: &str, req: &ViewRequest) -> ReportView {
  if outcome.failed {
    return ReportView::empty("stock", range, location, ReportStatus::FetchFailed, req.page_size);
  }

  let records: Vec<StockRecord> = parse_records(&outcome.records);
  let records = filter_records(records, &req.query);

  if records.is_empty() {
    return ReportView::empty("stock", range, location, ReportStatus::NoData, req.page_size);
  }

  let buckets = group_by(records, |r| non_blank(&r.stock_group));
  let grand_total = aggregate::grand_total(&buckets, |r| r.value());
  // Stock has no per-record date; Date sort falls back to stable input order.
  let buckets = sort_buckets(buckets, req.sort, |r| r.value(), |_| String::new());

  let (page_buckets, page) = paginate(&buckets, req.page_index, req.page_size);

  let groups = page_buckets.iter().map(|bucket| project_bucket(bucket, |r| r.value())).collect();

  ReportView {
    report: "stock".into(),
    range,
    location: location.into(),
    status: ReportStatus::Ok,
    groups,
    page,
    grand_total,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reports::ReportKind;

  fn range() -> RangeInfo {
    RangeInfo {
      label: "window".into(),
      from: "2025-08-01".into(),
      to: "2025-09-01".into(),
    }
  }

  #[test]
  fn valuation_is_quantity_times_rate_per_group() {
    let outcome = FetchOutcome {
      records: vec![
        serde_json::json!({"item_name": "Maize", "stock_group": "Grains", "quantity": 10.0, "rate": 25.0}),
        serde_json::json!({"item_name": "Wheat", "stock_group": "Grains", "quantity": 4.0, "rate": 30.0}),
        serde_json::json!({"item_name": "Gunny Bags", "stock_group": "Packing", "quantity": 100.0, "rate": 1.5}),
      ],
      failed: false,
    };
    let view = build(&outcome, range(), "MAIN", &ViewRequest::first_page(ReportKind::Stock));

    assert_eq!(view.groups.len(), 2);
    assert_eq!(view.groups[0].group_name, "Grains");
    assert_eq!(view.groups[0].total_measure, 370.0);
    assert_eq!(view.groups[1].total_measure, 150.0);
    assert_eq!(view.grand_total, 520.0);
  }

  #[test]
  fn missing_rate_values_record_at_zero() {
    let outcome = FetchOutcome {
      records: vec![serde_json::json!({"item_name": "Maize", "stock_group": "Grains", "quantity": 10.0})],
      failed: false,
    };
    let view = build(&outcome, range(), "MAIN", &ViewRequest::first_page(ReportKind::Stock));
    assert_eq!(view.grand_total, 0.0);
  }
}

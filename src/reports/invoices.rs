use crate::aggregate;
use crate::fetch::FetchOutcome;
use crate::group::group_by;
use crate::model::{RangeInfo, ReportStatus, ReportView, SectionView};
use crate::pipeline::{Searchable, filter_records, paginate, sort_buckets};
use crate::record::{InvoiceRecord, non_blank, parse_records};
use crate::reports::{ViewRequest, project_bucket};

impl Searchable for InvoiceRecord {
  fn search_fields(&self) -> Vec<String> {
    vec![self.party.clone(), self.voucher_number.clone(), self.voucher_type.clone()]
  }
}

/// Purchase/sales invoices: grouped by party with a purchase/sales section
/// split, measure = amount.
pub fn build(outcome: &FetchOutcome, range: RangeInfo, location: &str, req: &ViewRequest) -> ReportView {
  if outcome.failed {
    return ReportView::empty("invoices", range, location, ReportStatus::FetchFailed, req.page_size);
  }

  let records: Vec<InvoiceRecord> = parse_records(&outcome.records);
  let records = filter_records(records, &req.query);

  if records.is_empty() {
    return ReportView::empty("invoices", range, location, ReportStatus::NoData, req.page_size);
  }

  let buckets = group_by(records, |r| non_blank(&r.party));
  let grand_total = aggregate::grand_total(&buckets, |r| r.amount);
  let buckets = sort_buckets(buckets, req.sort, |r| r.amount, |r| r.date.clone());

  let (page_buckets, page) = paginate(&buckets, req.page_index, req.page_size);

  let groups = page_buckets
    .iter()
    .map(|bucket| {
      let mut group = project_bucket(bucket, |r| r.amount);
      let split = |purchase: bool| -> SectionView {
        let items: Vec<&InvoiceRecord> = bucket.items.iter().filter(|r| r.is_purchase() == purchase).collect();
        SectionView {
          section_name: if purchase { "Purchase" } else { "Sales" }.into(),
          total_measure: aggregate::total(&items, |r| r.amount),
          item_count: items.len(),
        }
      };
      group.sections = Some(vec![split(true), split(false)]);
      group
    })
    .collect();

  ReportView {
    report: "invoices".into(),
    range,
    location: location.into(),
    status: ReportStatus::Ok,
    groups,
    page,
    grand_total,
  }
}

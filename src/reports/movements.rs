use crate::aggregate;
use crate::fetch::FetchOutcome;
use crate::group::group_by;
use crate::model::{RangeInfo, ReportStatus, ReportView, SectionView};
use crate::pipeline::{Searchable, filter_records, paginate, sort_buckets};
use crate::record::{MovementRecord, non_blank, parse_records};
use crate::reports::{ViewRequest, project_bucket};

impl Searchable for MovementRecord {
  fn search_fields(&self) -> Vec<String> {
    vec![self.stock_item.clone(), self.stock_group.clone(), self.godown.clone()]
  }
}

/// Godown movements: grouped by godown with an inward/outward section split,
/// measure = quantity.
pub fn build(outcome: &FetchOutcome, range: RangeInfo, location: &str, req: &ViewRequest) -> ReportView {
  if outcome.failed {
    return ReportView::empty("godown", range, location, ReportStatus::FetchFailed, req.page_size);
  }

  let records: Vec<MovementRecord> = parse_records(&outcome.records);
  let records = filter_records(records, &req.query);

  if records.is_empty() {
    return ReportView::empty("godown", range, location, ReportStatus::NoData, req.page_size);
  }

  let buckets = group_by(records, |r| non_blank(&r.godown));
  let grand_total = aggregate::grand_total(&buckets, |r| r.quantity);
  let buckets = sort_buckets(buckets, req.sort, |r| r.quantity, |r| r.date.clone());

  let (page_buckets, page) = paginate(&buckets, req.page_index, req.page_size);

  let groups = page_buckets
    .iter()
    .map(|bucket| {
      let mut group = project_bucket(bucket, |r| r.quantity);
      let split = |inward: bool| -> SectionView {
        let items: Vec<&MovementRecord> = bucket.items.iter().filter(|r| r.is_inward() == inward).collect();
        SectionView {
          section_name: if inward { "Inward" } else { "Outward" }.into(),
          total_measure: aggregate::total(&items, |r| r.quantity),
          item_count: items.len(),
        }
      };
      group.sections = Some(vec![split(true), split(false)]);
      group
    })
    .collect();

  ReportView {
    report: "godown".into(),
    range,
    location: location.into(),
    status: ReportStatus::Ok,
    groups,
    page,
    grand_total,
  }
}

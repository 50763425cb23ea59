use crate::aggregate;
use crate::fetch::FetchOutcome;
use crate::group::{group_by, group_slice};
use crate::model::{RangeInfo, ReportStatus, ReportView, SectionView};
use crate::pipeline::{Searchable, filter_records, paginate, sort_buckets};
use crate::record::{TripRecord, non_blank, parse_records};
use crate::reports::{ViewRequest, project_bucket};

impl Searchable for TripRecord {
  fn search_fields(&self) -> Vec<String> {
    vec![self.driver.clone(), self.vehicle_number.clone(), self.trip_category.clone()]
  }
}

/// Driver trips: outer grouping by driver, nested sections by trip category,
/// measure = tonnage.
pub fn build(outcome: &FetchOutcome, range: RangeInfo, location: &str, req: &ViewRequest) -> ReportView {
  if outcome.failed {
    return ReportView::empty("trips", range, location, ReportStatus::FetchFailed, req.page_size);
  }

  let records: Vec<TripRecord> = parse_records(&outcome.records);
  let records = filter_records(records, &req.query);

  if records.is_empty() {
    return ReportView::empty("trips", range, location, ReportStatus::NoData, req.page_size);
  }

  let buckets = group_by(records, |r| non_blank(&r.driver));
  let grand_total = aggregate::grand_total(&buckets, |r| r.tonnage);
  let buckets = sort_buckets(buckets, req.sort, |r| r.tonnage, |r| r.trip_date.clone());

  let (page_buckets, page) = paginate(&buckets, req.page_index, req.page_size);

  let groups = page_buckets
    .iter()
    .map(|bucket| {
      let mut group = project_bucket(bucket, |r| r.tonnage);
      group.sections = Some(
        group_slice(&bucket.items, |r| non_blank(&r.trip_category))
          .iter()
          .map(|section| SectionView {
            section_name: section.key.clone(),
            total_measure: aggregate::bucket_total(section, |r| r.tonnage),
            item_count: section.items.len(),
          })
          .collect(),
      );
      group
    })
    .collect();

  ReportView {
    report: "trips".into(),
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
  use crate::fetch::FetchOutcome;
  use crate::pipeline::{SortDirection, SortKey, SortSpec};
  use crate::reports::ReportKind;

  fn range() -> RangeInfo {
    RangeInfo {
      label: "2025-08".into(),
      from: "2025-08-01".into(),
      to: "2025-09-01".into(),
    }
  }

  fn outcome() -> FetchOutcome {
    FetchOutcome {
      records: vec![
        serde_json::json!({"driver": "Ramesh", "trip_category": "Long Haul", "tonnage": 10.0, "trip_date": "2025-08-02"}),
        serde_json::json!({"driver": "Suresh", "trip_category": "Local", "tonnage": 5.0, "trip_date": "2025-08-03"}),
        serde_json::json!({"driver": "Ramesh", "trip_category": "Local", "tonnage": 3.0, "trip_date": "2025-08-04"}),
        serde_json::json!({"driver": "", "trip_category": "Local", "tonnage": 2.0, "trip_date": "2025-08-05"}),
      ],
      failed: false,
    }
  }

  #[test]
  fn groups_by_driver_with_category_sections() {
    let view = build(&outcome(), range(), "MAIN", &ViewRequest::first_page(ReportKind::Trips));

    assert_eq!(view.status, ReportStatus::Ok);
    assert_eq!(view.groups.len(), 3);
    assert_eq!(view.groups[0].group_name, "Ramesh");
    assert_eq!(view.groups[0].total_measure, 13.0);
    assert_eq!(view.groups[0].item_count, 2);
    assert_eq!(view.groups[2].group_name, "Others");
    assert_eq!(view.grand_total, 20.0);

    let sections = view.groups[0].sections.as_ref().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].section_name, "Long Haul");
    assert_eq!(sections[0].total_measure, 10.0);
  }

  #[test]
  fn conservation_of_totals_across_groups() {
    let view = build(&outcome(), range(), "MAIN", &ViewRequest::first_page(ReportKind::Trips));
    let sum: f64 = view.groups.iter().map(|g| g.total_measure).sum();
    assert_eq!(sum, view.grand_total);
    let count: usize = view.groups.iter().map(|g| g.item_count).sum();
    assert_eq!(count, 4);
  }

  #[test]
  fn sort_by_measure_desc_reorders_drivers() {
    let mut req = ViewRequest::first_page(ReportKind::Trips);
    req.sort = SortSpec {
      key: SortKey::Measure,
      direction: SortDirection::Desc,
    };
    let view = build(&outcome(), range(), "MAIN", &req);
    assert_eq!(view.groups[0].group_name, "Ramesh");
    assert_eq!(view.groups[1].group_name, "Suresh");
  }

  #[test]
  fn query_filters_before_grouping() {
    let mut req = ViewRequest::first_page(ReportKind::Trips);
    req.query = "suresh".into();
    let view = build(&outcome(), range(), "MAIN", &req);
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.grand_total, 5.0);
  }

  #[test]
  fn failed_fetch_yields_fetch_failed_status() {
    let failed = FetchOutcome {
      records: vec![],
      failed: true,
    };
    let view = build(&failed, range(), "MAIN", &ViewRequest::first_page(ReportKind::Trips));
    assert_eq!(view.status, ReportStatus::FetchFailed);
    assert!(view.groups.is_empty());
    // Empty views echo the requested page size, not a placeholder
    assert_eq!(view.page.size, ReportKind::Trips.page_size());
  }

  #[test]
  fn empty_data_yields_no_data_status() {
    let empty = FetchOutcome {
      records: vec![],
      failed: false,
    };
    let view = build(&empty, range(), "MAIN", &ViewRequest::first_page(ReportKind::Trips));
    assert_eq!(view.status, ReportStatus::NoData);
    assert_eq!(view.page.size, ReportKind::Trips.page_size());
  }
}

use crate::aggregate::{self, percentage};
use crate::fetch::FetchOutcome;
use crate::group::group_by;
use crate::model::{RangeInfo, ReportStatus, ReportView};
use crate::pipeline::{Searchable, filter_records, paginate, sort_buckets};
use crate::record::{AttendanceRecord, non_blank, parse_records};
use crate::reports::{ViewRequest, project_bucket};

impl Searchable for AttendanceRecord {
  fn search_fields(&self) -> Vec<String> {
    vec![self.staff_name.clone(), self.department.clone(), self.shift.clone()]
  }
}

/// Staff attendance: grouped by staff member, measure = attendance days
/// (present 1.0, half-day 0.5), plus a per-staff attendance percentage.
pub fn build(outcome: &FetchOutcome, range: RangeInfo, location: &str, req: &ViewRequest) -> ReportView {
  if outcome.failed {
    return ReportView::empty("attendance", range, location, ReportStatus::FetchFailed, req.page_size);
  }

  let records: Vec<AttendanceRecord> = parse_records(&outcome.records);
  let records = filter_records(records, &req.query);

  if records.is_empty() {
    return ReportView::empty("attendance", range, location, ReportStatus::NoData, req.page_size);
  }

  let buckets = group_by(records, |r| non_blank(&r.staff_name));
  let grand_total = aggregate::grand_total(&buckets, |r| r.attendance_value());
  let buckets = sort_buckets(buckets, req.sort, |r| r.attendance_value(), |r| r.date.clone());

  let (page_buckets, page) = paginate(&buckets, req.page_index, req.page_size);

  let groups = page_buckets
    .iter()
    .map(|bucket| {
      let mut group = project_bucket(bucket, |r| r.attendance_value());
      // Attendance ratio over recorded days; zero days guards to 0, not NaN
      group.percentage = Some(percentage(group.total_measure, bucket.items.len() as f64));
      group
    })
    .collect();

  ReportView {
    report: "attendance".into(),
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
      to: "2025-08-08".into(),
    }
  }

  fn entry(name: &str, status: &str, date: &str) -> serde_json::Value {
    serde_json::json!({"staff_name": name, "status": status, "date": date, "shift": "day"})
  }

  #[test]
  fn attendance_percentage_per_staff() {
    let outcome = FetchOutcome {
      records: vec![
        entry("Lakshmi", "present", "2025-08-01"),
        entry("Lakshmi", "absent", "2025-08-02"),
        entry("Lakshmi", "halfday", "2025-08-03"),
        entry("Velu", "present", "2025-08-01"),
      ],
      failed: false,
    };
    let view = build(&outcome, range(), "MAIN", &ViewRequest::first_page(ReportKind::Attendance));

    let lakshmi = &view.groups[0];
    assert_eq!(lakshmi.group_name, "Lakshmi");
    assert_eq!(lakshmi.total_measure, 1.5);
    assert_eq!(lakshmi.percentage, Some(50.0));

    let velu = &view.groups[1];
    assert_eq!(velu.percentage, Some(100.0));
  }

  #[test]
  fn unknown_status_counts_as_absent_not_nan() {
    let outcome = FetchOutcome {
      records: vec![entry("Velu", "", "2025-08-01")],
      failed: false,
    };
    let view = build(&outcome, range(), "MAIN", &ViewRequest::first_page(ReportKind::Attendance));
    let velu = &view.groups[0];
    assert_eq!(velu.total_measure, 0.0);
    assert_eq!(velu.percentage, Some(0.0));
  }
}

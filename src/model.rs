// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the serializable view model (report views, group views, page windows) consumed by presentation layers
// role: model/types
// outputs: Serializable structs with stable camelCase field names and no UI framework types
// invariants: Sum of group itemCounts equals filtered record count; sum of group totals equals grandTotal before rounding
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

/// Pagination summary for one evaluated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
  pub index: usize,
  pub size: usize,
  pub total_pages: usize,
  pub total_items: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportStatus {
  /// Data fetched and non-empty.
  Ok,
  /// Fetch succeeded but zero records survived filtering; distinct from a failure.
  NoData,
  /// Adapter failure; the view carries empty data and the user may retry.
  FetchFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeInfo {
  pub label: String,
  pub from: String,
  pub to: String,
}

/// Nested per-bucket breakdown (e.g. trip categories within a driver).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
  pub section_name: String,
  pub total_measure: f64,
  pub item_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
  pub group_name: String,
  pub items: Vec<serde_json::Value>,
  pub total_measure: f64,
  pub item_count: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sections: Option<Vec<SectionView>>,
  /// Attendance-style ratio; only some reports populate it.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub percentage: Option<f64>,
}

/// The plain serializable structure handed to presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
  pub report: String,
  pub range: RangeInfo,
  pub location: String,
  pub status: ReportStatus,
  pub groups: Vec<GroupView>,
  pub page: PageWindow,
  pub grand_total: f64,
}

impl ReportView {
  /// Empty view for a failed or record-less fetch. `page_size` echoes the
  /// request so the window stays consistent with a populated view's.
  pub fn empty(report: &str, range: RangeInfo, location: &str, status: ReportStatus, page_size: usize) -> Self {
    ReportView {
      report: report.to_string(),
      range,
      location: location.to_string(),
      status,
      groups: Vec::new(),
      page: PageWindow {
        index: 1,
        size: page_size.max(1),
        total_pages: 0,
        total_items: 0,
      },
      grand_total: 0.0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn view_serializes_camel_case() {
    let view = ReportView::empty(
      "trips",
      RangeInfo {
        label: "2025-08".into(),
        from: "2025-08-01".into(),
        to: "2025-09-01".into(),
      },
      "MAIN",
      ReportStatus::NoData,
      10,
    );
    let v = serde_json::to_value(&view).unwrap();

    assert_eq!(v["status"], "noData");
    assert_eq!(v["page"]["size"], 10);
    assert_eq!(v["page"]["totalPages"], 0);
    assert_eq!(v["grandTotal"], 0.0);
    assert!(v["groups"].as_array().unwrap().is_empty());
  }

  #[test]
  fn group_view_omits_absent_sections() {
    let g = GroupView {
      group_name: "Ramesh".into(),
      items: vec![],
      total_measure: 0.0,
      item_count: 0,
      sections: None,
      percentage: None,
    };
    let v = serde_json::to_value(&g).unwrap();
    assert!(v.get("sections").is_none());
    assert!(v.get("percentage").is_none());
    assert_eq!(v["groupName"], "Ramesh");
  }
}

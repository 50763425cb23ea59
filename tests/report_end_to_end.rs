mod common;

use assert_cmd::Command;

#[test]
fn trips_report_outputs_expected_shape() {
  let td = tempfile::TempDir::new().unwrap();
  let input = common::write_envelope(td.path(), "trips.json", common::trips_payload());

  let out = Command::cargo_bin("ops-activity-report")
    .unwrap()
    .args([
      "--report",
      "trips",
      "--from",
      "2025-08-01",
      "--to",
      "2025-09-01",
      "--input",
      input.to_str().unwrap(),
    ])
    .output()
    .unwrap();

  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["report"], "trips");
  assert_eq!(v["status"], "ok");
  assert_eq!(v["range"]["from"], "2025-08-01");
  assert_eq!(v["range"]["to"], "2025-09-01");

  let groups = v["groups"].as_array().unwrap();
  assert_eq!(groups.len(), 2);
  assert_eq!(groups[0]["groupName"], "Ramesh");
  assert_eq!(groups[0]["itemCount"], 2);
  assert_eq!(groups[0]["totalMeasure"], 14.0);
  assert_eq!(v["grandTotal"], 19.5);

  // Conservation: group counts cover every record exactly once
  let total: u64 = groups.iter().map(|g| g["itemCount"].as_u64().unwrap()).sum();
  assert_eq!(total, 3);
  // Pagination windows count buckets, not records
  assert_eq!(v["page"]["totalItems"], 2);
}

#[test]
fn attendance_report_carries_percentages() {
  let td = tempfile::TempDir::new().unwrap();
  let input = common::write_envelope(td.path(), "attendance.json", common::attendance_payload());

  let out = Command::cargo_bin("ops-activity-report")
    .unwrap()
    .args([
      "--report",
      "attendance",
      "--month",
      "2025-08",
      "--input",
      input.to_str().unwrap(),
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

  let lakshmi = &v["groups"][0];
  assert_eq!(lakshmi["groupName"], "Lakshmi");
  assert_eq!(lakshmi["totalMeasure"], 1.5);
  assert_eq!(lakshmi["percentage"], 75.0);

  let velu = &v["groups"][1];
  assert_eq!(velu["percentage"], 0.0);
}

#[test]
fn query_and_sort_flags_shape_the_view() {
  let td = tempfile::TempDir::new().unwrap();
  let input = common::write_envelope(td.path(), "trips.json", common::trips_payload());

  let out = Command::cargo_bin("ops-activity-report")
    .unwrap()
    .args([
      "--report",
      "trips",
      "--month",
      "2025-08",
      "--input",
      input.to_str().unwrap(),
      "--sort-by",
      "measure",
      "--sort-dir",
      "asc",
      "--query",
      "tn-",
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

  // Vehicle-number query matches every record; measure asc puts Suresh first
  let groups = v["groups"].as_array().unwrap();
  assert_eq!(groups[0]["groupName"], "Suresh");
  assert_eq!(groups[1]["groupName"], "Ramesh");
}

#[test]
fn failed_backend_yields_fetch_failed_not_error() {
  let td = tempfile::TempDir::new().unwrap();
  let path = td.path().join("bad.json");
  std::fs::write(&path, r#"{"success": false, "data": []}"#).unwrap();

  let out = Command::cargo_bin("ops-activity-report")
    .unwrap()
    .args([
      "--report",
      "stock",
      "--month",
      "2025-08",
      "--input",
      path.to_str().unwrap(),
    ])
    .output()
    .unwrap();

  assert!(out.status.success(), "fetch failure must not abort the run");
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["status"], "fetchFailed");
  assert_eq!(v["grandTotal"], 0.0);
  // Stock's page size survives into the empty view
  assert_eq!(v["page"]["size"], 15);
}

#[test]
fn malformed_measures_never_produce_nan() {
  let td = tempfile::TempDir::new().unwrap();
  let input = common::write_envelope(
    td.path(),
    "trips.json",
    serde_json::json!([
      {"driver": "Mani", "tonnage": null, "trip_date": "2025-08-02"},
      {"driver": "Mani", "tonnage": "not a number", "trip_date": "2025-08-03"},
      {"driver": "Mani", "tonnage": 2.5, "trip_date": "2025-08-04"}
    ]),
  );

  let out = Command::cargo_bin("ops-activity-report")
    .unwrap()
    .args([
      "--report",
      "trips",
      "--month",
      "2025-08",
      "--input",
      input.to_str().unwrap(),
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["grandTotal"], 2.5);
  assert_eq!(v["groups"][0]["itemCount"], 3);
}

#[test]
fn out_file_receives_the_report() {
  let td = tempfile::TempDir::new().unwrap();
  let input = common::write_envelope(td.path(), "trips.json", common::trips_payload());
  let out_path = td.path().join("report.json");

  Command::cargo_bin("ops-activity-report")
    .unwrap()
    .args([
      "--report",
      "trips",
      "--month",
      "2025-08",
      "--input",
      input.to_str().unwrap(),
      "--out",
      out_path.to_str().unwrap(),
    ])
    .assert()
    .success();

  let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&out_path).unwrap()).unwrap();
  assert_eq!(v["report"], "trips");
}

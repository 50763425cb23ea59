use std::path::{Path, PathBuf};

/// Write a fetch envelope to `dir` and return its path.
#[allow(dead_code)]
pub fn write_envelope(dir: &Path, name: &str, data: serde_json::Value) -> PathBuf {
  let envelope = serde_json::json!({"success": true, "data": data});
  let path = dir.join(name);
  std::fs::write(&path, serde_json::to_vec_pretty(&envelope).unwrap()).unwrap();
  path
}

/// Trip payload used across the CLI tests: two drivers, three trips.
#[allow(dead_code)]
pub fn trips_payload() -> serde_json::Value {
  serde_json::json!([
    {"driver": "Ramesh", "vehicle_number": "TN-09-1234", "trip_category": "Long Haul", "tonnage": 10.0, "trip_date": "2025-08-02"},
    {"driver": "Suresh", "vehicle_number": "TN-22-4411", "trip_category": "Local", "tonnage": 5.5, "trip_date": "2025-08-03"},
    {"driver": "Ramesh", "vehicle_number": "TN-09-1234", "trip_category": "Local", "tonnage": 4.0, "trip_date": "2025-08-04"}
  ])
}

#[allow(dead_code)]
pub fn attendance_payload() -> serde_json::Value {
  serde_json::json!([
    {"staff_name": "Lakshmi", "department": "Packing", "status": "present", "date": "2025-08-01", "shift": "day"},
    {"staff_name": "Lakshmi", "department": "Packing", "status": "halfday", "date": "2025-08-02", "shift": "day"},
    {"staff_name": "Velu", "department": "Loading", "status": "absent", "date": "2025-08-01", "shift": "night"}
  ])
}

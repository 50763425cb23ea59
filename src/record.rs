// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed activity records for each report kind, validated/defaulted at the fetch boundary
// role: model/records
// inputs: Raw serde_json::Value elements from a fetch envelope
// outputs: Per-report record structs with every field defaulted when absent or malformed
// invariants: Numeric measures are always finite (never NaN); a malformed element is skipped, never aborts the batch
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Deserializer, Serialize};

use crate::ext::serde_json::JsonPull;

/// Deserialize a measure leniently: numbers, numeric strings, and anything else
/// (null, garbage text) collapse to a finite f64, defaulting to 0.0.
fn measure<'de, D>(d: D) -> Result<f64, D::Error>
where
  D: Deserializer<'de>,
{
  let v = serde_json::Value::deserialize(d)?;
  Ok(v.pull("").as_measure())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRecord {
  #[serde(alias = "DriverName")]
  pub driver: String,
  #[serde(alias = "VehicleNumber")]
  pub vehicle_number: String,
  #[serde(alias = "TripCategory")]
  pub trip_category: String,
  #[serde(alias = "Tonnage", deserialize_with = "measure")]
  pub tonnage: f64,
  #[serde(alias = "TripDate")]
  pub trip_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementRecord {
  #[serde(alias = "StockItem")]
  pub stock_item: String,
  #[serde(alias = "Stock_Group")]
  pub stock_group: String,
  #[serde(alias = "Godown")]
  pub godown: String,
  /// "inward" or "outward"; compared case-insensitively.
  #[serde(alias = "Direction")]
  pub direction: String,
  #[serde(alias = "Quantity", deserialize_with = "measure")]
  pub quantity: f64,
  #[serde(alias = "Date")]
  pub date: String,
}

impl MovementRecord {
  pub fn is_inward(&self) -> bool {
    self.direction.eq_ignore_ascii_case("inward")
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceRecord {
  #[serde(alias = "StaffName")]
  pub staff_name: String,
  #[serde(alias = "Department")]
  pub department: String,
  /// "present", "absent", or "halfday"; anything else counts as absent.
  #[serde(alias = "Status")]
  pub status: String,
  #[serde(alias = "Date")]
  pub date: String,
  #[serde(alias = "Shift")]
  pub shift: String,
}

impl AttendanceRecord {
  /// Attendance contribution of one entry: present 1.0, half-day 0.5, else 0.0.
  pub fn attendance_value(&self) -> f64 {
    if self.status.eq_ignore_ascii_case("present") {
      1.0
    } else if self.status.eq_ignore_ascii_case("halfday") {
      0.5
    } else {
      0.0
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceRecord {
  #[serde(alias = "PartyName")]
  pub party: String,
  #[serde(alias = "VoucherNumber")]
  pub voucher_number: String,
  /// "purchase" or "sales"; compared case-insensitively.
  #[serde(alias = "VoucherType")]
  pub voucher_type: String,
  #[serde(alias = "Amount", deserialize_with = "measure")]
  pub amount: f64,
  #[serde(alias = "Date")]
  pub date: String,
}

impl InvoiceRecord {
  pub fn is_purchase(&self) -> bool {
    self.voucher_type.eq_ignore_ascii_case("purchase")
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockRecord {
  #[serde(alias = "ItemName", alias = "StockItem")]
  pub item_name: String,
  #[serde(alias = "Stock_Group")]
  pub stock_group: String,
  #[serde(alias = "Quantity", deserialize_with = "measure")]
  pub quantity: f64,
  #[serde(alias = "Rate", deserialize_with = "measure")]
  pub rate: f64,
}

impl StockRecord {
  pub fn value(&self) -> f64 {
    self.quantity * self.rate
  }
}

/// Turn a blank or whitespace-only key into None so grouping can route it to
/// the sentinel bucket.
pub fn non_blank(s: &str) -> Option<String> {
  let t = s.trim();
  if t.is_empty() { None } else { Some(t.to_string()) }
}

/// Parse envelope elements into typed records, one element at a time.
///
/// A single malformed element (e.g. a bare string where an object was expected)
/// is logged and skipped; it must never abort the rest of the batch.
pub fn parse_records<T: serde::de::DeserializeOwned>(data: &[serde_json::Value]) -> Vec<T> {
  let mut out: Vec<T> = Vec::with_capacity(data.len());

  for (i, el) in data.iter().enumerate() {
    match serde_json::from_value::<T>(el.clone()) {
      Ok(rec) => out.push(rec),
      Err(err) => log::warn!("skipping malformed record at index {}: {}", i, err),
    }
  }

  out
}

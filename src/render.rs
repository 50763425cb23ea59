use anyhow::Result;
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz as ChronoTz;

use crate::aggregate::round2;
use crate::model::ReportView;

/// Project a view to its final JSON. This is the only place numbers are
/// rounded: totals stay full-precision through the whole pipeline and get two
/// decimals exactly once, here.
pub fn project(view: &ReportView) -> Result<serde_json::Value> {
  let mut v = serde_json::to_value(view)?;

  if let Some(total) = v.get_mut("grandTotal") {
    *total = serde_json::json!(round2(view.grand_total));
  }

  if let Some(groups) = v.get_mut("groups").and_then(|g| g.as_array_mut()) {
    for group in groups.iter_mut() {
      round_field(group, "totalMeasure");
      round_field(group, "percentage");
      if let Some(sections) = group.get_mut("sections").and_then(|s| s.as_array_mut()) {
        for section in sections.iter_mut() {
          round_field(section, "totalMeasure");
        }
      }
    }
  }

  Ok(v)
}

fn round_field(obj: &mut serde_json::Value, key: &str) {
  if let Some(n) = obj.get(key).and_then(|v| v.as_f64()) {
    obj[key] = serde_json::json!(round2(n));
  }
}

/// Format an epoch instant as RFC3339 in the requested display timezone.
/// Unknown zone names fall back to UTC.
pub fn iso_in_tz(epoch: i64, tz: &str) -> String {
  let dt_utc = match Utc.timestamp_opt(epoch, 0).single() {
    Some(dt) => dt,
    None => return String::new(),
  };

  if tz.eq_ignore_ascii_case("local") {
    return dt_utc
      .with_timezone(&Local)
      .to_rfc3339_opts(SecondsFormat::Secs, true);
  }

  if tz.eq_ignore_ascii_case("utc") {
    return dt_utc.to_rfc3339_opts(SecondsFormat::Secs, true);
  }

  match tz.parse::<ChronoTz>() {
    Ok(zone) => zone
      .from_utc_datetime(&dt_utc.naive_utc())
      .to_rfc3339_opts(SecondsFormat::Secs, true),
    Err(_) => dt_utc.to_rfc3339_opts(SecondsFormat::Secs, true),
  }
}

/// Timestamp label for manifests, `%Y-%m-%dT%H:%M:%S` in local time.
pub fn manifest_stamp(now: DateTime<Local>) -> String {
  now.format("%Y-%m-%dT%H:%M:%S").to_string()
}

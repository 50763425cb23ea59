// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build and write the run manifest for multi-range report runs
// role: persistence/manifest
// inputs: report kind label, location, generated_at, base_dir, RangeEntry[]
// outputs: manifest.json file written under base_dir
// side_effects: Writes to filesystem
// invariants:
// - manifest contains ranges[] in chronological order of entries provided
// - file paths in entries are relative to base_dir and point to report-<label>.json
// - generated_at is serialized in %Y-%m-%dT%H:%M:%S (local)
// errors: IO errors surfaced with full path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::render::manifest_stamp;

/// Helper to build and write the manifest for multi-range runs.
pub struct RunManifest {
  value: serde_json::Value,
}

impl RunManifest {
  pub fn new(report: &str, location: &str, generated_at: DateTime<Local>) -> Self {
    let mut v = serde_json::json!({
      "report": report,
      "location": location,
      "generatedAt": manifest_stamp(generated_at),
      "ranges": [],
    });
    // ensure ranges is an array
    let _ = v["ranges"].as_array_mut().expect("ranges array");
    Self { value: v }
  }

  pub fn push_entry(&mut self, entry: &RangeEntry) {
    let item = serde_json::json!({
      "label": entry.label,
      "range": {"from": entry.from, "to": entry.to},
      "file": entry.file,
    });
    self.value["ranges"].as_array_mut().unwrap().push(item);
  }

  pub fn write_to(&self, base_dir: &str) -> Result<std::path::PathBuf> {
    let path = std::path::Path::new(base_dir).join("manifest.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&self.value)?)?;
    Ok(path)
  }

  #[allow(dead_code)]
  pub fn as_value(&self) -> &serde_json::Value {
    &self.value
  }
}

pub struct RangeEntry {
  pub label: String,
  pub from: String,
  pub to: String,
  pub file: String,
}

pub fn write_run_manifest(
  report: &str,
  location: &str,
  generated_at: DateTime<Local>,
  base_dir: &str,
  entries: &[RangeEntry],
) -> Result<std::path::PathBuf> {
  let mut manifest = RunManifest::new(report, location, generated_at);
  for e in entries {
    manifest.push_entry(e);
  }
  manifest.write_to(base_dir)
}

// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for output directories, deterministic "now" handling, and man page rendering
// role: utilities/helpers
// inputs: Paths; optional DateTime overrides; clap CommandFactory
// outputs: Directories ensured, man page text, effective now instants
// side_effects: prepare_out_dir creates directories
// invariants:
// - prepare_out_dir returns an existing directory (either provided or temp timestamped)
// errors: IO errors bubble with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::CommandFactory;

/// Returns the effective "now" given an optional override.
///
/// Centralizes test determinism without sprinkling `Local::now()` throughout
/// the code.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

/// Prepare an output directory for multi-range or dashboard runs.
///
/// - When `out` is not "-", it is treated as the target directory; it will be created if needed.
/// - When `out` is "-", a temp directory is created with a timestamped name.
///   Returns the absolute path as a String.
pub fn prepare_out_dir(out: &str, now_opt: Option<DateTime<Local>>) -> Result<String> {
  let dir = if out != "-" {
    out.to_string()
  } else {
    let eff_now = effective_now(now_opt);
    std::env::temp_dir()
      .join(format!("ops-report-{}", eff_now.format("%Y%m%d-%H%M%S")))
      .to_string_lossy()
      .to_string()
  };
  std::fs::create_dir_all(&dir)?;

  Ok(dir)
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}

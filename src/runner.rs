// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate per-range report generation: fetch, build views, save artifacts; assemble manifest for multi-range runs
// role: processing/orchestrator
// inputs: EffectiveConfig (with multi_windows), Vec<LabeledRange>, optional now
// outputs: Files on disk (reports, manifest.json) or JSON on stdout per state
// side_effects: Creates directories; writes JSON files; prints to stdout; issues backend fetches
// invariants:
// - base_dir is prepared when multi_windows
// - per-range report file name is report-<label>.json when written to disk
// - multi_windows ⇒ manifest.json exists and pointer {dir, manifest} printed
// - dashboard sections are fetched fan-out/fan-in; a section never mixes two ranges
// - page index resets to 1 for every range beyond an explicit single-range request
// errors: Propagates window/save/write errors; fetch failures degrade inside the views
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use rayon::prelude::*;

use crate::cli::EffectiveConfig;
use crate::fetch::{FetchOutcome, Generation, ReportRequest, fetch_records};
use crate::manifest::{RangeEntry, write_run_manifest};
use crate::model::RangeInfo;
use crate::render;
use crate::reports::{ReportKind, ViewRequest, build_view};
use crate::util;
use crate::window::LabeledRange;

fn range_info(range: &LabeledRange) -> RangeInfo {
  RangeInfo {
    label: range.label.clone(),
    from: range.from.clone(),
    to: range.to.clone(),
  }
}

fn report_request(cfg: &EffectiveConfig, range: &LabeledRange) -> ReportRequest {
  ReportRequest {
    from_date: range.from.clone(),
    to_date: range.to.clone(),
    location: cfg.location.clone(),
  }
}

/// View parameters for one evaluation. `fresh` forces page 1: every range of a
/// multi-range run is a new criteria set, so a stale page index never leaks in.
fn view_request(cfg: &EffectiveConfig, kind: ReportKind, fresh: bool) -> ViewRequest {
  ViewRequest {
    query: cfg.query.clone(),
    sort: cfg.sort,
    page_index: if fresh { 1 } else { cfg.page },
    page_size: cfg.page_size.unwrap_or_else(|| kind.page_size()),
  }
}

/// Build the JSON for one (kind, range) pair: a single section report, or the
/// dashboard with all sections fetched in parallel.
pub fn generate_range_report(
  cfg: &EffectiveConfig,
  range: &LabeledRange,
  fresh_page: bool,
  now_opt: Option<chrono::DateTime<chrono::Local>>,
  generation: &Generation,
) -> Result<serde_json::Value> {
  if cfg.report == ReportKind::All {
    return build_dashboard(cfg, range, fresh_page, now_opt, generation);
  }

  let outcome = fetch_records(cfg.source(), cfg.report.endpoint(), &report_request(cfg, range));
  let req = view_request(cfg, cfg.report, fresh_page);
  let view = build_view(cfg.report, &outcome, range_info(range), &cfg.location, &req);

  render::project(&view)
}

/// Dashboard: fan out one fetch per section, join, then build every section
/// view from its own resolved outcome. Each fetch is tagged with the request
/// generation current at issue time; the caller advances the generation when
/// its criteria change, so a superseded response is discarded on join rather
/// than mixed into newer state.
fn build_dashboard(
  cfg: &EffectiveConfig,
  range: &LabeledRange,
  fresh_page: bool,
  now_opt: Option<chrono::DateTime<chrono::Local>>,
  generation: &Generation,
) -> Result<serde_json::Value> {
  let request = report_request(cfg, range);

  let fetched: Vec<(ReportKind, u64, FetchOutcome)> = ReportKind::sections()
    .to_vec()
    .into_par_iter()
    .map(|kind| {
      let token = generation.current();
      let outcome = fetch_records(cfg.source(), kind.endpoint(), &request);
      (kind, token, outcome)
    })
    .collect();

  let sections = assemble_sections(cfg, range, fresh_page, generation, fetched)?;

  let now = util::effective_now(now_opt);
  Ok(serde_json::json!({
    "report": "dashboard",
    "range": {"label": range.label, "from": range.from, "to": range.to},
    "location": cfg.location,
    "generatedAt": render::iso_in_tz(now.timestamp(), cfg.tz.label()),
    "timezone": cfg.tz.label(),
    "sections": sections,
  }))
}

/// Fold joined section responses into the dashboard map, dropping any response
/// whose generation token has been superseded since it was issued.
fn assemble_sections(
  cfg: &EffectiveConfig,
  range: &LabeledRange,
  fresh_page: bool,
  generation: &Generation,
  fetched: Vec<(ReportKind, u64, FetchOutcome)>,
) -> Result<serde_json::Map<String, serde_json::Value>> {
  let mut sections = serde_json::Map::new();

  for (kind, token, outcome) in fetched {
    if !generation.is_current(token) {
      log::warn!("discarding stale {} response", kind.label());
      continue;
    }
    let req = view_request(cfg, kind, fresh_page);
    let view = build_view(kind, &outcome, range_info(range), &cfg.location, &req);
    sections.insert(kind.label().to_string(), render::project(&view)?);
  }

  Ok(sections)
}

/// Persist one range's report and return the manifest entry (multi-range runs)
/// or the JSON to print (single-range runs).
pub fn save_range_report(
  cfg: &EffectiveConfig,
  range: &LabeledRange,
  report: serde_json::Value,
  base_dir_opt: Option<&str>,
) -> Result<(Option<RangeEntry>, Option<serde_json::Value>)> {
  let mut print_json: Option<serde_json::Value> = None;
  let file_rel = base_dir_opt.map(|_| format!("report-{}.json", range.label));

  if let Some(base_dir) = base_dir_opt {
    let file_path = std::path::Path::new(base_dir).join(file_rel.as_ref().expect("file name for multi"));
    std::fs::write(&file_path, serde_json::to_vec_pretty(&report)?)?;
  } else if cfg.out != "-" {
    let out_path = std::path::Path::new(&cfg.out);
    if let Some(parent) = out_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out_path, serde_json::to_vec_pretty(&report)?)?;
  } else {
    print_json = Some(report);
  }

  let entry = if cfg.multi_windows {
    Some(RangeEntry {
      label: range.label.clone(),
      from: range.from.clone(),
      to: range.to.clone(),
      file: file_rel.expect("file name for multi"),
    })
  } else {
    None
  };
  Ok((entry, print_json))
}

pub fn process_ranges(
  cfg: &EffectiveConfig,
  ranges: Vec<LabeledRange>,
  now_opt: Option<chrono::DateTime<chrono::Local>>,
) -> Result<()> {
  let base_dir_opt = if cfg.multi_windows {
    Some(util::prepare_out_dir(&cfg.out, now_opt)?)
  } else {
    None
  };

  let mut entries: Vec<RangeEntry> = Vec::new();
  let mut last_single_output: Option<serde_json::Value> = None;
  let generation = Generation::new();

  for r in ranges.iter() {
    // Each range is a fresh criteria set; anything still in flight for the
    // previous one is superseded.
    generation.advance();
    let report = generate_range_report(cfg, r, cfg.multi_windows, now_opt, &generation)?;
    let (entry, to_print) = save_range_report(cfg, r, report, base_dir_opt.as_deref())?;
    if let Some(e) = entry {
      entries.push(e);
    }
    if let Some(v) = to_print {
      last_single_output = Some(v);
    }
  }

  if cfg.multi_windows {
    let base_dir = base_dir_opt.as_deref().expect("base_dir for multi");
    let _manifest_path = write_run_manifest(
      cfg.report.label(),
      &cfg.location,
      util::effective_now(now_opt),
      base_dir,
      &entries,
    )?;
    println!(
      "{}",
      serde_json::to_string_pretty(&serde_json::json!({"dir": base_dir, "manifest": "manifest.json"}))?
    );
    return Ok(());
  }

  if let Some(v) = last_single_output {
    println!("{}", serde_json::to_string_pretty(&v)?);
  }
  Ok(())
}

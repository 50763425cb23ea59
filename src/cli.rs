use anyhow::{Result, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fetch::PayloadSource;
use crate::pipeline::{SortDirection, SortKey, SortSpec};
use crate::reports::ReportKind;
use crate::window::{Tz, WindowSpec};

#[derive(Parser, Debug)]
#[command(
    name = "ops-activity-report",
    version,
    about = "Turn ERP activity feeds into grouped, totaled, paginated JSON reports",
    long_about = None
)]
pub struct Cli {
  /// Report to build (or `all` for the full dashboard)
  #[arg(long, value_enum, default_value_t = ReportKind::All)]
  pub report: ReportKind,

  /// Calendar month, e.g. 2025-08
  #[arg(long)]
  pub month: Option<String>,

  /// Natural language window, e.g. "last week" or "every month for the last 6 months"
  #[arg(long = "for")]
  pub for_str: Option<String>,

  /// Custom from date (YYYY-MM-DD); must be paired with --to
  #[arg(long, alias = "since")]
  pub from: Option<String>,

  /// Custom to date (exclusive); must be paired with --from
  #[arg(long, alias = "until")]
  pub to: Option<String>,

  /// Location filter forwarded to the backend (e.g. MAIN, BRANCH2)
  #[arg(long, default_value = "all")]
  pub location: String,

  /// Free-text filter applied across a report's searchable fields
  #[arg(long, default_value = "")]
  pub query: String,

  /// Bucket sort key
  #[arg(long, value_enum, default_value_t = SortKey::Name)]
  pub sort_by: SortKey,

  /// Sort direction
  #[arg(long, value_enum, default_value_t = SortDirection::Asc)]
  pub sort_dir: SortDirection,

  /// 1-based page of group buckets
  #[arg(long, default_value_t = 1)]
  pub page: usize,

  /// Override the report's built-in page size
  #[arg(long)]
  pub page_size: Option<usize>,

  /// Backend base URL, e.g. https://erp.example.com/api
  #[arg(long)]
  pub base_url: Option<String>,

  /// Read the fetch envelope from a saved payload file instead of the backend
  #[arg(long)]
  pub input: Option<PathBuf>,

  /// Output location:
  /// - single report: file path (default stdout "-")
  /// - multi-range or dashboard runs: base directory (default: auto-named temp dir)
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Timezone for display timestamps in output (label only)
  #[arg(long, value_enum, default_value_t = Tz::Local)]
  pub tz: Tz,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for window resolution (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub report: ReportKind,
  pub window: WindowSpec,
  pub multi_windows: bool,
  pub location: String,
  pub query: String,
  pub sort: SortSpec,
  pub page: usize,
  pub page_size: Option<usize>,
  #[serde(skip)]
  pub source: Option<PayloadSource>,
  pub out: String,
  pub tz: Tz,
  pub now_override: Option<String>,
}

impl EffectiveConfig {
  pub fn source(&self) -> &PayloadSource {
    self.source.as_ref().expect("normalize always sets a source")
  }
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate window selection
  let window = match (&cli.month, &cli.for_str, &cli.from, &cli.to) {
    (Some(ym), None, None, None) => WindowSpec::Month { ym: ym.clone() },
    (None, Some(p), None, None) => WindowSpec::ForPhrase { phrase: p.clone() },
    (None, None, Some(f), Some(t)) => WindowSpec::FromTo {
      from: f.clone(),
      to: t.clone(),
    },
    (None, None, None, None) => {
      bail!("Provide one of --month, --for, or (--from AND --to)")
    }
    _ => bail!("Ambiguous time selection: choose only one of --month | --for | --from/--to"),
  };

  // Validate payload source selection
  let source = match (&cli.base_url, &cli.input) {
    (Some(url), None) => PayloadSource::Remote { base_url: url.clone() },
    (None, Some(path)) => PayloadSource::File {
      path: path.to_string_lossy().to_string(),
    },
    (None, None) => bail!("Provide one of --base-url or --input"),
    _ => bail!("Choose only one of --base-url | --input"),
  };

  Ok(EffectiveConfig {
    report: cli.report,
    window,
    multi_windows: false, // NOTE: set as default but can be overriden
    location: cli.location,
    query: cli.query,
    sort: SortSpec {
      key: cli.sort_by,
      direction: cli.sort_dir,
    },
    page: cli.page,
    page_size: cli.page_size,
    source: Some(source),
    out: cli.out,
    tz: cli.tz,
    now_override: cli.now_override.clone(),
  })
}

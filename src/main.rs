use anyhow::Result;
use clap::Parser;

mod aggregate;
mod cli;
mod ext;
mod fetch;
mod group;
mod manifest;
mod model;
mod pipeline;
mod record;
mod render;
mod reports;
mod runner;
mod util;
mod window;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  env_logger::init();

  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let mut cfg = normalize(cli)?;

  // Phase 2: resolve now and ranges
  let now_opt = crate::window::parse_now(cfg.now_override.as_deref());
  let ranges = crate::window::resolve_ranges(&cfg.window, now_opt)?;
  cfg.multi_windows = ranges.len() > 1;

  // Phase 3: process ranges (single or multi) in a unified flow
  crate::runner::process_ranges(&cfg, ranges, now_opt)
}

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use chrono_english::{Interval, parse_duration};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use two_timer::parse as parse_natural;

// Date-window types live here to keep main focused. The backend takes plain
// ISO dates (`YYYY-MM-DD`); every range below is half-open with `to` exclusive.

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Tz {
  Local,
  Utc,
}

impl Tz {
  pub fn label(&self) -> &'static str {
    match self {
      Tz::Local => "local",
      Tz::Utc => "utc",
    }
  }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum WindowSpec {
  Month { ym: String },
  ForPhrase { phrase: String },
  FromTo { from: String, to: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabeledRange {
  pub label: String,
  pub from: String,
  pub to: String,
}

fn iso_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn month_bounds(year_month: &str) -> Result<(String, String)> {
  let parts: Vec<&str> = year_month.split('-').collect();

  if parts.len() != 2 {
    bail!("invalid --month, expected YYYY-MM");
  }
  let y: i32 = parts[0].parse().context("parsing year in --month")?;
  let m: u32 = parts[1].parse().context("parsing month in --month")?;

  let start = NaiveDate::from_ymd_opt(y, m, 1).with_context(|| format!("invalid month in --month: {year_month}"))?;
  let (ny, nm) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
  let end = NaiveDate::from_ymd_opt(ny, nm, 1).expect("first of month");

  Ok((iso_date(start), iso_date(end)))
}

/// Parse a `--now-override` string into a local DateTime.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a bare `YYYY-MM-DD` date.
pub fn parse_now(s: Option<&str>) -> Option<DateTime<Local>> {
  s.and_then(|raw| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Local))
      .or_else(|| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
          .ok()
          .and_then(|d| d.and_hms_opt(0, 0, 0))
          .and_then(|ndt| ndt.and_local_timezone(Local).single())
      })
  })
}

fn start_of_week(d: NaiveDate) -> NaiveDate {
  d - Duration::days(d.weekday().num_days_from_monday() as i64)
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
  NaiveDate::from_ymd_opt(d.year(), d.month(), 1).expect("first of month")
}

fn months_back(d: NaiveDate, n: u32) -> NaiveDate {
  let total = d.year() * 12 + d.month() as i32 - 1 - n as i32;
  let y = total.div_euclid(12);
  let m = (total.rem_euclid(12) + 1) as u32;
  NaiveDate::from_ymd_opt(y, m, 1).expect("first of month")
}

/// Compute (from, to) dates for a single-range window.
///
/// Takes an optional `now` override for deterministic tests.
pub fn compute_window_dates(window: &WindowSpec, now: Option<DateTime<Local>>) -> Result<(String, String)> {
  match window {
    WindowSpec::FromTo { from, to } => Ok((from.clone(), to.clone())),
    WindowSpec::Month { ym } => month_bounds(ym),
    WindowSpec::ForPhrase { phrase } => for_phrase_bounds(phrase, now),
  }
}

/// Compute date bounds for a natural-language phrase.
///
/// Explicit anchors cover the phrases the date pickers offer (today, yesterday,
/// last week, last month, last <weekday>); durations and other natural ranges
/// fall through to chrono-english and two_timer.
fn for_phrase_bounds(input: &str, now: Option<DateTime<Local>>) -> Result<(String, String)> {
  let phrase = input.trim().to_lowercase();
  let today = now.unwrap_or_else(Local::now).date_naive();

  if phrase == "today" {
    return Ok((iso_date(today), iso_date(today + Duration::days(1))));
  }

  if phrase == "yesterday" {
    return Ok((iso_date(today - Duration::days(1)), iso_date(today)));
  }

  // Previous calendar week, Monday to Monday
  if phrase == "last week" {
    let start_this = start_of_week(today);
    return Ok((iso_date(start_this - Duration::days(7)), iso_date(start_this)));
  }

  // First of last month to first of this month
  if phrase == "last month" {
    let start_this = first_of_month(today);
    return Ok((iso_date(months_back(today, 1)), iso_date(start_this)));
  }

  // last <weekday>: the strictly previous occurrence, through today
  if let Some(caps) = regex::Regex::new(r"^last\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)$")
    .unwrap()
    .captures(&phrase)
  {
    let target_idx = match caps.get(1).unwrap().as_str() {
      "monday" => 0,
      "tuesday" => 1,
      "wednesday" => 2,
      "thursday" => 3,
      "friday" => 4,
      "saturday" => 5,
      _ => 6,
    } as i64;

    let cur_idx = today.weekday().num_days_from_monday() as i64;
    let mut delta_days = cur_idx - target_idx;
    if delta_days <= 0 {
      delta_days += 7;
    }

    return Ok((
      iso_date(today - Duration::days(delta_days)),
      iso_date(today + Duration::days(1)),
    ));
  }

  // Durations and "ago" phrases via chrono-english
  if let Ok(interval) = parse_duration(&phrase) {
    let from = match interval {
      // Sub-day durations stay within today at date granularity
      Interval::Seconds(_) => today,
      Interval::Days(days) => today - Duration::days(days.unsigned_abs() as i64),
      Interval::Months(months) => months_back(today, months.unsigned_abs()),
    };
    return Ok((iso_date(from), iso_date(today + Duration::days(1))));
  }

  // Other natural ranges via two_timer (e.g. "last year", "august 2025")
  if let Ok((start_naive, end_naive, _lit)) = parse_natural(&phrase, None) {
    let from = start_naive.date();
    let end = end_naive.date();
    let cap = today + Duration::days(1);
    let to = if end > cap { cap } else { end };
    return Ok((iso_date(from), iso_date(to)));
  }

  bail!("unrecognized --for phrase: {input:?}")
}

/// Resolve a window into one or more labeled ranges.
///
/// Multi-bucket phrases ("every month for the last 3 months") yield one range
/// per bucket in chronological order; everything else yields a single range.
pub fn resolve_ranges(window: &WindowSpec, now: Option<DateTime<Local>>) -> Result<Vec<LabeledRange>> {
  if let WindowSpec::ForPhrase { phrase } = window {
    if let Some(buckets) = for_phrase_buckets(phrase, now) {
      return Ok(buckets);
    }
  }

  let (from, to) = compute_window_dates(window, now)?;
  let label = match window {
    WindowSpec::Month { ym } => ym.clone(),
    _ => "window".to_string(),
  };

  Ok(vec![LabeledRange { label, from, to }])
}

/// Build labeled ranges for multi-bucket phrases; None when the phrase is not
/// a multi-bucket request.
fn for_phrase_buckets(input: &str, now: Option<DateTime<Local>>) -> Option<Vec<LabeledRange>> {
  let phrase = input.trim().to_lowercase();
  let today = now.unwrap_or_else(Local::now).date_naive();

  // every month for the last N months
  if let Some(caps) = regex::Regex::new(r"^every\s+month\s+for\s+the\s+last\s+(\d+)\s+months?$")
    .ok()?
    .captures(&phrase)
  {
    let n: u32 = caps.get(1).unwrap().as_str().parse().ok()?;
    let mut out: Vec<LabeledRange> = Vec::new();
    let mut cursor = first_of_month(today);

    for _ in 0..n {
      let start = months_back(cursor, 1);
      out.push(LabeledRange {
        label: format!("{:04}-{:02}", start.year(), start.month()),
        from: iso_date(start),
        to: iso_date(cursor),
      });
      cursor = start;
    }
    out.reverse();
    return Some(out);
  }

  // every week for the last N weeks
  if let Some(caps) = regex::Regex::new(r"^every\s+week\s+for\s+the\s+last\s+(\d+)\s+weeks?$")
    .ok()?
    .captures(&phrase)
  {
    let n: u32 = caps.get(1).unwrap().as_str().parse().ok()?;
    let mut out: Vec<LabeledRange> = Vec::new();
    let mut cursor = start_of_week(today);

    for _ in 0..n {
      let start = cursor - Duration::days(7);
      let iso = start.iso_week();
      out.push(LabeledRange {
        label: format!("{}-W{:02}", iso.year(), iso.week()),
        from: iso_date(start),
        to: iso_date(cursor),
      });
      cursor = start;
    }
    out.reverse();
    return Some(out);
  }

  None
}

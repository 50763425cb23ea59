use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;

use crate::ext::serde_json::JsonPull;

/// Parameters of one backend request; dates are ISO `YYYY-MM-DD`, `to` exclusive.
#[derive(Debug, Clone)]
pub struct ReportRequest {
  pub from_date: String,
  pub to_date: String,
  pub location: String,
}

/// Where raw payloads come from: the remote backend or a saved payload file
/// (offline replay, also what the integration tests feed).
#[derive(Debug, Clone)]
pub enum PayloadSource {
  Remote { base_url: String },
  File { path: String },
}

/// Result of one fetch. A failure carries empty records and `failed=true`;
/// it is logged here and never propagated as an error into rendering.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
  pub records: Vec<serde_json::Value>,
  pub failed: bool,
}

impl FetchOutcome {
  fn failed() -> Self {
    FetchOutcome {
      records: Vec::new(),
      failed: true,
    }
  }
}

/// Envelope contract: `success` and `data` are required; backends attach extra
/// keys (pagination echoes etc.) which are allowed and ignored.
static ENVELOPE_VALIDATOR: Lazy<jsonschema::Validator> = Lazy::new(|| {
  let schema = serde_json::json!({
    "type": "object",
    "required": ["success", "data"],
    "properties": {
      "success": { "type": "boolean" },
      "data": { "type": "array" }
    }
  });
  jsonschema::validator_for(&schema).expect("envelope schema compiles")
});

/// Monotonic request-generation counter.
///
/// Each issued fetch is tagged with the generation current at issue time; when
/// the driving criteria change, `advance` invalidates everything in flight so
/// a late response cannot overwrite newer state.
#[derive(Debug, Default)]
pub struct Generation {
  counter: AtomicU64,
}

impl Generation {
  pub fn new() -> Self {
    Generation::default()
  }

  pub fn current(&self) -> u64 {
    self.counter.load(Ordering::SeqCst)
  }

  /// Invalidate everything in flight. The runner bumps this whenever the
  /// driving criteria change, before issuing replacement fetches.
  pub fn advance(&self) -> u64 {
    self.counter.fetch_add(1, Ordering::SeqCst) + 1
  }

  pub fn is_current(&self, token: u64) -> bool {
    self.counter.load(Ordering::SeqCst) == token
  }
}

/// Fetch raw records for one report endpoint.
///
/// Mirrors the backend contract `{success: bool, data: [...]}`. Every failure
/// mode (IO, HTTP, bad JSON, envelope mismatch, success=false) degrades to an
/// empty outcome so a report renders its no-data state instead of aborting.
pub fn fetch_records(source: &PayloadSource, endpoint: &str, req: &ReportRequest) -> FetchOutcome {
  let envelope = match source {
    PayloadSource::File { path } => match read_file_envelope(path) {
      Some(v) => v,
      None => return FetchOutcome::failed(),
    },
    PayloadSource::Remote { base_url } => match call_backend(base_url, endpoint, req) {
      Some(v) => v,
      None => return FetchOutcome::failed(),
    },
  };

  // Guard: envelope must match the contract
  if let Err(err) = ENVELOPE_VALIDATOR.validate(&envelope) {
    log::warn!("{} envelope failed validation: {}", endpoint, err);
    return FetchOutcome::failed();
  }

  // Guard: backend must report success
  if !envelope.pull("success").to_or_default::<bool>() {
    log::warn!("{} backend reported success=false", endpoint);
    return FetchOutcome::failed();
  }

  let records = envelope.pull("data").to_or_default::<Vec<serde_json::Value>>();
  log::debug!("{} fetched {} records", endpoint, records.len());

  FetchOutcome { records, failed: false }
}

fn read_file_envelope(path: &str) -> Option<serde_json::Value> {
  let bytes = match std::fs::read(path) {
    Ok(b) => b,
    Err(err) => {
      log::warn!("reading payload file {}: {}", path, err);
      return None;
    }
  };

  match serde_json::from_slice(&bytes) {
    Ok(v) => Some(v),
    Err(err) => {
      log::warn!("parsing payload file {}: {}", path, err);
      None
    }
  }
}

fn call_backend(base_url: &str, endpoint: &str, req: &ReportRequest) -> Option<serde_json::Value> {
  let url = format!("{}/{}", base_url.trim_end_matches('/'), endpoint);
  let agent = ureq::AgentBuilder::new().build();

  let mut request = agent
    .get(&url)
    .query("fromDate", &req.from_date)
    .query("toDate", &req.to_date)
    .query("location", &req.location)
    .set("Accept", "application/json");

  // A bare bearer token; absent token means an unauthenticated request.
  if let Ok(token) = std::env::var("OPS_API_TOKEN") {
    request = request.set("Authorization", &format!("Bearer {}", token));
  }

  log::debug!("GET {} [{}..{}]", url, req.from_date, req.to_date);

  let response = match request.call() {
    Ok(resp) => resp,
    Err(err) => {
      log::warn!("{} request failed: {}", endpoint, err);
      return None;
    }
  };

  match response.into_json() {
    Ok(v) => Some(v),
    Err(err) => {
      log::warn!("{} response was not JSON: {}", endpoint, err);
      None
    }
  }
}

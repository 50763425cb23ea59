// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Lenient nested JSON access for dynamic ERP payloads: dotted-path fetch plus zero-defaulting numeric coercion
// role: extension/serde_json
// outputs: JsonPull trait and JsonPulled wrapper for typed extraction with defaults
// invariants: No panics; missing paths yield None; as_measure never yields NaN or infinity
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// Wrapper around a JSON location to allow typed extraction as a clear second step.
pub struct JsonPulled<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonPulled<'a> {
  /// Attempt to deserialize the pulled value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Deserialize as `T`, returning `T::default()` on failure.
  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Coerce the value to a finite f64 measure.
  ///
  /// ERP backends are sloppy about numerics: tonnage may arrive as `12.5`,
  /// `"12.5"`, `null`, or be absent entirely. Anything that does not parse as a
  /// finite number contributes `0.0`, so downstream sums can never turn NaN.
  pub fn as_measure(&self) -> f64 {
    let n = match self.inner {
      Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
      Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
      _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
  }
}

/// Extension to pull nested values via dotted paths like "meta.location".
pub trait JsonPull {
  fn pull(&self, path: &str) -> JsonPulled<'_>;
}

impl JsonPull for serde_json::Value {
  fn pull(&self, path: &str) -> JsonPulled<'_> {
    if path.is_empty() {
      return JsonPulled { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match cur.get(key) {
        Some(next) => cur = next,
        None => return JsonPulled { inner: None },
      }
    }

    JsonPulled { inner: Some(cur) }
  }
}

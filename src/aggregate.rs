use crate::group::GroupBucket;

/// Sum a measure over records. Non-finite contributions collapse to 0.0 so a
/// stray NaN in a caller-supplied extractor can never poison a rollup.
pub fn total<R, F>(records: &[R], measure: F) -> f64
where
  F: Fn(&R) -> f64,
{
  records.iter().fold(0.0, |acc, r| {
    let m = measure(r);
    acc + if m.is_finite() { m } else { 0.0 }
  })
}

/// Total for one bucket's items.
pub fn bucket_total<R, F>(bucket: &GroupBucket<R>, measure: F) -> f64
where
  F: Fn(&R) -> f64,
{
  total(&bucket.items, measure)
}

/// Grand total across all buckets.
pub fn grand_total<R, F>(buckets: &[GroupBucket<R>], measure: F) -> f64
where
  F: Fn(&R) -> f64,
{
  buckets.iter().map(|b| total(&b.items, &measure)).sum()
}

/// Ratio as a percentage with a divide-by-zero guard: a zero denominator
/// yields 0.0, never NaN or infinity.
pub fn percentage(part: f64, whole: f64) -> f64 {
  if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

/// Round to two decimals. Display formatting only; totals stay full-precision
/// throughout the pipeline and are rounded once at the render boundary.
pub fn round2(n: f64) -> f64 {
  (n * 100.0).round() / 100.0
}

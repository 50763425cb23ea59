use std::collections::HashMap;

/// Bucket name used when a record has no usable group key.
pub const OTHERS_BUCKET: &str = "Others";

/// An ordered partition of records sharing one group key.
///
/// Buckets are created fresh per aggregation call and never persisted. Items
/// keep the relative order they had in the input.
#[derive(Debug, Clone)]
pub struct GroupBucket<R> {
  pub key: String,
  pub items: Vec<R>,
}

/// Partition `records` into buckets keyed by `key_fn`, preserving the
/// insertion order of each key's first occurrence.
///
/// Records for which `key_fn` returns `None` land in the `"Others"` bucket.
/// Every input record ends up in exactly one bucket; an empty input yields an
/// empty bucket list.
pub fn group_by<R, F>(records: Vec<R>, key_fn: F) -> Vec<GroupBucket<R>>
where
  F: Fn(&R) -> Option<String>,
{
  let mut buckets: Vec<GroupBucket<R>> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for rec in records {
    let key = key_fn(&rec).unwrap_or_else(|| OTHERS_BUCKET.to_string());

    match index.get(&key) {
      Some(&i) => buckets[i].items.push(rec),
      None => {
        index.insert(key.clone(), buckets.len());
        buckets.push(GroupBucket { key, items: vec![rec] });
      }
    }
  }

  buckets
}

/// Re-group a bucket's items by a second key, for nested breakdowns
/// (e.g. driver → trip category). Each level reduces independently.
pub fn group_slice<R, F>(items: &[R], key_fn: F) -> Vec<GroupBucket<R>>
where
  R: Clone,
  F: Fn(&R) -> Option<String>,
{
  group_by(items.to_vec(), key_fn)
}

/// Flatten buckets back into a single record sequence, preserving bucket order
/// then within-bucket order. Used by tests to assert conservation.
#[cfg(test)]
pub fn flatten<R>(buckets: Vec<GroupBucket<R>>) -> Vec<R> {
  buckets.into_iter().flat_map(|b| b.items).collect()
}

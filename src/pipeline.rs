// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Stateless filter/sort/paginate stages applied to records or group buckets before projection
// role: processing/pipeline
// inputs: Record or bucket sequences plus explicit query/SortSpec/page parameters per call
// outputs: Filtered/sorted sequences and clamped page slices with a PageWindow summary
// invariants:
// - empty query is the identity; filtering the same query twice equals filtering once
// - sorting is stable (ties keep pre-sort relative order)
// - page index is clamped to [1, max(1, total_pages)]; concatenated pages cover the input exactly once
// errors: None; all stages are pure and total
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::group::GroupBucket;
use crate::model::PageWindow;

/// Records expose their free-text searchable fields through this seam, so the
/// filter stage stays generic over report kinds.
pub trait Searchable {
  fn search_fields(&self) -> Vec<String>;
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum SortKey {
  Name,
  Measure,
  Count,
  Date,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum SortDirection {
  Asc,
  Desc,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct SortSpec {
  pub key: SortKey,
  pub direction: SortDirection,
}

impl Default for SortSpec {
  fn default() -> Self {
    SortSpec {
      key: SortKey::Name,
      direction: SortDirection::Asc,
    }
  }
}

/// Retain records whose searchable fields contain `query` (case-insensitive
/// substring, OR across fields). An empty query returns the input unchanged.
pub fn filter_records<T: Searchable>(records: Vec<T>, query: &str) -> Vec<T> {
  let q = query.trim().to_lowercase();
  if q.is_empty() {
    return records;
  }

  records
    .into_iter()
    .filter(|r| r.search_fields().iter().any(|f| f.to_lowercase().contains(&q)))
    .collect()
}

/// Precomputed per-bucket sort key. Homogeneous within one sort call; the
/// cross-variant arms never compare.
enum BucketSortKey {
  Text(String),
  Number(f64),
  Count(usize),
}

impl BucketSortKey {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self, other) {
      (BucketSortKey::Text(a), BucketSortKey::Text(b)) => a.cmp(b),
      // Measures are finite by construction (aggregate::total sanitizes)
      (BucketSortKey::Number(a), BucketSortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
      (BucketSortKey::Count(a), BucketSortKey::Count(b)) => a.cmp(b),
      _ => Ordering::Equal,
    }
  }
}

/// Sort buckets by the chosen key. Each bucket's key (lowercased name, measure
/// total, count, or first-item date) is computed exactly once before the sort;
/// `Vec::sort_by` is a stable sort, so records that compare equal keep their
/// pre-sort relative order.
///
/// `measure` supplies the per-record number backing the Measure key; `date`
/// supplies the per-record date string backing the Date key (a bucket's date
/// is its first item's, buckets being in insertion order).
pub fn sort_buckets<R>(
  buckets: Vec<GroupBucket<R>>,
  spec: SortSpec,
  measure: impl Fn(&R) -> f64,
  date: impl Fn(&R) -> String,
) -> Vec<GroupBucket<R>> {
  let mut decorated: Vec<(BucketSortKey, GroupBucket<R>)> = buckets
    .into_iter()
    .map(|bucket| {
      let key = match spec.key {
        SortKey::Name => BucketSortKey::Text(bucket.key.to_lowercase()),
        SortKey::Count => BucketSortKey::Count(bucket.items.len()),
        SortKey::Measure => BucketSortKey::Number(crate::aggregate::total(&bucket.items, &measure)),
        SortKey::Date => BucketSortKey::Text(bucket_date(&bucket, &date)),
      };
      (key, bucket)
    })
    .collect();

  decorated.sort_by(|a, b| {
    let ord = a.0.cmp(&b.0);
    match spec.direction {
      SortDirection::Asc => ord,
      SortDirection::Desc => ord.reverse(),
    }
  });

  decorated.into_iter().map(|(_, bucket)| bucket).collect()
}

fn bucket_date<R>(bucket: &GroupBucket<R>, date: &impl Fn(&R) -> String) -> String {
  bucket.items.first().map(date).unwrap_or_default()
}

/// Slice out one page. The 1-based index is clamped to
/// `[1, max(1, total_pages)]`, so a stale index past the end returns the last
/// page rather than an empty page forever. Callers reset to page 1 whenever
/// filter or sort criteria change.
pub fn paginate<T: Clone>(items: &[T], page_index: usize, page_size: usize) -> (Vec<T>, PageWindow) {
  let size = page_size.max(1);
  let total_items = items.len();
  let total_pages = total_items.div_ceil(size);
  let index = page_index.clamp(1, total_pages.max(1));

  let start = (index - 1) * size;
  let slice = if start >= total_items {
    Vec::new()
  } else {
    items[start..(start + size).min(total_items)].to_vec()
  };

  (
    slice,
    PageWindow {
      index,
      size,
      total_pages,
      total_items,
    },
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::group::group_by;

  #[derive(Debug, Clone, PartialEq)]
  struct Row {
    name: String,
    note: String,
  }

  impl Searchable for Row {
    fn search_fields(&self) -> Vec<String> {
      vec![self.name.clone(), self.note.clone()]
    }
  }

  fn rows() -> Vec<Row> {
    [
      ("Ramesh", "long haul"),
      ("Suresh", "local"),
      ("Mani", "Ramnagar godown"),
    ]
    .iter()
    .map(|(n, d)| Row {
      name: n.to_string(),
      note: d.to_string(),
    })
    .collect()
  }

  #[test]
  fn empty_query_is_identity() {
    let input = rows();
    let out = filter_records(input.clone(), "");
    assert_eq!(out, input);
  }

  #[test]
  fn filter_matches_any_field_case_insensitive() {
    let out = filter_records(rows(), "RAM");
    // "Ramesh" by name, "Mani" by its Ramnagar note
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].name, "Ramesh");
    assert_eq!(out[1].name, "Mani");
  }

  #[test]
  fn filter_is_idempotent() {
    let once = filter_records(rows(), "ra");
    let twice = filter_records(once.clone(), "ra");
    assert_eq!(once, twice);
  }

  fn sample_buckets() -> Vec<crate::group::GroupBucket<(String, f64, String)>> {
    let recs = vec![
      ("B".to_string(), 5.0, "2025-08-02".to_string()),
      ("a".to_string(), 9.0, "2025-08-01".to_string()),
      ("C".to_string(), 5.0, "2025-08-03".to_string()),
    ];
    group_by(recs, |r| Some(r.0.clone()))
  }

  #[test]
  fn sort_by_name_is_case_insensitive() {
    let buckets = sort_buckets(
      sample_buckets(),
      SortSpec {
        key: SortKey::Name,
        direction: SortDirection::Asc,
      },
      |r| r.1,
      |r| r.2.clone(),
    );
    let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "B", "C"]);
  }

  #[test]
  fn sort_by_measure_desc_keeps_tie_order() {
    let buckets = sort_buckets(
      sample_buckets(),
      SortSpec {
        key: SortKey::Measure,
        direction: SortDirection::Desc,
      },
      |r| r.1,
      |r| r.2.clone(),
    );
    let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
    // B and C tie at 5.0; B entered first and stays first
    assert_eq!(keys, vec!["a", "B", "C"]);
  }

  #[test]
  fn resorting_sorted_input_is_noop() {
    let spec = SortSpec {
      key: SortKey::Date,
      direction: SortDirection::Asc,
    };
    let once = sort_buckets(sample_buckets(), spec, |r| r.1, |r| r.2.clone());
    let twice = sort_buckets(once.clone(), spec, |r| r.1, |r| r.2.clone());
    let a: Vec<&str> = once.iter().map(|b| b.key.as_str()).collect();
    let b: Vec<&str> = twice.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(a, b);
  }

  #[test]
  fn measure_sort_scans_each_record_exactly_once() {
    let calls = std::cell::Cell::new(0usize);
    let recs = vec![
      ("A".to_string(), 1.0, String::new()),
      ("B".to_string(), 2.0, String::new()),
      ("A".to_string(), 3.0, String::new()),
      ("C".to_string(), 4.0, String::new()),
    ];
    let buckets = group_by(recs, |r| Some(r.0.clone()));

    let sorted = sort_buckets(
      buckets,
      SortSpec {
        key: SortKey::Measure,
        direction: SortDirection::Asc,
      },
      |r| {
        calls.set(calls.get() + 1);
        r.1
      },
      |r| r.2.clone(),
    );

    // Totals are precomputed per bucket, not recomputed per comparison
    assert_eq!(calls.get(), 4);
    assert_eq!(sorted[0].key, "B");
  }

  #[test]
  fn scenario_page_size_two_over_five_items() {
    let items: Vec<i32> = (1..=5).collect();

    let (p1, w1) = paginate(&items, 1, 2);
    let (p2, _) = paginate(&items, 2, 2);
    let (p3, w3) = paginate(&items, 3, 2);

    assert_eq!(w1.total_pages, 3);
    assert_eq!(w1.total_items, 5);
    assert_eq!((p1.len(), p2.len(), p3.len()), (2, 2, 1));
    assert_eq!(w3.index, 3);

    let all: Vec<i32> = p1.into_iter().chain(p2).chain(p3).collect();
    assert_eq!(all, items);
  }

  #[test]
  fn out_of_range_index_clamps_to_last_page() {
    let items: Vec<i32> = (1..=5).collect();
    let (page, win) = paginate(&items, 99, 2);
    assert_eq!(win.index, 3);
    assert_eq!(page, vec![5]);
  }

  #[test]
  fn empty_input_has_one_clamped_page() {
    let items: Vec<i32> = Vec::new();
    let (page, win) = paginate(&items, 4, 10);
    assert!(page.is_empty());
    assert_eq!(win.index, 1);
    assert_eq!(win.total_pages, 0);
    assert_eq!(win.total_items, 0);
  }
}

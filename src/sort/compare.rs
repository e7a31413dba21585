/// Record comparison for a single sort key.
/// Text columns compare byte-wise; coordinates compare numerically.
use std::cmp::Ordering;

use super::stats::SortStats;
use crate::record::{FieldKey, Record};

/// Numeric order with no tolerance. Values that are neither less nor greater
/// (equal, or NaN on either side) are `Equal`.
#[inline]
pub fn compare_coordinate(a: f64, b: f64) -> Ordering {
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Ordinal byte comparison, not locale collation.
#[inline]
pub fn compare_text(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Compare two records on `key` without touching any counter.
#[inline]
pub fn compare_field(a: &Record, b: &Record, key: FieldKey) -> Ordering {
    match key {
        FieldKey::Latitude => compare_coordinate(a.lat(), b.lat()),
        FieldKey::Longitude => compare_coordinate(a.lon(), b.lon()),
        FieldKey::Id
        | FieldKey::SecondaryId
        | FieldKey::Date
        | FieldKey::Country
        | FieldKey::Region1
        | FieldKey::Region2
        | FieldKey::Biome => compare_text(a.field(key), b.field(key)),
    }
}

/// The sort comparator: one call, one counted comparison, whatever the outcome.
#[inline]
pub fn compare_records(a: &Record, b: &Record, key: FieldKey, stats: &mut SortStats) -> Ordering {
    stats.comparisons += 1;
    compare_field(a, b, key)
}

/// True when no adjacent pair is out of order on `key`. Does not count.
pub fn is_sorted_by_key(records: &[Record], key: FieldKey) -> bool {
    records
        .windows(2)
        .all(|w| compare_field(&w[0], &w[1], key) != Ordering::Greater)
}

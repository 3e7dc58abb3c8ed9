//! Dataset merger
//!
//! Two-source, id-keyed register merge where the local store dominates.
//! Kept as a pure function over two ordered collections so it can be tested
//! without any persistence behind it.

use std::collections::HashMap;

use crate::storage::LinkRecord;

/// Combine `baseline` and `local` into one newest-first view.
///
/// Every baseline record is inserted first, then every local record, each
/// overwriting any earlier entry with the same `id`. An overwritten entry
/// keeps the slot where its id was first seen. The result is sorted by
/// `created_at` descending with a stable sort, so equal timestamps stay in
/// that insertion order.
///
/// Not commutative: `local` must be the second argument for local-wins.
pub fn merge(baseline: &[LinkRecord], local: &[LinkRecord]) -> Vec<LinkRecord> {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(baseline.len() + local.len());
    let mut merged: Vec<LinkRecord> = Vec::with_capacity(baseline.len() + local.len());

    for record in baseline.iter().chain(local) {
        match slots.get(record.id.as_str()) {
            Some(&idx) => merged[idx] = record.clone(),
            None => {
                slots.insert(record.id.as_str(), merged.len());
                merged.push(record.clone());
            }
        }
    }

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged
}

use std::collections::HashSet;

use crate::model::{FillCandidate, ResolvedRecord};

/// Keep the first row seen for each key, dropping later ones. Relative order
/// of the kept rows is unchanged, so positions run contiguously from zero.
pub fn dedup_first<T>(rows: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(key(row).to_string()))
        .collect()
}

/// One resolved row per ENTSO unit id; first join row wins.
pub fn dedup_resolved(rows: Vec<ResolvedRecord>) -> Vec<ResolvedRecord> {
    dedup_first(rows, |r| r.unit_id.as_str())
}

/// One fill candidate per ENTSO unit id; first bridge hit wins.
pub fn dedup_candidates(rows: Vec<FillCandidate>) -> Vec<FillCandidate> {
    dedup_first(rows, |c| c.unit_id.as_str())
}

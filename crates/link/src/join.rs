use std::collections::HashMap;

use crate::model::{EntsoRecord, GppdRecord, PlantText, PlattsRecord, ResolvedRecord};

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// One non-empty string is a (case-sensitive) substring of the other.
pub fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Both strings present and identical.
pub fn equals_present(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

/// Approximate plant equality used by both Phase 1 joins: names and countries
/// contain each other (either direction), fuel types are identical.
pub fn plant_matches<L: PlantText, R: PlantText>(left: &L, right: &R) -> bool {
    equals_present(left.fuel_type(), right.fuel_type())
        && contains_either(left.plant_name(), right.plant_name())
        && contains_either(left.country(), right.country())
}

// ---------------------------------------------------------------------------
// Join primitives
// ---------------------------------------------------------------------------

/// Nested-loop left-outer join. Emits one row per matching right record, in
/// right-table order, or a single `None` row when nothing matches.
pub fn left_outer_join<L, R, T>(
    left: &[L],
    right: &[R],
    on: impl Fn(&L, &R) -> bool,
    mut emit: impl FnMut(&L, Option<&R>) -> T,
) -> Vec<T> {
    let mut out = Vec::with_capacity(left.len());
    for l in left {
        let before = out.len();
        for r in right {
            if on(l, r) {
                out.push(emit(l, Some(r)));
            }
        }
        if out.len() == before {
            out.push(emit(l, None));
        }
    }
    out
}

/// Position lists per key, in input order. Records without a key are skipped.
pub fn index_by<'a, R>(records: &'a [R], key: impl Fn(&'a R) -> Option<&'a str>) -> HashMap<&'a str, Vec<usize>> {
    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(k) = key(record).filter(|k| !k.is_empty()) {
            index.entry(k).or_default().push(i);
        }
    }
    index
}

/// Hash left-outer equi-join. Null keys never match. Same output order as
/// `left_outer_join` with an equality predicate.
pub fn equi_left_join<'a, L, R, T>(
    left: &'a [L],
    right: &'a [R],
    left_key: impl Fn(&'a L) -> Option<&'a str>,
    right_key: impl Fn(&'a R) -> Option<&'a str>,
    mut emit: impl FnMut(&'a L, Option<&'a R>) -> T,
) -> Vec<T> {
    let index = index_by(right, right_key);
    let mut out = Vec::with_capacity(left.len());
    for l in left {
        match left_key(l).and_then(|k| index.get(k)) {
            Some(hits) => out.extend(hits.iter().map(|&i| emit(l, Some(&right[i])))),
            None => out.push(emit(l, None)),
        }
    }
    out
}

/// Hash inner equi-join. Null keys never match.
pub fn equi_inner_join<'a, L, R, T>(
    left: &'a [L],
    right: &'a [R],
    left_key: impl Fn(&'a L) -> Option<&'a str>,
    right_key: impl Fn(&'a R) -> Option<&'a str>,
    mut emit: impl FnMut(&'a L, &'a R) -> T,
) -> Vec<T> {
    let index = index_by(right, right_key);
    let mut out = Vec::new();
    for l in left {
        if let Some(hits) = left_key(l).and_then(|k| index.get(k)) {
            out.extend(hits.iter().map(|&i| emit(l, &right[i])));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Phase 1
// ---------------------------------------------------------------------------

/// Join 1: attach the GPPD plant id of every approximately-matching GPPD plant.
pub fn join_gppd(entso: &[EntsoRecord], gppd: &[GppdRecord]) -> Vec<ResolvedRecord> {
    left_outer_join(entso, gppd, plant_matches, |unit, plant| {
        let mut row = ResolvedRecord::unresolved(unit);
        row.gppd_plant_id = plant.map(|p| p.plant_id.clone());
        row
    })
}

/// Join 2: attach the Platts unit id of every approximately-matching Platts
/// unit, comparing against the ENTSO name/country/fuel carried by each row.
pub fn join_platts(rows: &[ResolvedRecord], platts: &[PlattsRecord]) -> Vec<ResolvedRecord> {
    left_outer_join(rows, platts, plant_matches, |row, unit| {
        let mut row = row.clone();
        row.platts_unit_id = unit.map(|u| u.unit_id.clone());
        row
    })
}

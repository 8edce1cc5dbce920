use std::collections::{BTreeSet, HashMap, HashSet};

use crate::model::{GppdRecord, PlantText, PlattsRecord};
use crate::similarity::{weighted_ratio_prepared, PreparedName};

/// Default minimum `weighted_ratio` score for a rewrite.
pub const DEFAULT_THRESHOLD: u8 = 90;

/// Secondary records whose plant name the normalizer may rewrite.
pub trait PlantNameMut: PlantText {
    fn plant_name_mut(&mut self) -> &mut String;
}

impl PlantNameMut for PlattsRecord {
    fn plant_name_mut(&mut self) -> &mut String {
        &mut self.plant_name
    }
}

impl PlantNameMut for GppdRecord {
    fn plant_name_mut(&mut self) -> &mut String {
        &mut self.plant_name
    }
}

/// Rewrite secondary plant names to the closest canonical spelling in `reference`.
///
/// Every distinct name in `records` is scored against every reference name.
/// A name scoring at least `threshold` against a reference name is rewritten
/// to it, in all occurrences. When several reference names qualify, the one
/// appearing last in `reference` wins.
///
/// Exception to last-wins: a name that already equals some reference name is
/// never rewritten, even when a later reference name also scores at or above
/// `threshold`. This keeps the pass idempotent.
///
/// Each name is preprocessed once; only the pairwise scoring repeats.
///
/// Returns the number of cells rewritten.
pub fn normalize_names<R: PlantNameMut>(reference: &[&str], records: &mut [R], threshold: u8) -> usize {
    if reference.is_empty() || records.is_empty() {
        return 0;
    }

    let canonical: HashSet<&str> = reference.iter().copied().collect();
    let candidates: BTreeSet<&str> = records
        .iter()
        .map(|r| r.plant_name())
        .filter(|name| !name.is_empty() && !canonical.contains(name))
        .collect();

    let prepared: Vec<(&str, PreparedName)> =
        candidates.iter().map(|&name| (name, PreparedName::new(name))).collect();

    // Walk references back to front so the first hit is the last-listed match.
    let mut rewrites: HashMap<String, String> = HashMap::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for &name in reference.iter().rev() {
        if !seen.insert(name) {
            continue;
        }
        let canonical_name = PreparedName::new(name);
        for (candidate, candidate_name) in &prepared {
            if rewrites.contains_key(*candidate) {
                continue;
            }
            let score = weighted_ratio_prepared(&canonical_name, candidate_name);
            if score >= threshold {
                log::debug!("rename '{candidate}' -> '{name}' (score {score})");
                rewrites.insert(candidate.to_string(), name.to_string());
            }
        }
    }

    let mut rewritten = 0;
    for record in records.iter_mut() {
        if let Some(target) = rewrites.get(record.plant_name()) {
            *record.plant_name_mut() = target.clone();
            rewritten += 1;
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gppd(id: &str, name: &str) -> GppdRecord {
        GppdRecord {
            plant_id: id.into(),
            plant_name: name.into(),
            country: "Germany".into(),
            fuel_type: "Coal".into(),
        }
    }

    fn names(records: &[GppdRecord]) -> Vec<&str> {
        records.iter().map(|r| r.plant_name.as_str()).collect()
    }

    #[test]
    fn rewrites_close_spelling() {
        let mut records = vec![gppd("G1", "NIEDERAUSSEM"), gppd("G2", "Boxberg")];
        let n = normalize_names(&["Niederaussem"], &mut records, DEFAULT_THRESHOLD);
        assert_eq!(n, 1);
        assert_eq!(names(&records), vec!["Niederaussem", "Boxberg"]);
    }

    #[test]
    fn rewrites_every_occurrence() {
        let mut records = vec![gppd("G1", "Jaenschwalde"), gppd("G2", "Jaenschwalde")];
        let n = normalize_names(&["Jänschwalde Jaenschwalde"], &mut records, 50);
        assert_eq!(n, 2);
        assert!(records.iter().all(|r| r.plant_name == "Jänschwalde Jaenschwalde"));
    }

    #[test]
    fn below_threshold_untouched() {
        let mut records = vec![gppd("G1", "Lippendorf")];
        let n = normalize_names(&["Schwarze Pumpe"], &mut records, DEFAULT_THRESHOLD);
        assert_eq!(n, 0);
        assert_eq!(records[0].plant_name, "Lippendorf");
    }

    #[test]
    fn last_reference_wins() {
        // "Alpha" is a fragment of both references and scores 90 against each.
        let mut records = vec![gppd("G1", "Alpha")];
        normalize_names(&["Alpha North", "Alpha South"], &mut records, DEFAULT_THRESHOLD);
        assert_eq!(records[0].plant_name, "Alpha South");

        let mut records = vec![gppd("G1", "Alpha")];
        normalize_names(&["Alpha South", "Alpha North"], &mut records, DEFAULT_THRESHOLD);
        assert_eq!(records[0].plant_name, "Alpha North");
    }

    #[test]
    fn canonical_names_are_kept() {
        let mut records = vec![gppd("G1", "Alpha North")];
        let n = normalize_names(&["Alpha North", "Alpha North Unit"], &mut records, 50);
        assert_eq!(n, 0);
        assert_eq!(records[0].plant_name, "Alpha North");
    }

    #[test]
    fn exact_match_beats_later_qualifying_reference() {
        // "Alpha" scores 90 against "Alpha Station", listed later, but is itself canonical.
        let mut records = vec![gppd("G1", "Alpha"), gppd("G2", "ALPHA-STATION")];
        let n = normalize_names(&["Alpha", "Alpha Station"], &mut records, DEFAULT_THRESHOLD);
        assert_eq!(n, 1);
        assert_eq!(names(&records), vec!["Alpha", "Alpha Station"]);
    }

    #[test]
    fn idempotent() {
        let reference = ["Alpha North", "Alpha South", "Boxberg", "Weisweiler"];
        let mut records = vec![
            gppd("G1", "Alpha"),
            gppd("G2", "BOXBERG"),
            gppd("G3", "Weisweiler Kraftwerk"),
            gppd("G4", "Lippendorf"),
        ];
        normalize_names(&reference, &mut records, DEFAULT_THRESHOLD);
        let once = records.clone();
        let n = normalize_names(&reference, &mut records, DEFAULT_THRESHOLD);
        assert_eq!(n, 0);
        assert_eq!(records, once);
    }

    #[test]
    fn empty_inputs_are_noops() {
        let mut records = vec![gppd("G1", "Boxberg")];
        assert_eq!(normalize_names(&[], &mut records, DEFAULT_THRESHOLD), 0);
        let mut empty: Vec<GppdRecord> = Vec::new();
        assert_eq!(normalize_names(&["Boxberg"], &mut empty, DEFAULT_THRESHOLD), 0);
    }

    #[test]
    fn applies_to_platts() {
        let mut records = vec![PlattsRecord {
            unit_id: "P1".into(),
            plant_id: Some("7".into()),
            plant_name: "boxberg".into(),
            country: "DE".into(),
            fuel_type: "Coal".into(),
        }];
        normalize_names(&["Boxberg"], &mut records, DEFAULT_THRESHOLD);
        assert_eq!(records[0].plant_name, "Boxberg");
    }
}

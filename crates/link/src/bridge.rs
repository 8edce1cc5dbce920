use crate::dedup::dedup_candidates;
use crate::join::{equi_inner_join, equi_left_join};
use crate::model::{BridgeRecord, FillCandidate, GppdRecord, PlattsRecord, ResolvedRecord};

/// Exact inner join of Platts units and GPPD plants on plant id.
/// Platts units without a plant id, or whose plant id GPPD lacks, are dropped.
pub fn build_bridge(platts: &[PlattsRecord], gppd: &[GppdRecord]) -> Vec<BridgeRecord> {
    equi_inner_join(
        platts,
        gppd,
        |unit| unit.plant_id.as_deref(),
        |plant| Some(plant.plant_id.as_str()),
        |unit, plant| BridgeRecord {
            platts_unit_id: unit.unit_id.clone(),
            gppd_plant_id: plant.plant_id.clone(),
        },
    )
}

/// GPPD plant id reachable from each row's Platts unit id (one per row, aligned).
pub fn gppd_candidates(rows: &[ResolvedRecord], bridge: &[BridgeRecord]) -> Vec<FillCandidate> {
    let joined = equi_left_join(
        rows,
        bridge,
        |row| row.platts_unit_id.as_deref(),
        |link| Some(link.platts_unit_id.as_str()),
        |row, link| FillCandidate {
            unit_id: row.unit_id.clone(),
            value: link.map(|l| l.gppd_plant_id.clone()),
        },
    );
    dedup_candidates(joined)
}

/// Platts unit id reachable from each row's GPPD plant id (one per row, aligned).
pub fn platts_candidates(rows: &[ResolvedRecord], bridge: &[BridgeRecord]) -> Vec<FillCandidate> {
    let joined = equi_left_join(
        rows,
        bridge,
        |row| row.gppd_plant_id.as_deref(),
        |link| Some(link.gppd_plant_id.as_str()),
        |row, link| FillCandidate {
            unit_id: row.unit_id.clone(),
            value: link.map(|l| l.platts_unit_id.clone()),
        },
    );
    dedup_candidates(joined)
}

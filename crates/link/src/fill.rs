use crate::model::{FillCandidate, ResolvedRecord};

/// Identifier column of a resolved row that a bridge lookup can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillField {
    GppdPlantId,
    PlattsUnitId,
}

impl FillField {
    fn slot<'a>(&self, row: &'a mut ResolvedRecord) -> &'a mut Option<String> {
        match self {
            Self::GppdPlantId => &mut row.gppd_plant_id,
            Self::PlattsUnitId => &mut row.platts_unit_id,
        }
    }
}

/// Overlay `candidates` onto `rows` position by position, writing only into
/// null slots. A candidate whose unit id differs from the row at the same
/// position is skipped. Returns the number of slots filled.
pub fn fill_nulls(rows: &mut [ResolvedRecord], candidates: &[FillCandidate], field: FillField) -> usize {
    if rows.len() != candidates.len() {
        log::warn!(
            "fill {field:?}: {} rows but {} candidates; filling the aligned prefix",
            rows.len(),
            candidates.len()
        );
    }

    let mut filled = 0;
    for (row, candidate) in rows.iter_mut().zip(candidates) {
        if row.unit_id != candidate.unit_id {
            log::warn!(
                "fill {field:?}: row '{}' aligned with candidate '{}', skipped",
                row.unit_id,
                candidate.unit_id
            );
            continue;
        }
        let slot = field.slot(row);
        if slot.is_none() {
            if let Some(value) = &candidate.value {
                *slot = Some(value.clone());
                filled += 1;
            }
        }
    }
    filled
}

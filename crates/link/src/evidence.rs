use crate::model::ResolvedRecord;

/// How many rows carry each secondary identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionCounts {
    pub rows: usize,
    pub gppd: usize,
    pub platts: usize,
    pub both: usize,
}

impl ResolutionCounts {
    pub fn unresolved_gppd(&self) -> usize {
        self.rows - self.gppd
    }

    pub fn unresolved_platts(&self) -> usize {
        self.rows - self.platts
    }
}

/// Count non-null identifiers across resolved rows.
pub fn count_resolved(rows: &[ResolvedRecord]) -> ResolutionCounts {
    let mut counts = ResolutionCounts { rows: rows.len(), ..Default::default() };
    for row in rows {
        let gppd = row.gppd_plant_id.is_some();
        let platts = row.platts_unit_id.is_some();
        counts.gppd += gppd as usize;
        counts.platts += platts as usize;
        counts.both += (gppd && platts) as usize;
    }
    counts
}

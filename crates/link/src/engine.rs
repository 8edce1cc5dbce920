use crate::bridge::{build_bridge, gppd_candidates, platts_candidates};
use crate::config::{ColumnsConfig, NormalizeConfig};
use crate::dedup::dedup_resolved;
use crate::error::LinkError;
use crate::evidence::count_resolved;
use crate::fill::{fill_nulls, FillField};
use crate::join::{join_gppd, join_platts};
use crate::loader::{load_entso, load_gppd, load_platts};
use crate::model::{
    BridgeRecord, EntsoRecord, GppdRecord, LinkInput, LinkMeta, LinkReport, LinkSummary, PlattsRecord,
    ResolvedRecord,
};
use crate::normalize::normalize_names;

/// Parse the three CSV bodies. Fails on the first table that cannot be read,
/// before any matching runs.
pub fn load_input(
    columns: &ColumnsConfig,
    entso_csv: &str,
    platts_csv: &str,
    gppd_csv: &str,
) -> Result<LinkInput, LinkError> {
    Ok(LinkInput {
        entso: load_entso(entso_csv, &columns.entso)?,
        platts: load_platts(platts_csv, &columns.platts)?,
        gppd: load_gppd(gppd_csv, &columns.gppd)?,
    })
}

/// Every table of one run, handed from phase to phase.
#[derive(Debug)]
pub struct LinkContext {
    pub entso: Vec<EntsoRecord>,
    pub platts: Vec<PlattsRecord>,
    pub gppd: Vec<GppdRecord>,
    pub bridge: Vec<BridgeRecord>,
    pub resolved: Vec<ResolvedRecord>,
    pub summary: LinkSummary,
}

impl LinkContext {
    /// Take ownership of the raw tables and build the plant-id bridge.
    pub fn new(input: LinkInput) -> Self {
        let bridge = build_bridge(&input.platts, &input.gppd);
        log::info!(
            "loaded {} entso, {} platts, {} gppd rows; bridge has {} rows",
            input.entso.len(),
            input.platts.len(),
            input.gppd.len(),
            bridge.len()
        );

        let summary = LinkSummary {
            entso_rows: input.entso.len(),
            platts_rows: input.platts.len(),
            gppd_rows: input.gppd.len(),
            bridge_rows: bridge.len(),
            ..Default::default()
        };

        Self {
            entso: input.entso,
            platts: input.platts,
            gppd: input.gppd,
            bridge,
            resolved: Vec::new(),
            summary,
        }
    }

    /// Rewrite Platts and GPPD plant names to their closest ENTSO spelling.
    pub fn normalize_names(&mut self, threshold: u8) {
        let reference: Vec<&str> = self.entso.iter().map(|r| r.plant_name.as_str()).collect();
        self.summary.platts_names_rewritten = normalize_names(&reference, &mut self.platts, threshold);
        self.summary.gppd_names_rewritten = normalize_names(&reference, &mut self.gppd, threshold);
        log::info!(
            "normalized names: {} platts, {} gppd cells rewritten",
            self.summary.platts_names_rewritten,
            self.summary.gppd_names_rewritten
        );
    }

    /// Phase 1: approximate joins against GPPD then Platts, then one row per unit.
    pub fn resolve_by_text(&mut self) {
        let joined = join_platts(&join_gppd(&self.entso, &self.gppd), &self.platts);
        self.summary.joined_rows = joined.len();
        log::debug!("approximate joins produced {} rows for {} units", joined.len(), self.entso.len());

        self.resolved = dedup_resolved(joined);
        let counts = count_resolved(&self.resolved);
        self.summary.phase1_gppd_matches = counts.gppd;
        self.summary.phase1_platts_matches = counts.platts;
        log::info!(
            "phase 1: {} of {} units matched gppd, {} matched platts",
            counts.gppd,
            counts.rows,
            counts.platts
        );
    }

    /// Phase 2: fill null identifiers through the bridge, never overwriting.
    pub fn resolve_by_bridge(&mut self) {
        let gppd_fill = gppd_candidates(&self.resolved, &self.bridge);
        let platts_fill = platts_candidates(&self.resolved, &self.bridge);

        self.summary.phase2_gppd_filled = fill_nulls(&mut self.resolved, &gppd_fill, FillField::GppdPlantId);
        self.summary.phase2_platts_filled =
            fill_nulls(&mut self.resolved, &platts_fill, FillField::PlattsUnitId);

        let counts = count_resolved(&self.resolved);
        self.summary.unresolved_gppd = counts.unresolved_gppd();
        self.summary.unresolved_platts = counts.unresolved_platts();
        self.summary.fully_resolved = counts.both;
        log::info!(
            "phase 2: filled {} gppd and {} platts ids; {} gppd and {} platts still unresolved",
            self.summary.phase2_gppd_filled,
            self.summary.phase2_platts_filled,
            self.summary.unresolved_gppd,
            self.summary.unresolved_platts
        );
    }
}

/// Run the whole pipeline over pre-loaded tables.
pub fn run(normalize: &NormalizeConfig, input: LinkInput) -> LinkReport {
    let mut ctx = LinkContext::new(input);
    if normalize.enabled {
        ctx.normalize_names(normalize.threshold);
    }
    ctx.resolve_by_text();
    ctx.resolve_by_bridge();

    LinkReport {
        meta: LinkMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            normalized: normalize.enabled,
            threshold: normalize.threshold,
        },
        summary: ctx.summary,
        records: ctx.resolved,
    }
}

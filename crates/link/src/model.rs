use serde::Serialize;

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// The three fixed input schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Grid-operator registry; canonical names and countries.
    Entso,
    /// Commercial plant database (unit level, carries plant ids).
    Platts,
    /// Open global power-plant database (plant level).
    Gppd,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entso => write!(f, "entso"),
            Self::Platts => write!(f, "platts"),
            Self::Gppd => write!(f, "gppd"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Free-text fields the approximate joins compare. Empty strings are nulls.
pub trait PlantText {
    fn plant_name(&self) -> &str;
    fn country(&self) -> &str;
    fn fuel_type(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntsoRecord {
    pub unit_id: String,
    pub plant_name: String,
    pub country: String,
    pub fuel_type: String,
    pub unit_capacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlattsRecord {
    pub unit_id: String,
    pub plant_id: Option<String>,
    pub plant_name: String,
    pub country: String,
    pub fuel_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GppdRecord {
    pub plant_id: String,
    pub plant_name: String,
    /// Long-form country name ("United Kingdom", not "GB").
    pub country: String,
    pub fuel_type: String,
}

macro_rules! impl_plant_text {
    ($($ty:ty),*) => {
        $(impl PlantText for $ty {
            fn plant_name(&self) -> &str {
                &self.plant_name
            }
            fn country(&self) -> &str {
                &self.country
            }
            fn fuel_type(&self) -> &str {
                &self.fuel_type
            }
        })*
    };
}

impl_plant_text!(EntsoRecord, PlattsRecord, GppdRecord, ResolvedRecord);

/// Pre-loaded tables, one per dataset, in file order.
#[derive(Debug, Clone, Default)]
pub struct LinkInput {
    pub entso: Vec<EntsoRecord>,
    pub platts: Vec<PlattsRecord>,
    pub gppd: Vec<GppdRecord>,
}

// ---------------------------------------------------------------------------
// Derived
// ---------------------------------------------------------------------------

/// One Platts unit and the GPPD plant sharing its plant id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeRecord {
    pub platts_unit_id: String,
    pub gppd_plant_id: String,
}

/// An ENTSO unit plus whatever secondary identifiers have been resolved so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRecord {
    pub unit_id: String,
    pub plant_name: String,
    pub country: String,
    pub fuel_type: String,
    pub unit_capacity: Option<f64>,
    pub gppd_plant_id: Option<String>,
    pub platts_unit_id: Option<String>,
}

impl ResolvedRecord {
    /// An unresolved row for `entso`, both identifiers null.
    pub fn unresolved(entso: &EntsoRecord) -> Self {
        Self {
            unit_id: entso.unit_id.clone(),
            plant_name: entso.plant_name.clone(),
            country: entso.country.clone(),
            fuel_type: entso.fuel_type.clone(),
            unit_capacity: entso.unit_capacity,
            gppd_plant_id: None,
            platts_unit_id: None,
        }
    }
}

/// Candidate value for one field of one resolved row, produced by a bridge lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillCandidate {
    pub unit_id: String,
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkSummary {
    pub entso_rows: usize,
    pub platts_rows: usize,
    pub gppd_rows: usize,
    pub bridge_rows: usize,
    pub platts_names_rewritten: usize,
    pub gppd_names_rewritten: usize,
    /// Rows produced by the two approximate joins, before deduplication.
    pub joined_rows: usize,
    pub phase1_gppd_matches: usize,
    pub phase1_platts_matches: usize,
    pub phase2_gppd_filled: usize,
    pub phase2_platts_filled: usize,
    pub unresolved_gppd: usize,
    pub unresolved_platts: usize,
    pub fully_resolved: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkMeta {
    pub engine_version: String,
    pub run_at: String,
    pub normalized: bool,
    pub threshold: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub meta: LinkMeta,
    pub summary: LinkSummary,
    pub records: Vec<ResolvedRecord>,
}

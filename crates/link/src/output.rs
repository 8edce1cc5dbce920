use std::io::Write;

use crate::error::LinkError;
use crate::model::ResolvedRecord;

/// Header of the mapping table, in column order.
pub const MAPPING_HEADER: [&str; 3] = ["entso_unit_id", "platts_unit_id", "gppd_plant_id"];

/// Write the three-column mapping table. Null identifiers become empty cells.
pub fn write_mapping<W: Write>(records: &[ResolvedRecord], writer: W) -> Result<(), LinkError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(MAPPING_HEADER).map_err(|e| LinkError::Io(e.to_string()))?;
    for record in records {
        out.write_record([
            record.unit_id.as_str(),
            record.platts_unit_id.as_deref().unwrap_or(""),
            record.gppd_plant_id.as_deref().unwrap_or(""),
        ])
        .map_err(|e| LinkError::Io(e.to_string()))?;
    }
    out.flush().map_err(|e| LinkError::Io(e.to_string()))
}

//! CSV text → typed records, one loader per dataset.
//!
//! Loaders take CSV text rather than paths; reading files is the caller's job.
//! Empty cells are nulls. Every failure here is an input-parsing failure.

use std::collections::HashSet;

use crate::config::{EntsoColumns, GppdColumns, PlattsColumns};
use crate::error::LinkError;
use crate::model::{Dataset, EntsoRecord, GppdRecord, PlattsRecord};

/// Parsed CSV body plus the positions of the requested columns.
struct Table {
    dataset: Dataset,
    indices: Vec<usize>,
    records: Vec<csv::StringRecord>,
}

impl Table {
    fn read(dataset: Dataset, csv_data: &str, columns: &[&str]) -> Result<Self, LinkError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_data.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LinkError::Csv { dataset, message: e.to_string() })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let indices = columns
            .iter()
            .map(|name| {
                headers.iter().position(|h| h == name).ok_or_else(|| LinkError::MissingColumn {
                    dataset,
                    column: (*name).into(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LinkError::Csv { dataset, message: e.to_string() })?;

        Ok(Self { dataset, indices, records })
    }

    /// Value of the `col`-th requested column.
    fn get<'r>(&self, record: &'r csv::StringRecord, col: usize) -> &'r str {
        record.get(self.indices[col]).unwrap_or("")
    }

    /// Value of a key column; empty keys are rejected.
    fn key(&self, record: &csv::StringRecord, col: usize) -> Result<String, LinkError> {
        let value = self.get(record, col).trim();
        if value.is_empty() {
            return Err(LinkError::EmptyId {
                dataset: self.dataset,
                line: record.position().map(|p| p.line()).unwrap_or(0),
            });
        }
        Ok(value.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Load the ENTSO registry. Unit ids must be present and unique.
pub fn load_entso(csv_data: &str, columns: &EntsoColumns) -> Result<Vec<EntsoRecord>, LinkError> {
    let table = Table::read(
        Dataset::Entso,
        csv_data,
        &[
            columns.unit_id.as_str(),
            columns.plant_name.as_str(),
            columns.country.as_str(),
            columns.fuel_type.as_str(),
            columns.unit_capacity.as_str(),
        ],
    )?;

    let mut seen = HashSet::with_capacity(table.records.len());
    let mut rows = Vec::with_capacity(table.records.len());
    for record in &table.records {
        let unit_id = table.key(record, 0)?;
        if !seen.insert(unit_id.clone()) {
            return Err(LinkError::DuplicateId { dataset: Dataset::Entso, id: unit_id });
        }

        let capacity = table.get(record, 4).trim();
        let unit_capacity = if capacity.is_empty() {
            None
        } else {
            Some(capacity.parse::<f64>().map_err(|_| LinkError::InvalidValue {
                dataset: Dataset::Entso,
                record_id: unit_id.clone(),
                column: columns.unit_capacity.clone(),
                value: capacity.into(),
            })?)
        };

        rows.push(EntsoRecord {
            unit_id,
            plant_name: table.get(record, 1).to_string(),
            country: table.get(record, 2).to_string(),
            fuel_type: table.get(record, 3).to_string(),
            unit_capacity,
        });
    }

    Ok(rows)
}

/// Load the Platts unit table. Plant ids may be null.
pub fn load_platts(csv_data: &str, columns: &PlattsColumns) -> Result<Vec<PlattsRecord>, LinkError> {
    let table = Table::read(
        Dataset::Platts,
        csv_data,
        &[
            columns.unit_id.as_str(),
            columns.plant_id.as_str(),
            columns.plant_name.as_str(),
            columns.country.as_str(),
            columns.fuel_type.as_str(),
        ],
    )?;

    table
        .records
        .iter()
        .map(|record| {
            Ok(PlattsRecord {
                unit_id: table.key(record, 0)?,
                plant_id: optional(table.get(record, 1)),
                plant_name: table.get(record, 2).to_string(),
                country: table.get(record, 3).to_string(),
                fuel_type: table.get(record, 4).to_string(),
            })
        })
        .collect()
}

/// Load the GPPD plant table.
pub fn load_gppd(csv_data: &str, columns: &GppdColumns) -> Result<Vec<GppdRecord>, LinkError> {
    let table = Table::read(
        Dataset::Gppd,
        csv_data,
        &[
            columns.plant_id.as_str(),
            columns.plant_name.as_str(),
            columns.country.as_str(),
            columns.fuel_type.as_str(),
        ],
    )?;

    table
        .records
        .iter()
        .map(|record| {
            Ok(GppdRecord {
                plant_id: table.key(record, 0)?,
                plant_name: table.get(record, 1).to_string(),
                country: table.get(record, 2).to_string(),
                fuel_type: table.get(record, 3).to_string(),
            })
        })
        .collect()
}

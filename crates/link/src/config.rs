use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::LinkError;
use crate::normalize::DEFAULT_THRESHOLD;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkConfig {
    #[serde(default)]
    pub inputs: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub entso: PathBuf,
    pub platts: PathBuf,
    pub gppd: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            entso: PathBuf::from("../data/entso.csv"),
            platts: PathBuf::from("../data/platts.csv"),
            gppd: PathBuf::from("../data/gppd.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Mapping CSV, overwritten on every successful run.
    pub mapping: PathBuf,
    /// Optional JSON report (meta + summary + records).
    pub json: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mapping: PathBuf::from("../data/mapping.csv"),
            json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub enabled: bool,
    /// Minimum similarity (0–100) for a secondary name to take the ENTSO spelling.
    pub threshold: u8,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub entso: EntsoColumns,
    pub platts: PlattsColumns,
    pub gppd: GppdColumns,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntsoColumns {
    pub unit_id: String,
    pub plant_name: String,
    pub country: String,
    pub fuel_type: String,
    pub unit_capacity: String,
}

impl Default for EntsoColumns {
    fn default() -> Self {
        Self {
            unit_id: "unit_id".into(),
            plant_name: "plant_name".into(),
            country: "country".into(),
            fuel_type: "fuel_type".into(),
            unit_capacity: "unit_capacity".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlattsColumns {
    pub unit_id: String,
    pub plant_id: String,
    pub plant_name: String,
    pub country: String,
    pub fuel_type: String,
}

impl Default for PlattsColumns {
    fn default() -> Self {
        Self {
            unit_id: "unit_id".into(),
            plant_id: "plant_id".into(),
            plant_name: "plant_name".into(),
            country: "country".into(),
            fuel_type: "fuel_type".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GppdColumns {
    pub plant_id: String,
    pub plant_name: String,
    pub country: String,
    pub fuel_type: String,
}

impl Default for GppdColumns {
    fn default() -> Self {
        Self {
            plant_id: "gppd_idnr".into(),
            plant_name: "name".into(),
            country: "country_long".into(),
            fuel_type: "primary_fuel".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl LinkConfig {
    pub fn from_toml(input: &str) -> Result<Self, LinkError> {
        let config: LinkConfig =
            toml::from_str(input).map_err(|e| LinkError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LinkError> {
        if self.normalize.threshold > 100 {
            return Err(LinkError::ConfigValidation(format!(
                "normalize.threshold must be 0-100, got {}",
                self.normalize.threshold
            )));
        }

        let columns = [
            ("entso", "unit_id", &self.columns.entso.unit_id),
            ("entso", "plant_name", &self.columns.entso.plant_name),
            ("entso", "country", &self.columns.entso.country),
            ("entso", "fuel_type", &self.columns.entso.fuel_type),
            ("entso", "unit_capacity", &self.columns.entso.unit_capacity),
            ("platts", "unit_id", &self.columns.platts.unit_id),
            ("platts", "plant_id", &self.columns.platts.plant_id),
            ("platts", "plant_name", &self.columns.platts.plant_name),
            ("platts", "country", &self.columns.platts.country),
            ("platts", "fuel_type", &self.columns.platts.fuel_type),
            ("gppd", "plant_id", &self.columns.gppd.plant_id),
            ("gppd", "plant_name", &self.columns.gppd.plant_name),
            ("gppd", "country", &self.columns.gppd.country),
            ("gppd", "fuel_type", &self.columns.gppd.fuel_type),
        ];
        for (dataset, field, name) in columns {
            if name.trim().is_empty() {
                return Err(LinkError::ConfigValidation(format!(
                    "columns.{dataset}.{field} must not be empty"
                )));
            }
        }

        self.check_output_paths(lexically_equal)
    }

    /// Reject an output path that names an input file or another output.
    /// `same` decides when two paths point at the same file; `validate` uses a
    /// lexical comparison, callers with filesystem access can pass a stricter one.
    pub fn check_output_paths(&self, same: impl Fn(&Path, &Path) -> bool) -> Result<(), LinkError> {
        let inputs = [
            ("inputs.entso", self.inputs.entso.as_path()),
            ("inputs.platts", self.inputs.platts.as_path()),
            ("inputs.gppd", self.inputs.gppd.as_path()),
        ];
        let mut outputs = vec![("output.mapping", self.output.mapping.as_path())];
        if let Some(json) = &self.output.json {
            outputs.push(("output.json", json.as_path()));
        }

        for (i, &(key, output)) in outputs.iter().enumerate() {
            if let Some((input_key, _)) = inputs.iter().find(|&&(_, input)| same(output, input)) {
                return Err(LinkError::ConfigValidation(format!(
                    "{key} '{}' would overwrite {input_key}",
                    output.display()
                )));
            }
            if let Some((other_key, _)) = outputs[..i].iter().find(|&&(_, other)| same(output, other)) {
                return Err(LinkError::ConfigValidation(format!(
                    "{key} '{}' is the same file as {other_key}",
                    output.display()
                )));
            }
        }
        Ok(())
    }

    /// Resolve relative paths against `base` (the config file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.inputs.entso,
            &mut self.inputs.platts,
            &mut self.inputs.gppd,
            &mut self.output.mapping,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        if let Some(json) = self.output.json.as_mut() {
            if json.is_relative() {
                *json = base.join(&*json);
            }
        }
    }
}

/// Equal once `.` components are dropped (`./a.csv` is `a.csv`).
fn lexically_equal(a: &Path, b: &Path) -> bool {
    let strip = |p: &Path| -> PathBuf {
        p.components().filter(|c| !matches!(c, Component::CurDir)).collect()
    };
    strip(a) == strip(b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

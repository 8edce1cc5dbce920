//! `triforce` / `triforce validate`: file I/O around the link engine.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Args;

use triforce_link::model::Dataset;
use triforce_link::{load_input, run, write_mapping, LinkConfig, LinkInput, LinkReport};

use crate::exit_codes::{EXIT_ERROR, EXIT_INVALID_OPTIONS, EXIT_OUTPUT_FAILED, EXIT_PARSE_FILE};
use crate::CliError;

/// Where the inputs come from. Flags override the config file.
#[derive(Args)]
pub struct InputArgs {
    /// TOML config file; relative paths inside it resolve against its directory
    #[arg(long, env = "TRIFORCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// ENTSO units CSV [default: ../data/entso.csv]
    #[arg(short, long)]
    pub entso: Option<PathBuf>,

    /// Platts units CSV [default: ../data/platts.csv]
    #[arg(short, long)]
    pub platts: Option<PathBuf>,

    /// GPPD plants CSV [default: ../data/gppd.csv]
    #[arg(short, long)]
    pub gppd: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Mapping CSV to write, overwritten on success [default: ../data/mapping.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rewrite Platts and GPPD plant names to their closest ENTSO spelling first
    #[arg(short, long)]
    pub normalize_names: bool,

    /// Minimum similarity (0-100) for a name rewrite [default: 90]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Print the JSON report to stdout instead of the human summary
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = load_config(&args.inputs)?;
    if let Some(output) = args.output {
        config.output.mapping = output;
    }
    if args.normalize_names {
        config.normalize.enabled = true;
    }
    if let Some(threshold) = args.threshold {
        config.normalize.threshold = threshold;
    }
    if let Some(report) = args.report {
        config.output.json = Some(report);
    }
    check_config(&config)?;

    let input = read_inputs(&config)?;
    let report = run(&config.normalize, input);

    write_mapping_file(&config.output.mapping, &report)?;
    if let Some(path) = &config.output.json {
        let json = report_json(&report)?;
        std::fs::write(path, json).map_err(|e| {
            link_err(EXIT_OUTPUT_FAILED, format!("cannot write report {}: {e}", path.display()))
        })?;
        log::debug!("wrote report to {}", path.display());
    }

    if args.json {
        println!("{}", report_json(&report)?);
    } else {
        print_summary(&report, &config.output.mapping);
    }
    Ok(())
}

pub fn cmd_validate(args: InputArgs) -> Result<(), CliError> {
    let config = load_config(&args)?;
    check_config(&config)?;
    let input = read_inputs(&config)?;
    eprintln!(
        "valid: {} entso, {} platts, {} gppd rows; mapping goes to {}",
        input.entso.len(),
        input.platts.len(),
        input.gppd.len(),
        config.output.mapping.display(),
    );
    Ok(())
}

fn link_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Config file (or defaults) with the input path flags applied.
fn load_config(args: &InputArgs) -> Result<LinkConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                link_err(EXIT_INVALID_OPTIONS, format!("cannot read config {}: {e}", path.display()))
            })?;
            let mut config = LinkConfig::from_toml(&text).map_err(CliError::link)?;
            config.resolve_paths(path.parent().unwrap_or_else(|| Path::new(".")));
            config
        }
        None => LinkConfig::default(),
    };

    if let Some(entso) = &args.entso {
        config.inputs.entso = entso.clone();
    }
    if let Some(platts) = &args.platts {
        config.inputs.platts = platts.clone();
    }
    if let Some(gppd) = &args.gppd {
        config.inputs.gppd = gppd.clone();
    }
    Ok(config)
}

/// Validate the config, then compare output and input paths as the
/// filesystem resolves them (`sub/../entso.csv`, symlinks).
fn check_config(config: &LinkConfig) -> Result<(), CliError> {
    config.validate().map_err(CliError::link)?;
    config.check_output_paths(same_file).map_err(CliError::link)
}

fn same_file(a: &Path, b: &Path) -> bool {
    resolved_path(a) == resolved_path(b)
}

/// Canonical path of an existing file; for a file not yet written, its
/// canonical parent joined with the file name.
fn resolved_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (std::fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Read and parse all three tables before anything is linked or written.
fn read_inputs(config: &LinkConfig) -> Result<LinkInput, CliError> {
    let entso = read_table(Dataset::Entso, &config.inputs.entso)?;
    let platts = read_table(Dataset::Platts, &config.inputs.platts)?;
    let gppd = read_table(Dataset::Gppd, &config.inputs.gppd)?;
    load_input(&config.columns, &entso, &platts, &gppd).map_err(CliError::link)
}

fn read_table(dataset: Dataset, path: &Path) -> Result<String, CliError> {
    log::debug!("reading {dataset} from {}", path.display());
    std::fs::read_to_string(path).map_err(|e| {
        link_err(EXIT_PARSE_FILE, format!("cannot read {dataset} file {}: {e}", path.display()))
            .with_hint(format!("pass --{dataset} <path> or set inputs.{dataset} in a --config file"))
    })
}

fn write_mapping_file(path: &Path, report: &LinkReport) -> Result<(), CliError> {
    let file = File::create(path).map_err(|e| {
        link_err(EXIT_OUTPUT_FAILED, format!("cannot create {}: {e}", path.display()))
    })?;
    write_mapping(&report.records, file).map_err(CliError::link)?;
    log::debug!("wrote {} mapping rows to {}", report.records.len(), path.display());
    Ok(())
}

fn report_json(report: &LinkReport) -> Result<String, CliError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| link_err(EXIT_ERROR, format!("JSON serialization failed: {e}")))
}

fn print_summary(report: &LinkReport, mapping: &Path) {
    let s = &report.summary;
    eprintln!(
        "linked {} entso units: {} to gppd, {} to platts, {} to both",
        s.entso_rows,
        s.entso_rows - s.unresolved_gppd,
        s.entso_rows - s.unresolved_platts,
        s.fully_resolved,
    );
    if s.phase2_gppd_filled + s.phase2_platts_filled > 0 {
        eprintln!(
            "  via plant-id bridge: {} gppd, {} platts",
            s.phase2_gppd_filled, s.phase2_platts_filled
        );
    }
    if report.meta.normalized {
        eprintln!(
            "  names normalized: {} platts, {} gppd",
            s.platts_names_rewritten, s.gppd_names_rewritten
        );
    }
    if s.unresolved_gppd + s.unresolved_platts > 0 {
        eprintln!(
            "  unresolved: {} without gppd plant, {} without platts unit",
            s.unresolved_gppd, s.unresolved_platts
        );
    }
    eprintln!("wrote {}", mapping.display());
}

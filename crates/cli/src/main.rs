// triforce - links ENTSO generation units to Platts units and GPPD plants

mod exit_codes;
mod link;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{link_exit_code, EXIT_SUCCESS, EXIT_USAGE};
use triforce_link::LinkError;

#[derive(Parser)]
#[command(name = "triforce")]
#[command(about = "Link ENTSO generation units to Platts units and GPPD plants")]
#[command(version)]
#[command(subcommand_required = false)]
#[command(after_help = "\
Examples:
  triforce
  triforce -e entso.csv -p platts.csv -g gppd.csv -o mapping.csv
  triforce --config link.toml --normalize-names
  triforce --config link.toml --json > report.json
  triforce validate --config link.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: link::RunArgs,

    /// Log every pipeline phase (debug level); RUST_LOG overrides
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the config and parse all three inputs without linking
    #[command(after_help = "\
Examples:
  triforce validate
  triforce validate --config link.toml
  triforce validate -e entso.csv -p platts.csv -g gppd.csv")]
    Validate(link::InputArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };
    init_logging(cli.verbose);

    let result = match cli.command {
        None => link::cmd_run(cli.run),
        Some(Commands::Validate(inputs)) => link::cmd_validate(inputs),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Create error from an engine error with the matching exit code.
    pub fn link(err: LinkError) -> Self {
        let code = link_exit_code(&err);
        let hint = match &err {
            LinkError::MissingColumn { dataset, .. } => {
                Some(format!("map the column under [columns.{dataset}] in a --config file"))
            }
            LinkError::DuplicateId { .. } => Some("entso unit ids must be unique".to_string()),
            LinkError::ConfigValidation(_) => Some("run `triforce validate` to check a config".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

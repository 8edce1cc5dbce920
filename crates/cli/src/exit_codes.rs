//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `triforce` exit codes.
//! Exit codes are part of the shell contract: pipeline scripts branch on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success (unresolved identifiers are not failures)  |
//! | 1    | General error (unspecified)                        |
//! | 2    | Usage error (bad arguments, rejected by clap)      |
//! | 3    | Invalid options or config file                     |
//! | 4    | An input file is missing or cannot be parsed       |
//! | 7    | The mapping or report file could not be written    |
//! | 11   | Duplicate ENTSO unit id                            |
//! | 12   | Empty (invalid) id in an input table               |
//!
//! The numbering matches the linker's historical return codes, so gaps
//! (5, 6, 8-10) stay unassigned.

use triforce_link::LinkError;

/// Success - mapping written.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown flags, out-of-range values.
pub const EXIT_USAGE: u8 = 2;

/// Config file unreadable, malformed, or rejected by validation.
pub const EXIT_INVALID_OPTIONS: u8 = 3;

/// Input file missing, unreadable, or not a valid table
/// (missing column, bad CSV, unparsable capacity).
pub const EXIT_PARSE_FILE: u8 = 4;

/// Mapping CSV or JSON report could not be created or written.
pub const EXIT_OUTPUT_FAILED: u8 = 7;

/// The same ENTSO unit id appears twice.
pub const EXIT_ID_DUPLICATED: u8 = 11;

/// A required id cell is empty.
pub const EXIT_ID_INVALID: u8 = 12;

/// Map a LinkError to its exit code. Id errors keep their own codes; every
/// other input-table failure is a parse failure.
pub fn link_exit_code(err: &LinkError) -> u8 {
    match err {
        LinkError::ConfigParse(_) | LinkError::ConfigValidation(_) => EXIT_INVALID_OPTIONS,
        LinkError::DuplicateId { .. } => EXIT_ID_DUPLICATED,
        LinkError::EmptyId { .. } => EXIT_ID_INVALID,
        err if err.is_parse_failure() => EXIT_PARSE_FILE,
        LinkError::Io(_) => EXIT_OUTPUT_FAILED,
        _ => EXIT_ERROR,
    }
}

//! `triforce-link`: links ENTSO, Platts and GPPD power-plant records.
//!
//! Pure engine crate: receives CSV text or pre-loaded records, returns the
//! resolved mapping plus a run report. No CLI or filesystem access.

pub mod bridge;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod fill;
pub mod join;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod output;
pub mod similarity;

pub use config::LinkConfig;
pub use engine::{load_input, run, LinkContext};
pub use error::LinkError;
pub use model::{LinkInput, LinkReport, ResolvedRecord};
pub use output::write_mapping;

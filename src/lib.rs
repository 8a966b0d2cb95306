//! SSZ Static Generator
//!
//! Writes `ssz_static` conformance vectors to disk.
//!
//! - **Generation**: see [`ssz_static_core`] for catalogs, modes and encoding
//! - **Layout**: [`paths`] maps a case to its directory and part files
//! - **Emission**: [`writer`] writes cases in parallel and reports the run

pub mod paths;
pub mod writer;

pub use writer::{CaseOutcome, CaseWriter};

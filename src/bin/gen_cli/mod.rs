//! CLI subcommand implementations for ssz-static-gen

pub mod case;
pub mod generate;
pub mod list_types;
pub mod output;

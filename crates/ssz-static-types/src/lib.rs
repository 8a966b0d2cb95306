//! Shared types for the ssz-static-gen workspace.
//!
//! This crate holds the data model the generator, codec and writer agree on:
//!
//! - [`descriptor`]: [`TypeDescriptor`] shapes and their validation
//! - [`value`]: [`Value`] data and the [`GeneratedValue`] pairing
//! - [`preset`]: size presets and the explicit [`ConfigContext`]

pub mod descriptor;
pub mod encoding;
pub mod env_utils;
pub mod preset;
pub mod value;

pub use descriptor::{DescriptorError, RecordDescriptor, TypeDescriptor, BYTES_PER_LENGTH_OFFSET};
pub use preset::{ConfigContext, Preset, MAINNET, MINIMAL, PRESET_NAMES};
pub use value::{GeneratedValue, Uint, Value};

//! Hex encoding helpers shared by the encoder, the writer and the CLI.

use anyhow::{anyhow, Result};

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a hex string to raw bytes.
///
/// # Arguments
/// * `hex_str` - Hex string (with or without 0x prefix)
/// * `context` - Description for error messages
pub fn parse_hex_bytes(hex_str: &str, context: &str) -> Result<Vec<u8>> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(hex_str).map_err(|e| anyhow!("Invalid {} hex '{}': {}", context, hex_str, e))
}

/// Parse a `0x`-prefixed 32-byte root.
pub fn parse_root(hex_str: &str) -> Result<[u8; 32]> {
    let bytes = parse_hex_bytes(hex_str, "root")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow!("Root must be 32 bytes, got {}", b.len()))
}

//! Event log export and fingerprinting.
//!
//! A digest is the hex SHA-256 of the JSON-serialized log. Two runs with the
//! same seed, content and choices produce the same digest.

use std::io::Write;

use combat_core::EventLog;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Hex SHA-256 over the JSON encoding of `log`.
pub fn log_digest(log: &EventLog) -> Result<String> {
    let bytes = serde_json::to_vec(log)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Writes one JSON object per event, newline separated.
pub fn write_json_lines<W: Write>(log: &EventLog, mut out: W) -> Result<()> {
    for event in log.iter() {
        serde_json::to_writer(&mut out, event)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

//! Checksum validation for migrations
//!
//! Each applied migration records the SHA-256 of its SQL; a later run with
//! different embedded SQL under the same id is refused.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of migration SQL
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Whether `recorded` matches the checksum of `sql`; rows recorded without
/// a checksum are accepted
pub fn matches(recorded: Option<&str>, sql: &str) -> bool {
    recorded.map_or(true, |r| r == compute_checksum(sql))
}

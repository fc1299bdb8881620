//! Transaction reference generation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a fresh reference: `TXN` + UTC millisecond timestamp + 8 random hex chars.
pub fn generate() -> String {
    generate_at(Utc::now())
}

/// Generate a reference for the given instant.
pub fn generate_at(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("TXN{}{}", now.format("%Y%m%d%H%M%S%3f"), &random[..8])
}

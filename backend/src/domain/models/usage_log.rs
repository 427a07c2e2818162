//! Domain model for the points usage ledger.
use chrono::{DateTime, Utc};

/// One spend of earned points. Entries are only ever appended or wiped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageLogEntry {
    pub id: String,
    pub child_id: String,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

impl UsageLogEntry {
    /// Largest single spend the ledger accepts
    pub const MAX_AMOUNT: i64 = 1_000_000_000;

    pub fn generate_id(child_id: &str, epoch_millis: i64) -> String {
        format!("usage::{}::{}::{}", child_id, epoch_millis, uuid::Uuid::new_v4().simple())
    }
}

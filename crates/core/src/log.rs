//! Access log entries as rendered on the log board.

use serde::{Deserialize, Serialize};

use crate::types::{AccessAction, EntityType, Timestamp};

/// One entry/exit event, produced by the backend.
///
/// Entries are read-only on the terminal: newer entries for the same
/// entity supersede older ones, nothing is mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogEntry {
    /// Backend identifier of the entity this entry belongs to.
    pub target_id: String,

    /// Which log the entry came from; tagged client-side during fan-out.
    pub target_type: EntityType,

    /// Entry or exit, as resolved by the backend.
    pub action: AccessAction,

    /// When the event was recorded (UTC).
    pub log_time: Timestamp,

    /// Display fields. Which ones are present depends on `target_type`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rut: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl AccessLogEntry {
    /// Case-insensitive substring match against the board filter.
    ///
    /// Matches name, RUT, target id, entity type, plate, and company,
    /// mirroring what an operator can see in the table.
    pub fn matches_filter(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let haystacks = [
            Some(self.target_id.as_str()),
            Some(self.target_type.as_str()),
            self.name.as_deref(),
            self.rut.as_deref(),
            self.plate.as_deref(),
            self.company.as_deref(),
        ];

        haystacks
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

//! Wire-format types for the backend REST contract.
//!
//! The backend speaks a mix of snake_case and camelCase
//! (`person_details`, `photoUrl`); the renames here pin the exact
//! field names so the rest of the system only sees core types.

use serde::Deserialize;

use portico_core::{
    AccessAction, AccessLogEntry, EntityType, PersonDetails, ScanOutcome, ScanPayload, Timestamp,
};

/// Tag discriminating the three possible scan outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    Success,
    ClarificationRequired,
    Error,
}

/// Response body of `POST /access/portico`.
#[derive(Debug, Deserialize)]
pub struct PorticoResponse {
    pub outcome: OutcomeTag,
    #[serde(default)]
    pub action: Option<AccessAction>,
    #[serde(default, rename = "type")]
    pub target_type: Option<EntityType>,
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
    #[serde(default, rename = "photoUrl")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub person_details: Option<PersonDetails>,
}

impl PorticoResponse {
    /// Collapse the wire response into a [`ScanOutcome`].
    ///
    /// A `clarification_required` response without `person_details`, or
    /// an `error` response without a message, still maps onto the
    /// declared tag with a generic payload rather than inventing a
    /// fourth state.
    pub fn into_outcome(self) -> ScanOutcome {
        match self.outcome {
            OutcomeTag::Success => ScanOutcome::Success(ScanPayload {
                action: self.action,
                target_type: self.target_type,
                name: self.name,
                rut: self.rut,
                unit: self.unit,
                plate: self.plate,
                company: self.company,
                photo_url: self.photo_url,
                message: self.message,
            }),
            OutcomeTag::ClarificationRequired => match self.person_details {
                Some(details) => ScanOutcome::ClarificationRequired(details),
                None => ScanOutcome::Failure(
                    "Clarification requested without person details".to_string(),
                ),
            },
            OutcomeTag::Error => ScanOutcome::Failure(
                self.message
                    .unwrap_or_else(|| "Acceso rechazado".to_string()),
            ),
        }
    }
}

/// Response body of `POST /access/clarified`.
#[derive(Debug, Default, Deserialize)]
pub struct ClarifiedResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub target_type: Option<EntityType>,
    #[serde(default)]
    pub action: Option<AccessAction>,
    #[serde(default, rename = "photoUrl")]
    pub photo_url: Option<String>,
}

impl ClarifiedResponse {
    pub fn into_payload(self) -> ScanPayload {
        ScanPayload {
            action: self.action,
            target_type: self.target_type,
            name: self.name,
            rut: self.id,
            unit: None,
            plate: None,
            company: None,
            photo_url: self.photo_url,
            message: self.message,
        }
    }
}

/// One element of `GET /access/logs?target_type=<type>`.
///
/// Entries arrive untyped; the client tags each with the entity type it
/// fanned out for.
#[derive(Debug, Deserialize)]
pub struct LogEntryWire {
    pub target_id: String,
    pub action: AccessAction,
    pub log_time: Timestamp,
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
    #[serde(default, rename = "photoUrl")]
    pub photo_url: Option<String>,
}

impl LogEntryWire {
    pub fn into_entry(self, target_type: EntityType) -> AccessLogEntry {
        AccessLogEntry {
            target_id: self.target_id,
            target_type,
            action: self.action,
            log_time: self.log_time,
            name: self.name,
            rut: self.rut,
            unit: self.unit,
            plate: self.plate,
            company: self.company,
            photo_url: self.photo_url,
        }
    }
}

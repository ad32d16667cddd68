//! Scan submission outcomes.

use serde::{Deserialize, Serialize};

use crate::types::{AccessAction, EntityType};

/// Result of submitting one scanned identifier to the backend.
///
/// Exactly one variant is produced per submission; the orchestrator
/// branches on this tag and never invents a fourth state.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// The backend recorded the access and resolved entrada/salida.
    Success(ScanPayload),

    /// The backend could not classify the access; the operator must
    /// supply a reason. Not an error.
    ClarificationRequired(PersonDetails),

    /// The backend rejected the scan (unknown id, access denied,
    /// out-of-window). The message is rendered verbatim.
    Failure(String),
}

/// Display payload of a successful scan or clarified entry.
///
/// All fields are optional: a `204 No Content` response decodes to an
/// empty payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanPayload {
    pub action: Option<AccessAction>,
    pub target_type: Option<EntityType>,
    pub name: Option<String>,
    pub rut: Option<String>,
    pub unit: Option<String>,
    pub plate: Option<String>,
    pub company: Option<String>,
    pub photo_url: Option<String>,
    pub message: Option<String>,
}

/// Context for the clarification sub-flow.
///
/// Owned transiently by the flow; discarded when it closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDetails {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub rut: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    pub is_resident: bool,
    #[serde(default)]
    pub photo_ref: Option<String>,
}

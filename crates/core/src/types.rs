//! Fundamental enums and aliases shared by every layer.

use serde::{Deserialize, Serialize};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The kind of entity an access log entry refers to.
///
/// Wire values match the backend's `target_type` query parameter and the
/// `type` field of scan responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Personal,
    Vehiculo,
    Visita,
    PersonalComision,
    EmpresaEmpleado,
}

impl EntityType {
    /// Every entity type the backend serves logs for, in fan-out order.
    pub const ALL: [EntityType; 5] = [
        EntityType::Personal,
        EntityType::Vehiculo,
        EntityType::Visita,
        EntityType::PersonalComision,
        EntityType::EmpresaEmpleado,
    ];

    /// Wire representation, as used in `target_type=<type>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Personal => "personal",
            EntityType::Vehiculo => "vehiculo",
            EntityType::Visita => "visita",
            EntityType::PersonalComision => "personal_comision",
            EntityType::EmpresaEmpleado => "empresa_empleado",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry or exit, as decided by the backend.
///
/// The terminal never computes this itself — it renders what the server
/// decided for each scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    Entrada,
    Salida,
}

impl AccessAction {
    /// Uppercase label shown on feedback cards ("ENTRADA" / "SALIDA").
    pub fn label(&self) -> &'static str {
        match self {
            AccessAction::Entrada => "ENTRADA",
            AccessAction::Salida => "SALIDA",
        }
    }
}

impl std::fmt::Display for AccessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessAction::Entrada => f.write_str("entrada"),
            AccessAction::Salida => f.write_str("salida"),
        }
    }
}

/// Trim a raw scanned identifier (RUT, plate, or visitor id).
///
/// Returns `None` for identifiers that are empty after trimming; those
/// must be rejected before any network call.
pub fn normalize_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

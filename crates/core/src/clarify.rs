//! Clarification decisions for out-of-hours personnel.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reason the operator selects when clarifying an ambiguous access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClarificationReason {
    Residencia,
    Trabajo,
    Otros,
}

impl ClarificationReason {
    /// Most likely reason given residency status; preselected when the
    /// flow opens.
    pub fn default_for(is_resident: bool) -> Self {
        if is_resident {
            ClarificationReason::Residencia
        } else {
            ClarificationReason::Trabajo
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClarificationReason::Residencia => "residencia",
            ClarificationReason::Trabajo => "trabajo",
            ClarificationReason::Otros => "otros",
        }
    }
}

/// The operator's resolution of a clarification, submitted to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarificationDecision {
    pub person_id: i64,
    pub reason: ClarificationReason,
    /// Free-text detail; required iff `reason` is `Otros`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ClarificationDecision {
    /// Reject a decision locally before it reaches the network layer.
    ///
    /// `Otros` without non-empty details is invalid.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.reason == ClarificationReason::Otros {
            let blank = self
                .details
                .as_deref()
                .map(|d| d.trim().is_empty())
                .unwrap_or(true);
            if blank {
                return Err(CoreError::Validation(
                    "Reason 'otros' requires a non-empty detail".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resident_defaults_to_residencia() {
        assert_eq!(
            ClarificationReason::default_for(true),
            ClarificationReason::Residencia
        );
    }

    #[test]
    fn non_resident_defaults_to_trabajo() {
        assert_eq!(
            ClarificationReason::default_for(false),
            ClarificationReason::Trabajo
        );
    }

    #[test]
    fn otros_without_details_is_rejected() {
        let decision = ClarificationDecision {
            person_id: 42,
            reason: ClarificationReason::Otros,
            details: None,
        };
        assert!(decision.validate().is_err());
    }

    #[test]
    fn otros_with_blank_details_is_rejected() {
        let decision = ClarificationDecision {
            person_id: 42,
            reason: ClarificationReason::Otros,
            details: Some("   ".into()),
        };
        assert!(decision.validate().is_err());
    }

    #[test]
    fn otros_with_details_passes() {
        let decision = ClarificationDecision {
            person_id: 42,
            reason: ClarificationReason::Otros,
            details: Some("Retiro de documentos".into()),
        };
        assert!(decision.validate().is_ok());
    }

    #[test]
    fn residencia_without_details_passes() {
        let decision = ClarificationDecision {
            person_id: 42,
            reason: ClarificationReason::Residencia,
            details: None,
        };
        assert!(decision.validate().is_ok());
    }

    #[test]
    fn reason_serializes_lowercase() {
        let json = serde_json::to_string(&ClarificationReason::Residencia).unwrap();
        assert_eq!(json, "\"residencia\"");
    }
}

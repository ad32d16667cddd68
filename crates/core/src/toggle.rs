//! Shared "Control de Unidades" enable/disable flag.

use serde::{Deserialize, Serialize};

/// The server-side control flag, one shared value for all terminals.
///
/// Each terminal caches the last successfully fetched value; local
/// input-lock state must always be a pure function of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleState {
    pub enabled: bool,
}

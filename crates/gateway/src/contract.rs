//! The gateway contract the terminal depends on.

use portico_core::{
    AccessLogEntry, ClarificationDecision, EntityType, ScanOutcome, ScanPayload, ToggleState,
};

use crate::api::GatewayError;

/// Remote access-log service contract.
///
/// The production implementation is [`AccessApi`](crate::api::AccessApi);
/// tests substitute scripted gateways. Implementations never swallow
/// errors — every call resolves to a typed outcome or a
/// [`GatewayError`].
pub trait AccessGateway: Send + Sync {
    /// Submit one scanned identifier at the pórtico.
    fn log_portico(
        &self,
        identifier: &str,
    ) -> impl std::future::Future<Output = Result<ScanOutcome, GatewayError>> + Send;

    /// Submit the operator's clarification decision for an ambiguous
    /// access. Returns the resolved entry payload.
    fn log_clarified(
        &self,
        decision: &ClarificationDecision,
    ) -> impl std::future::Future<Output = Result<ScanPayload, GatewayError>> + Send;

    /// Fetch all current log entries for one entity type.
    fn fetch_logs(
        &self,
        target: EntityType,
    ) -> impl std::future::Future<Output = Result<Vec<AccessLogEntry>, GatewayError>> + Send;

    /// Read the shared control flag.
    fn control_status(
        &self,
    ) -> impl std::future::Future<Output = Result<ToggleState, GatewayError>> + Send;

    /// Write the shared control flag. The returned value is the
    /// server-confirmed state, which callers must cache instead of the
    /// locally-assumed one.
    fn set_control_status(
        &self,
        enabled: bool,
    ) -> impl std::future::Future<Output = Result<ToggleState, GatewayError>> + Send;
}

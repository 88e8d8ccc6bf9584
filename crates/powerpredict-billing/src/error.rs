//! Error types for bill estimation.

use uuid::Uuid;

/// Errors from the appliance registry and the aggregation engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BillingError {
    #[error("invalid appliance '{name}': {field} {reason}")]
    InvalidAppliance {
        name: String,
        field: &'static str,
        reason: String,
    },
    #[error("appliance not found: {0}")]
    ApplianceNotFound(Uuid),
}

//! Bill estimation for PowerPredict.
//!
//! Turns an appliance inventory and billing settings into a monthly bill with
//! per-appliance and per-category breakdowns. The engine is a pure function;
//! the registry owns the inventory and validates every mutation.

pub mod calculator;
pub mod error;
pub mod rates;
pub mod registry;

pub use calculator::{compute_bill, validate_appliance, BILLING_DAYS};
pub use error::BillingError;
pub use rates::{category_color, effective_rate, region_base_rate};
pub use registry::{ApplianceRegistry, ApplianceUpdate, NewAppliance};

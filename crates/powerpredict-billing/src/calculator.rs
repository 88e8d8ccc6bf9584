//! Bill aggregation engine.
//!
//! `compute_bill` is a pure function: identical inputs give bit-identical
//! output, and nothing is cached between calls.

use powerpredict_core::types::{
    Appliance, ApplianceUsage, BillCalculation, BillSettings, CategoryUsage,
};
use tracing::debug;

use crate::error::BillingError;
use crate::rates::{category_color, effective_rate};

/// Days used to spread the monthly bill into a daily average.
pub const BILLING_DAYS: f64 = 30.0;

/// Months used to extrapolate the yearly bill (flat, not per-season).
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Check the numeric fields of an appliance.
///
/// Rejects non-finite values and values outside their physical range. Nothing
/// is coerced: a bad field aborts the whole calculation.
pub fn validate_appliance(appliance: &Appliance) -> Result<(), BillingError> {
    check_range(appliance, "wattage", appliance.wattage, 0.0, f64::INFINITY)?;
    check_range(appliance, "hours_per_day", appliance.hours_per_day, 0.0, 24.0)?;
    check_range(appliance, "days_per_month", appliance.days_per_month, 0.0, 31.0)?;
    if let Some(rate) = appliance.cost_per_kwh {
        check_range(appliance, "cost_per_kwh", rate, 0.0, f64::INFINITY)?;
    }
    Ok(())
}

fn check_range(
    appliance: &Appliance,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), BillingError> {
    let reason = if !value.is_finite() {
        format!("must be a finite number (got {})", value)
    } else if value < min {
        format!("must be >= {} (got {})", min, value)
    } else if value > max {
        format!("must be <= {} (got {})", max, value)
    } else {
        return Ok(());
    };
    Err(BillingError::InvalidAppliance {
        name: appliance.name.clone(),
        field,
        reason,
    })
}

/// Compute the bill for an appliance inventory.
///
/// Returns `Ok(None)` for an empty inventory: "no data yet" is distinct from a
/// zero bill. The monthly bill is the sum of per-appliance costs, since each
/// appliance can carry its own effective rate.
pub fn compute_bill(
    appliances: &[Appliance],
    settings: &BillSettings,
) -> Result<Option<BillCalculation>, BillingError> {
    if appliances.is_empty() {
        debug!("No appliances, skipping bill calculation");
        return Ok(None);
    }

    for appliance in appliances {
        validate_appliance(appliance)?;
    }

    let mut total_kwh = 0.0;
    let mut monthly_bill = 0.0;
    let mut appliance_breakdown = Vec::with_capacity(appliances.len());

    for appliance in appliances {
        let monthly_kwh = appliance.monthly_kwh();
        let monthly_cost = monthly_kwh * effective_rate(appliance, settings);
        total_kwh += monthly_kwh;
        monthly_bill += monthly_cost;
        appliance_breakdown.push(ApplianceUsage {
            appliance: appliance.clone(),
            monthly_kwh,
            monthly_cost,
            percentage: 0.0,
        });
    }

    for usage in &mut appliance_breakdown {
        usage.percentage = share_of(usage.monthly_cost, monthly_bill);
    }

    let category_breakdown = aggregate_categories(&appliance_breakdown, monthly_bill);

    debug!(
        appliances = appliances.len(),
        categories = category_breakdown.len(),
        total_kwh,
        monthly_bill,
        "Bill calculated"
    );

    Ok(Some(BillCalculation {
        total_kwh,
        monthly_bill,
        yearly_bill: monthly_bill * MONTHS_PER_YEAR,
        daily_average: monthly_bill / BILLING_DAYS,
        appliance_breakdown,
        category_breakdown,
    }))
}

/// Group usages by category, in order of first appearance.
fn aggregate_categories(usages: &[ApplianceUsage], monthly_bill: f64) -> Vec<CategoryUsage> {
    let mut categories: Vec<CategoryUsage> = Vec::new();

    for usage in usages {
        let name = &usage.appliance.category;
        match categories.iter_mut().find(|c| &c.category == name) {
            Some(entry) => {
                entry.monthly_kwh += usage.monthly_kwh;
                entry.monthly_cost += usage.monthly_cost;
            }
            None => categories.push(CategoryUsage {
                category: name.clone(),
                monthly_kwh: usage.monthly_kwh,
                monthly_cost: usage.monthly_cost,
                percentage: 0.0,
                color: category_color(name).to_string(),
            }),
        }
    }

    for entry in &mut categories {
        entry.percentage = share_of(entry.monthly_cost, monthly_bill);
    }
    categories
}

/// Percentage of `part` in `total`; 0 when the total is 0.
fn share_of(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

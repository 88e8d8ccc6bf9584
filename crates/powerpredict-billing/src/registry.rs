//! The user-maintained appliance inventory.
//!
//! Every mutation is validated before it lands, so the registry never holds an
//! appliance the aggregation engine would reject.

use powerpredict_core::types::{Appliance, BillCalculation, BillSettings};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculator::{compute_bill, validate_appliance};
use crate::error::BillingError;

/// Form input for a new appliance. The registry assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppliance {
    pub name: String,
    pub category: String,
    pub wattage: f64,
    pub hours_per_day: f64,
    pub days_per_month: f64,
    #[serde(default)]
    pub cost_per_kwh: Option<f64>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplianceUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub wattage: Option<f64>,
    pub hours_per_day: Option<f64>,
    pub days_per_month: Option<f64>,
    /// `Some(None)` clears the rate override.
    pub cost_per_kwh: Option<Option<f64>>,
}

/// Ordered collection of appliances, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ApplianceRegistry {
    appliances: Vec<Appliance>,
}

impl ApplianceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already-identified appliances, validating each.
    pub fn from_appliances(appliances: Vec<Appliance>) -> Result<Self, BillingError> {
        for appliance in &appliances {
            validate_named(appliance)?;
        }
        Ok(Self { appliances })
    }

    /// Validate and append a new appliance.
    pub fn add(&mut self, input: NewAppliance) -> Result<Appliance, BillingError> {
        let appliance = Appliance {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            wattage: input.wattage,
            hours_per_day: input.hours_per_day,
            days_per_month: input.days_per_month,
            cost_per_kwh: input.cost_per_kwh,
        };
        validate_named(&appliance)?;
        info!(id = %appliance.id, name = %appliance.name, "Appliance added");
        self.appliances.push(appliance.clone());
        Ok(appliance)
    }

    /// Apply a partial update. The merged appliance must validate.
    pub fn update(&mut self, id: Uuid, update: ApplianceUpdate) -> Result<Appliance, BillingError> {
        let slot = self
            .appliances
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(BillingError::ApplianceNotFound(id))?;

        let mut merged = slot.clone();
        if let Some(name) = update.name {
            merged.name = name.trim().to_string();
        }
        if let Some(category) = update.category {
            merged.category = category.trim().to_string();
        }
        if let Some(wattage) = update.wattage {
            merged.wattage = wattage;
        }
        if let Some(hours) = update.hours_per_day {
            merged.hours_per_day = hours;
        }
        if let Some(days) = update.days_per_month {
            merged.days_per_month = days;
        }
        if let Some(rate) = update.cost_per_kwh {
            merged.cost_per_kwh = rate;
        }

        validate_named(&merged)?;
        *slot = merged.clone();
        debug!(id = %id, "Appliance updated");
        Ok(merged)
    }

    /// Remove an appliance by id.
    pub fn remove(&mut self, id: Uuid) -> Result<Appliance, BillingError> {
        let index = self
            .appliances
            .iter()
            .position(|a| a.id == id)
            .ok_or(BillingError::ApplianceNotFound(id))?;
        let removed = self.appliances.remove(index);
        info!(id = %id, name = %removed.name, "Appliance removed");
        Ok(removed)
    }

    pub fn get(&self, id: Uuid) -> Option<&Appliance> {
        self.appliances.iter().find(|a| a.id == id)
    }

    pub fn list(&self) -> &[Appliance] {
        &self.appliances
    }

    pub fn len(&self) -> usize {
        self.appliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appliances.is_empty()
    }

    /// Run the aggregation engine over the current inventory.
    pub fn calculate(
        &self,
        settings: &BillSettings,
    ) -> Result<Option<BillCalculation>, BillingError> {
        compute_bill(&self.appliances, settings)
    }
}

fn validate_named(appliance: &Appliance) -> Result<(), BillingError> {
    if appliance.name.trim().is_empty() {
        return Err(BillingError::InvalidAppliance {
            name: appliance.name.clone(),
            field: "name",
            reason: "must not be empty".to_string(),
        });
    }
    validate_appliance(appliance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerpredict_core::types::category;

    fn fridge() -> NewAppliance {
        NewAppliance {
            name: "Refrigerator".to_string(),
            category: category::KITCHEN.to_string(),
            wattage: 150.0,
            hours_per_day: 24.0,
            days_per_month: 30.0,
            cost_per_kwh: None,
        }
    }

    fn tv() -> NewAppliance {
        NewAppliance {
            name: "  TV  ".to_string(),
            category: category::ELECTRONICS.to_string(),
            wattage: 120.0,
            hours_per_day: 4.0,
            days_per_month: 30.0,
            cost_per_kwh: None,
        }
    }

    #[test]
    fn test_add_assigns_id_and_trims() {
        let mut reg = ApplianceRegistry::new();
        let a = reg.add(fridge()).unwrap();
        let b = reg.add(tv()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(b.name, "TV");
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.list()[0].id, a.id);
    }

    #[test]
    fn test_add_rejects_invalid_without_mutating() {
        let mut reg = ApplianceRegistry::new();
        let mut bad = fridge();
        bad.wattage = -1.0;
        assert!(reg.add(bad).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let mut reg = ApplianceRegistry::new();
        let mut blank = fridge();
        blank.name = "   ".to_string();
        let err = reg.add(blank).unwrap_err();
        assert!(matches!(err, BillingError::InvalidAppliance { field: "name", .. }));
    }

    #[test]
    fn test_update_partial_fields() {
        let mut reg = ApplianceRegistry::new();
        let a = reg.add(fridge()).unwrap();
        let updated = reg
            .update(
                a.id,
                ApplianceUpdate {
                    hours_per_day: Some(12.0),
                    ..ApplianceUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.hours_per_day, 12.0);
        assert_eq!(updated.wattage, 150.0);
        assert_eq!(reg.get(a.id).unwrap().hours_per_day, 12.0);
    }

    #[test]
    fn test_update_clears_rate_override() {
        let mut reg = ApplianceRegistry::new();
        let mut input = fridge();
        input.cost_per_kwh = Some(0.3);
        let a = reg.add(input).unwrap();
        let updated = reg
            .update(
                a.id,
                ApplianceUpdate {
                    cost_per_kwh: Some(None),
                    ..ApplianceUpdate::default()
                },
            )
            .unwrap();
        assert!(updated.cost_per_kwh.is_none());
    }

    #[test]
    fn test_update_invalid_leaves_original() {
        let mut reg = ApplianceRegistry::new();
        let a = reg.add(fridge()).unwrap();
        let result = reg.update(
            a.id,
            ApplianceUpdate {
                days_per_month: Some(40.0),
                ..ApplianceUpdate::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(reg.get(a.id).unwrap().days_per_month, 30.0);
    }

    #[test]
    fn test_update_unknown_id() {
        let mut reg = ApplianceRegistry::new();
        let id = Uuid::new_v4();
        assert_eq!(
            reg.update(id, ApplianceUpdate::default()).unwrap_err(),
            BillingError::ApplianceNotFound(id)
        );
    }

    #[test]
    fn test_remove() {
        let mut reg = ApplianceRegistry::new();
        let a = reg.add(fridge()).unwrap();
        let b = reg.add(tv()).unwrap();
        let removed = reg.remove(a.id).unwrap();
        assert_eq!(removed.name, "Refrigerator");
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.list()[0].id, b.id);
        assert!(reg.remove(a.id).is_err());
    }

    #[test]
    fn test_calculate_tracks_mutations() {
        let mut reg = ApplianceRegistry::new();
        let settings = BillSettings::default();
        assert!(reg.calculate(&settings).unwrap().is_none());

        let a = reg.add(fridge()).unwrap();
        let first = reg.calculate(&settings).unwrap().unwrap();
        assert_eq!(first.appliance_breakdown.len(), 1);

        reg.add(tv()).unwrap();
        let second = reg.calculate(&settings).unwrap().unwrap();
        assert!(second.monthly_bill > first.monthly_bill);

        reg.remove(a.id).unwrap();
        let third = reg.calculate(&settings).unwrap().unwrap();
        assert_eq!(third.appliance_breakdown.len(), 1);
        assert_eq!(third.appliance_breakdown[0].appliance.name, "TV");
    }

    #[test]
    fn test_from_appliances_validates() {
        let mut reg = ApplianceRegistry::new();
        let mut a = reg.add(fridge()).unwrap();
        assert!(ApplianceRegistry::from_appliances(vec![a.clone()]).is_ok());
        a.hours_per_day = 30.0;
        assert!(ApplianceRegistry::from_appliances(vec![a]).is_err());
    }

    #[test]
    fn test_new_appliance_from_json() {
        let input: NewAppliance = serde_json::from_str(
            r#"{"name":"Dryer","category":"Laundry","wattage":3000,"hours_per_day":1,"days_per_month":8}"#,
        )
        .unwrap();
        assert_eq!(input.wattage, 3000.0);
        assert!(input.cost_per_kwh.is_none());
    }
}

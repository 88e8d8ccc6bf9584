use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PowerPredictError;

// =============================================================================
// Categories
// =============================================================================

/// Well-known appliance categories offered by the appliance form.
///
/// Categories are free text on [`Appliance`]; these names are the ones the
/// rate table, color table and tip table recognise.
pub mod category {
    pub const HEATING_COOLING: &str = "Heating & Cooling";
    pub const LIGHTING: &str = "Lighting";
    pub const KITCHEN: &str = "Kitchen";
    pub const ELECTRONICS: &str = "Electronics";
    pub const LAUNDRY: &str = "Laundry";
    pub const WATER_HEATING: &str = "Water Heating";
    pub const OTHER: &str = "Other";

    /// All well-known categories in form order.
    pub const ALL: [&str; 7] = [
        HEATING_COOLING,
        LIGHTING,
        KITCHEN,
        ELECTRONICS,
        LAUNDRY,
        WATER_HEATING,
        OTHER,
    ];
}

// =============================================================================
// Enums
// =============================================================================

/// Billing season. Scales the per-kWh rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    #[default]
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

/// Size of the household. Scales the load profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl HomeSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeSize::Small => "small",
            HomeSize::Medium => "medium",
            HomeSize::Large => "large",
        }
    }
}

/// Overall efficiency of the home (insulation, appliance age).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyRating {
    Poor,
    #[default]
    Average,
    Good,
    Excellent,
}

impl EfficiencyRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            EfficiencyRating::Poor => "poor",
            EfficiencyRating::Average => "average",
            EfficiencyRating::Good => "good",
            EfficiencyRating::Excellent => "excellent",
        }
    }
}

macro_rules! impl_setting_str {
    ($ty:ident, $label:literal, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PowerPredictError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_lowercase();
                $(
                    if lower == $ty::$variant.as_str() {
                        return Ok($ty::$variant);
                    }
                )+
                Err(PowerPredictError::InvalidSetting(format!(
                    "unknown {} '{}'",
                    $label, s
                )))
            }
        }
    };
}

impl_setting_str!(Season, "season", [Spring, Summer, Fall, Winter]);
impl_setting_str!(HomeSize, "home size", [Small, Medium, Large]);
impl_setting_str!(EfficiencyRating, "efficiency rating", [Poor, Average, Good, Excellent]);

// =============================================================================
// Appliance
// =============================================================================

/// A single appliance in the household inventory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    /// Identifier assigned by the registry. Generated when absent from input.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Display name, e.g. "Refrigerator".
    pub name: String,
    /// Category name, usually one of [`category::ALL`].
    pub category: String,
    /// Rated power draw in watts. Must be >= 0.
    pub wattage: f64,
    /// Average hours in use per day, 0 to 24.
    pub hours_per_day: f64,
    /// Days in use per month, 0 to 31.
    pub days_per_month: f64,
    /// Optional rate override in $/kWh. Replaces the region base rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_kwh: Option<f64>,
}

impl Appliance {
    /// Monthly energy use in kWh: `wattage / 1000 * hours_per_day * days_per_month`.
    pub fn monthly_kwh(&self) -> f64 {
        self.wattage / 1000.0 * self.hours_per_day * self.days_per_month
    }
}

// =============================================================================
// Settings
// =============================================================================

/// User-selected billing settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillSettings {
    /// Utility region name, e.g. "National Average" or "Pacific".
    pub region: String,
    /// Whether the household is on a time-of-use tariff.
    pub use_time_of_use: bool,
    pub season: Season,
    pub home_size: HomeSize,
    pub efficiency_rating: EfficiencyRating,
}

impl Default for BillSettings {
    fn default() -> Self {
        Self {
            region: "National Average".to_string(),
            use_time_of_use: false,
            season: Season::Summer,
            home_size: HomeSize::Medium,
            efficiency_rating: EfficiencyRating::Average,
        }
    }
}

// =============================================================================
// Bill calculation
// =============================================================================

/// Usage and cost attributed to a single appliance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplianceUsage {
    pub appliance: Appliance,
    pub monthly_kwh: f64,
    pub monthly_cost: f64,
    /// Share of the monthly bill, 0 to 100.
    pub percentage: f64,
}

/// Usage and cost aggregated over all appliances of one category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub category: String,
    pub monthly_kwh: f64,
    pub monthly_cost: f64,
    /// Share of the monthly bill, 0 to 100.
    pub percentage: f64,
    /// Hex chart color, e.g. "#3B82F6".
    pub color: String,
}

/// A complete bill estimate derived from the appliance inventory and settings.
///
/// Rebuilt from scratch whenever the inventory or settings change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BillCalculation {
    pub total_kwh: f64,
    pub monthly_bill: f64,
    /// Always `monthly_bill * 12`.
    pub yearly_bill: f64,
    /// `monthly_bill` spread over the billing-days constant.
    pub daily_average: f64,
    pub appliance_breakdown: Vec<ApplianceUsage>,
    pub category_breakdown: Vec<CategoryUsage>,
}

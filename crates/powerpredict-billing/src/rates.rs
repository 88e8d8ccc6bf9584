//! Rate and color tables.
//!
//! Every lookup here is a pure function of its inputs. The effective rate for
//! an appliance is
//! `base * season * home_size * efficiency * time_of_use(category)`.

use powerpredict_core::types::{
    category, Appliance, BillSettings, EfficiencyRating, HomeSize, Season,
};

/// Region used when the configured region is not in [`REGION_RATES`].
pub const DEFAULT_REGION: &str = "National Average";

/// Base electricity rate per region in $/kWh.
pub const REGION_RATES: [(&str, f64); 6] = [
    (DEFAULT_REGION, 0.16),
    ("Northeast", 0.22),
    ("Midwest", 0.14),
    ("South", 0.13),
    ("West", 0.18),
    ("Pacific", 0.27),
];

/// Peak-hour weighting per category on a time-of-use tariff.
///
/// Loads that mostly run during peak hours cost more; loads that are easy to
/// shift (laundry) cost less. Unlisted categories use 1.0.
pub const TIME_OF_USE_FACTORS: [(&str, f64); 6] = [
    (category::HEATING_COOLING, 1.25),
    (category::WATER_HEATING, 1.10),
    (category::KITCHEN, 1.05),
    (category::LIGHTING, 1.05),
    (category::LAUNDRY, 0.80),
    (category::ELECTRONICS, 0.95),
];

/// Chart color per category.
pub const CATEGORY_COLORS: [(&str, &str); 6] = [
    (category::HEATING_COOLING, "#EF4444"),
    (category::LIGHTING, "#F59E0B"),
    (category::KITCHEN, "#10B981"),
    (category::ELECTRONICS, "#3B82F6"),
    (category::LAUNDRY, "#8B5CF6"),
    (category::WATER_HEATING, "#06B6D4"),
];

/// Color for categories missing from [`CATEGORY_COLORS`].
pub const FALLBACK_COLOR: &str = "#6B7280";

/// Base rate for a region, case-insensitive. Unknown regions use the national average.
pub fn region_base_rate(region: &str) -> f64 {
    let wanted = region.trim();
    REGION_RATES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .or_else(|| REGION_RATES.first())
        .map(|(_, rate)| *rate)
        .unwrap_or(0.16)
}

pub fn season_multiplier(season: Season) -> f64 {
    match season {
        Season::Spring => 0.95,
        Season::Summer => 1.15,
        Season::Fall => 0.95,
        Season::Winter => 1.10,
    }
}

pub fn home_size_multiplier(size: HomeSize) -> f64 {
    match size {
        HomeSize::Small => 0.95,
        HomeSize::Medium => 1.0,
        HomeSize::Large => 1.08,
    }
}

pub fn efficiency_multiplier(rating: EfficiencyRating) -> f64 {
    match rating {
        EfficiencyRating::Poor => 1.15,
        EfficiencyRating::Average => 1.0,
        EfficiencyRating::Good => 0.93,
        EfficiencyRating::Excellent => 0.87,
    }
}

/// Time-of-use weighting for a category. 1.0 when time-of-use is off.
pub fn time_of_use_factor(category: &str, use_time_of_use: bool) -> f64 {
    if !use_time_of_use {
        return 1.0;
    }
    TIME_OF_USE_FACTORS
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(1.0, |(_, factor)| *factor)
}

/// Effective $/kWh for one appliance under the given settings.
pub fn effective_rate(appliance: &Appliance, settings: &BillSettings) -> f64 {
    let base = appliance
        .cost_per_kwh
        .unwrap_or_else(|| region_base_rate(&settings.region));
    base * season_multiplier(settings.season)
        * home_size_multiplier(settings.home_size)
        * efficiency_multiplier(settings.efficiency_rating)
        * time_of_use_factor(&appliance.category, settings.use_time_of_use)
}

/// Chart color for a category.
pub fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(FALLBACK_COLOR, |(_, color)| *color)
}

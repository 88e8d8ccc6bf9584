//! Rule-based advisory engine.
//!
//! Resolution order for a query:
//! 1. bill-specific answer when a bill exists and the query talks about cost,
//! 2. knowledge base topic,
//! 3. default answer.
//!
//! Only the response variant is random; every number and suggestion list is
//! fixed for fixed inputs.

use powerpredict_core::types::{category, Appliance, ApplianceUsage, BillCalculation};
use tracing::debug;

use crate::error::ChatError;
use crate::knowledge::{find_topic, pick_response, pick_suggestions};
use crate::random::RandomSource;
use crate::types::{AdvisoryResponse, ResponseSource};

/// Share of the monthly bill quoted as achievable savings.
pub const SAVINGS_RATE: f64 = 0.20;

/// Upper end of the quoted savings range, relative to the lower end.
const SAVINGS_RANGE_FACTOR: f64 = 1.5;

/// Query terms that switch the engine to a bill-specific answer.
const BILL_TERMS: [&str; 3] = ["bill", "cost", "reduce"];

const CATEGORY_TIPS: [(&str, [&str; 3]); 6] = [
    (
        category::HEATING_COOLING,
        ["Adjust thermostat settings", "Improve insulation", "Use ceiling fans"],
    ),
    (
        category::LIGHTING,
        ["Switch to LED bulbs", "Use natural light", "Install motion sensors"],
    ),
    (
        category::KITCHEN,
        [
            "Use energy-efficient settings",
            "Keep refrigerator optimal temp",
            "Run full dishwasher loads",
        ],
    ),
    (
        category::ELECTRONICS,
        ["Unplug when not in use", "Use power strips", "Enable power management"],
    ),
    (
        category::LAUNDRY,
        ["Wash in cold water", "Clean dryer lint filter", "Air dry when possible"],
    ),
    (
        category::WATER_HEATING,
        ["Lower water heater temp", "Fix leaks promptly", "Take shorter showers"],
    ),
];

const GENERIC_TIPS: [&str; 3] = [
    "Use energy-efficient settings",
    "Unplug when not in use",
    "Consider ENERGY STAR upgrade",
];

const NO_APPLIANCES_TEXT: &str =
    "I'd love to help you reduce your bill! Add some appliances to get personalized recommendations.";

const NO_APPLIANCES_SUGGESTIONS: [&str; 3] = [
    "How to add appliances?",
    "Common household appliances",
    "Energy saving tips",
];

const DEFAULT_SUGGESTIONS: [&str; 4] = [
    "Reduce heating/cooling costs",
    "Lower lighting bills",
    "Appliance efficiency tips",
    "Eliminate phantom loads",
];

// ============================================================================
// Public API
// ============================================================================

/// Lower end of the savings estimate for a bill.
pub fn potential_savings(bill: &BillCalculation) -> f64 {
    bill.monthly_bill * SAVINGS_RATE
}

/// Tips for an appliance category, falling back to generic tips.
pub fn category_tips(category: &str) -> Vec<String> {
    let tips = CATEGORY_TIPS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, tips)| tips)
        .unwrap_or(&GENERIC_TIPS);
    to_strings(tips)
}

/// Reject empty or oversized user input. Returns the trimmed text.
pub fn validate_query(text: &str, max_length: usize) -> Result<&str, ChatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if trimmed.chars().count() > max_length {
        return Err(ChatError::MessageTooLong(max_length));
    }
    Ok(trimmed)
}

/// Answer a query, optionally personalized with the current bill.
///
/// Bill answers read the bill's own appliance breakdown; `_appliances` is
/// not consulted.
pub fn respond(
    query: &str,
    bill: Option<&BillCalculation>,
    _appliances: &[Appliance],
    rng: &mut dyn RandomSource,
) -> AdvisoryResponse {
    let lower = query.to_lowercase();

    if let Some(bill) = bill {
        if BILL_TERMS.iter().any(|term| lower.contains(term)) {
            debug!(monthly_bill = bill.monthly_bill, "Bill-specific response");
            return bill_response(bill);
        }
    }

    if let Some(topic) = find_topic(query) {
        debug!(topic = topic.name, "Knowledge base match");
        return AdvisoryResponse {
            text: pick_response(topic, rng).to_string(),
            suggestions: pick_suggestions(topic),
            source: ResponseSource::Topic,
            topic: Some(topic.name.to_string()),
        };
    }

    debug!("No rule matched, using default response");
    default_response(bill)
}

// ============================================================================
// Response builders
// ============================================================================

fn bill_response(bill: &BillCalculation) -> AdvisoryResponse {
    let Some(top) = top_consumer(&bill.appliance_breakdown) else {
        return AdvisoryResponse {
            text: NO_APPLIANCES_TEXT.to_string(),
            suggestions: to_strings(&NO_APPLIANCES_SUGGESTIONS),
            source: ResponseSource::Bill,
            topic: None,
        };
    };

    let savings = potential_savings(bill);
    let text = format!(
        "Your monthly bill is ${:.2} with {:.0} kWh usage. Your top energy consumer is \"{}\" at ${:.2}/month. You could potentially save ${:.2}-${:.2}/month with targeted improvements!",
        bill.monthly_bill,
        bill.total_kwh,
        top.appliance.name,
        top.monthly_cost,
        savings,
        savings * SAVINGS_RANGE_FACTOR,
    );

    AdvisoryResponse {
        text,
        suggestions: category_tips(&top.appliance.category),
        source: ResponseSource::Bill,
        topic: None,
    }
}

fn default_response(bill: Option<&BillCalculation>) -> AdvisoryResponse {
    let mut text = String::from("I'm here to help you save energy and money! ");
    if let Some(bill) = bill {
        text.push_str(&format!(
            "With your current usage of {:.0} kWh/month, there are several optimization opportunities. ",
            bill.total_kwh
        ));
    }
    text.push_str("What would you like to focus on?");

    AdvisoryResponse {
        text,
        suggestions: to_strings(&DEFAULT_SUGGESTIONS),
        source: ResponseSource::Default,
        topic: None,
    }
}

/// Highest monthly cost; ties keep the earliest entry.
fn top_consumer(breakdown: &[ApplianceUsage]) -> Option<&ApplianceUsage> {
    breakdown.iter().fold(None, |best, usage| match best {
        Some(current) if usage.monthly_cost <= current.monthly_cost => Some(current),
        _ => Some(usage),
    })
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

//! Plain-text rendering for the terminal commands.

use std::fmt::Write;

use powerpredict_chat::ChatMessage;
use powerpredict_core::types::{BillCalculation, BillSettings};

/// Render a bill with its appliance and category breakdowns.
pub fn render_bill(calc: &BillCalculation, settings: &BillSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Region: {} | Season: {} | Home: {} | Efficiency: {}{}",
        settings.region,
        settings.season,
        settings.home_size,
        settings.efficiency_rating,
        if settings.use_time_of_use { " | Time-of-use" } else { "" }
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Monthly bill:   ${:.2}", calc.monthly_bill);
    let _ = writeln!(out, "Yearly bill:    ${:.2}", calc.yearly_bill);
    let _ = writeln!(out, "Daily average:  ${:.2}", calc.daily_average);
    let _ = writeln!(out, "Total usage:    {:.1} kWh/month", calc.total_kwh);

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<28} {:>10} {:>10} {:>7}", "Appliance", "kWh", "Cost", "Share");
    for usage in &calc.appliance_breakdown {
        let _ = writeln!(
            out,
            "{:<28} {:>10.1} {:>10} {:>6.1}%",
            truncate(&usage.appliance.name, 28),
            usage.monthly_kwh,
            format!("${:.2}", usage.monthly_cost),
            usage.percentage
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<28} {:>10} {:>10} {:>7}", "Category", "kWh", "Cost", "Share");
    for cat in &calc.category_breakdown {
        let _ = writeln!(
            out,
            "{:<28} {:>10.1} {:>10} {:>6.1}%",
            truncate(&cat.category, 28),
            cat.monthly_kwh,
            format!("${:.2}", cat.monthly_cost),
            cat.percentage
        );
    }
    out
}

/// Render one chat message with numbered suggestion chips.
pub fn render_message(message: &ChatMessage) -> String {
    let speaker = if message.is_bot { "assistant" } else { "you" };
    let mut out = format!("[{}] {}", speaker, message.text);
    if let Some(ref suggestions) = message.suggestions {
        for (i, suggestion) in suggestions.iter().enumerate() {
            let _ = write!(out, "\n    {}) {}", i + 1, suggestion);
        }
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerpredict_billing::compute_bill;
    use powerpredict_core::types::{category, Appliance};
    use uuid::Uuid;

    fn fridge() -> Appliance {
        Appliance {
            id: Uuid::new_v4(),
            name: "Refrigerator".to_string(),
            category: category::KITCHEN.to_string(),
            wattage: 150.0,
            hours_per_day: 24.0,
            days_per_month: 30.0,
            cost_per_kwh: None,
        }
    }

    #[test]
    fn test_render_bill_lists_breakdowns() {
        let settings = BillSettings::default();
        let calc = compute_bill(&[fridge()], &settings).unwrap().unwrap();
        let text = render_bill(&calc, &settings);
        assert!(text.contains("Region: National Average | Season: summer"));
        assert!(text.contains("Refrigerator"));
        assert!(text.contains("Kitchen"));
        assert!(text.contains("108.0 kWh/month"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_render_message_numbers_suggestions() {
        let msg = ChatMessage::bot("Hi", Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(render_message(&msg), "[assistant] Hi\n    1) A\n    2) B");
        assert_eq!(render_message(&ChatMessage::user("yo")), "[you] yo");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long appliance name", 10), "a very ...");
    }
}

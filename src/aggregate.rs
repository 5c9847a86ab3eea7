use crate::models::{DailySummary, FoodEntry, Macro, MacroValue};

/// Best-effort numeric reading of a stored macro. Anything unreadable is zero.
pub fn macro_amount(value: Option<&MacroValue>) -> f64 {
    let amount = match value {
        Some(MacroValue::Number(n)) => *n,
        Some(MacroValue::Text(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        Some(MacroValue::Other(_)) | None => 0.0,
    };
    if amount.is_finite() { amount } else { 0.0 }
}

pub fn summarize_day(entries: &[FoodEntry]) -> DailySummary {
    let mut summary = DailySummary::default();
    for entry in entries {
        for nutrient in Macro::ALL {
            summary.add(nutrient, macro_amount(entry.macro_value(nutrient)));
        }
    }
    summary
}

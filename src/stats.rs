use crate::calendar::day_key;
use crate::models::{DailySummary, DayLookup, MissingDayPolicy, WeeklyStats};
use chrono::NaiveDate;
use std::str::FromStr;

impl FromStr for MissingDayPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "zero_fill" => Ok(Self::ZeroFill),
            "exclude" => Ok(Self::Exclude),
            other => Err(format!("unknown missing-day policy '{other}' (expected zero_fill or exclude)")),
        }
    }
}

pub fn weekly_stats(dates: &[NaiveDate], days: &DayLookup, policy: MissingDayPolicy) -> WeeklyStats {
    let mut total = DailySummary::default();
    let mut days_with_data = 0u8;
    for date in dates {
        if let Some(summary) = days.get(&day_key(*date)) {
            total.accumulate(summary);
            days_with_data = days_with_data.saturating_add(1);
        }
    }

    let denom = match policy {
        MissingDayPolicy::ZeroFill => dates.len() as f64,
        MissingDayPolicy::Exclude => f64::from(days_with_data),
    };

    WeeklyStats {
        policy,
        days_with_data,
        total,
        average: total.scaled(denom),
    }
}

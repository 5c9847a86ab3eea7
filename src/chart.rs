use crate::calendar::{day_key, weekday_label};
use crate::models::{ChartSeries, DayLookup, Macro, WeeklySeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which macros the weekly chart draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroVisibility {
    pub calories: bool,
    pub protein: bool,
    pub carbs: bool,
    pub fats: bool,
}

impl Default for MacroVisibility {
    fn default() -> Self {
        Self {
            calories: true,
            protein: true,
            carbs: true,
            fats: true,
        }
    }
}

impl MacroVisibility {
    pub fn is_visible(&self, nutrient: Macro) -> bool {
        match nutrient {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fats => self.fats,
        }
    }

    pub fn with(mut self, nutrient: Macro, visible: bool) -> Self {
        match nutrient {
            Macro::Calories => self.calories = visible,
            Macro::Protein => self.protein = visible,
            Macro::Carbs => self.carbs = visible,
            Macro::Fats => self.fats = visible,
        }
        self
    }

    pub fn toggle(self, nutrient: Macro) -> Self {
        let visible = self.is_visible(nutrient);
        self.with(nutrient, !visible)
    }
}

pub fn build_series(dates: &[NaiveDate], days: &DayLookup, visibility: MacroVisibility) -> WeeklySeries {
    let labels = dates.iter().map(|date| weekday_label(*date).to_string()).collect();

    let series = Macro::ALL
        .into_iter()
        .filter(|nutrient| visibility.is_visible(*nutrient))
        .map(|nutrient| ChartSeries {
            key: nutrient,
            label: nutrient.label(),
            data: dates
                .iter()
                .map(|date| days.get(&day_key(*date)).map(|s| s.get(nutrient)).unwrap_or(0.0))
                .collect(),
        })
        .collect();

    WeeklySeries { labels, series }
}

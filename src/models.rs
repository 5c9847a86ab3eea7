use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A macro quantity as it sits in the store: a number, a numeric string, or junk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MacroValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<f64> for MacroValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MacroValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    Calories,
    Protein,
    Carbs,
    Fats,
}

impl Macro {
    pub const ALL: [Macro; 4] = [Macro::Calories, Macro::Protein, Macro::Carbs, Macro::Fats];

    pub fn label(self) -> &'static str {
        match self {
            Macro::Calories => "Calories",
            Macro::Protein => "Protein",
            Macro::Carbs => "Carbs",
            Macro::Fats => "Fat",
        }
    }
}

/// One logged food, stored at `users/{client}/foods/{day_key}/entries/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<MacroValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<MacroValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<MacroValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<MacroValue>,
    pub timestamp: DateTime<Utc>,
}

impl FoodEntry {
    pub fn macro_value(&self, nutrient: Macro) -> Option<&MacroValue> {
        match nutrient {
            Macro::Calories => self.calories.as_ref(),
            Macro::Protein => self.protein.as_ref(),
            Macro::Carbs => self.carbs.as_ref(),
            Macro::Fats => self.fats.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFoodEntry {
    pub name: String,
    #[serde(default)]
    pub calories: Option<MacroValue>,
    #[serde(default)]
    pub protein: Option<MacroValue>,
    #[serde(default)]
    pub carbs: Option<MacroValue>,
    #[serde(default)]
    pub fats: Option<MacroValue>,
    /// `YYYY-MM-DD`; today when absent.
    #[serde(default)]
    pub date: Option<String>,
}

/// Per-macro totals for one day, or any sum of days.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySummary {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl DailySummary {
    pub fn get(&self, nutrient: Macro) -> f64 {
        match nutrient {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fats => self.fats,
        }
    }

    /// Adds `amount`, saturating at `f64::MAX`/`f64::MIN` so totals stay finite.
    pub fn add(&mut self, nutrient: Macro, amount: f64) {
        let slot = match nutrient {
            Macro::Calories => &mut self.calories,
            Macro::Protein => &mut self.protein,
            Macro::Carbs => &mut self.carbs,
            Macro::Fats => &mut self.fats,
        };
        *slot = saturating_sum(*slot, amount);
    }

    pub fn accumulate(&mut self, other: &DailySummary) {
        for nutrient in Macro::ALL {
            self.add(nutrient, other.get(nutrient));
        }
    }

    pub fn scaled(&self, divisor: f64) -> DailySummary {
        if divisor == 0.0 {
            return DailySummary::default();
        }
        DailySummary {
            calories: self.calories / divisor,
            protein: self.protein / divisor,
            carbs: self.carbs / divisor,
            fats: self.fats / divisor,
        }
    }
}

fn saturating_sum(total: f64, amount: f64) -> f64 {
    let sum = total + amount;
    if sum.is_finite() {
        sum
    } else if sum > 0.0 {
        f64::MAX
    } else if sum < 0.0 {
        f64::MIN
    } else {
        0.0
    }
}

/// Day key to summary for the days that have data.
pub type DayLookup = BTreeMap<String, DailySummary>;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DayEntries {
    pub entries: Vec<FoodEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserFoods {
    pub foods: BTreeMap<String, DayEntries>,
}

/// On-disk layout, mirroring the document paths.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FoodData {
    pub users: BTreeMap<String, UserFoods>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub client_id: String,
    pub day_key: String,
    pub date: NaiveDate,
    pub entries: Vec<FoodEntry>,
    pub summary: DailySummary,
    pub fetch_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub key: Macro,
    pub label: &'static str,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySeries {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDayPolicy {
    /// Days without data count as zero and stay in the denominator.
    #[default]
    ZeroFill,
    /// Average only over days that have data.
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStats {
    pub policy: MissingDayPolicy,
    pub days_with_data: u8,
    pub total: DailySummary,
    pub average: DailySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub day_key: String,
    pub weekday: &'static str,
    pub has_data: bool,
    pub summary: DailySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekReport {
    pub client_id: String,
    pub week: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub prev_week: NaiveDate,
    pub next_week: NaiveDate,
    pub days: Vec<DayPoint>,
    pub chart: WeeklySeries,
    pub stats: WeeklyStats,
    pub failed_days: Vec<String>,
}

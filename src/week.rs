//! Loads one client's week from the food store and turns it into chart and summary data.
//!
//! Days are fetched one after another. A day that cannot be read is logged,
//! listed in `failed_days` and drawn as zero; it never fails the whole week.

use crate::aggregate::summarize_day;
use crate::calendar::{day_key, shift_weeks, week_label, week_range, weekday_label};
use crate::cancel::CancelFlag;
use crate::chart::{MacroVisibility, build_series};
use crate::models::{DayLookup, DayPoint, MissingDayPolicy, WeekReport};
use crate::repository::FoodEntryRepository;
use crate::stats::weekly_stats;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("superseded by a newer week request")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeekOptions {
    pub visibility: MacroVisibility,
    pub policy: MissingDayPolicy,
}

pub async fn load_week(
    repo: &dyn FoodEntryRepository,
    client_id: &str,
    pivot: NaiveDate,
    options: WeekOptions,
    cancel: &CancelFlag,
) -> Result<WeekReport, PipelineError> {
    let dates = week_range(pivot);
    let mut days = DayLookup::new();
    let mut failed_days = Vec::new();

    for date in dates {
        if cancel.is_cancelled() {
            debug!(client_id, %pivot, "week load cancelled");
            return Err(PipelineError::Cancelled);
        }
        let key = day_key(date);
        match repo.fetch_entries_for_day(client_id, &key).await {
            Ok(entries) if entries.is_empty() => {}
            Ok(entries) => {
                days.insert(key, summarize_day(&entries));
            }
            Err(err) => {
                warn!(client_id, day_key = %key, error = %err, "day fetch failed; treating as empty");
                failed_days.push(key);
            }
        }
    }

    if cancel.is_cancelled() {
        return Err(PipelineError::Cancelled);
    }

    Ok(assemble(client_id, dates, &days, options, failed_days))
}

fn assemble(
    client_id: &str,
    dates: [NaiveDate; 7],
    days: &DayLookup,
    options: WeekOptions,
    failed_days: Vec<String>,
) -> WeekReport {
    let points = dates
        .iter()
        .map(|date| {
            let key = day_key(*date);
            let summary = days.get(&key).copied();
            DayPoint {
                date: *date,
                weekday: weekday_label(*date),
                has_data: summary.is_some(),
                summary: summary.unwrap_or_default(),
                day_key: key,
            }
        })
        .collect();

    WeekReport {
        client_id: client_id.to_string(),
        week: week_label(dates[0]),
        start_date: dates[0],
        end_date: dates[6],
        prev_week: shift_weeks(dates[0], -1),
        next_week: shift_weeks(dates[0], 1),
        days: points,
        chart: build_series(&dates, days, options.visibility),
        stats: weekly_stats(&dates, days, options.policy),
        failed_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodEntry, Macro};
    use crate::repository::{FetchError, MemoryRepository};
    use async_trait::async_trait;
    use chrono::Utc;

    /// Raises `cancel` once `after` days have been read, as a newer request would.
    struct CancelAfter {
        inner: MemoryRepository,
        after: usize,
        cancel: CancelFlag,
    }

    #[async_trait]
    impl FoodEntryRepository for CancelAfter {
        async fn fetch_entries_for_day(&self, client_id: &str, day_key: &str) -> Result<Vec<FoodEntry>, FetchError> {
            let entries = self.inner.fetch_entries_for_day(client_id, day_key).await;
            if self.inner.fetch_count() >= self.after {
                self.cancel.cancel();
            }
            entries
        }

        async fn append_entry(&self, client_id: &str, day_key: &str, entry: FoodEntry) -> Result<(), FetchError> {
            self.inner.append_entry(client_id, day_key, entry).await
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn food(name: &str, calories: &str, protein: f64) -> FoodEntry {
        FoodEntry {
            id: name.into(),
            name: name.into(),
            calories: Some(calories.into()),
            protein: Some(protein.into()),
            carbs: Some("20".into()),
            fats: None,
            timestamp: Utc::now(),
        }
    }

    async fn seeded() -> MemoryRepository {
        let repo = MemoryRepository::new();
        repo.append_entry("anna", "20250203", food("oats", "300", 10.0)).await.unwrap();
        repo.append_entry("anna", "20250203", food("milk", "200", 8.0)).await.unwrap();
        repo.append_entry("anna", "20250205", food("pasta", "400", 15.0)).await.unwrap();
        repo.append_entry("anna", "20250207", food("steak", "600", 50.0)).await.unwrap();
        repo.append_entry("anna", "20250210", food("next week", "999", 1.0)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn week_totals_and_zero_fill_average() {
        let repo = seeded().await;
        let report = load_week(&repo, "anna", ymd(2025, 2, 6), WeekOptions::default(), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(report.start_date, ymd(2025, 2, 3));
        assert_eq!(report.end_date, ymd(2025, 2, 9));
        assert_eq!(report.week, "2025-W06");
        assert_eq!(report.prev_week, ymd(2025, 1, 27));
        assert_eq!(report.next_week, ymd(2025, 2, 10));
        assert_eq!(repo.fetch_count(), 7);

        assert_eq!(report.stats.total.calories, 1500.0);
        assert_eq!(report.stats.total.protein, 83.0);
        assert_eq!(report.stats.days_with_data, 3);
        assert!((report.stats.average.calories - 1500.0 / 7.0).abs() < 1e-9);

        assert_eq!(report.days[0].summary.calories, 500.0);
        assert!(report.days[0].has_data);
        assert!(!report.days[1].has_data);
        assert_eq!(report.chart.series[0].data, vec![500.0, 0.0, 400.0, 0.0, 600.0, 0.0, 0.0]);
        assert!(report.failed_days.is_empty());
    }

    #[tokio::test]
    async fn exclude_policy_averages_logged_days() {
        let repo = seeded().await;
        let options = WeekOptions {
            policy: MissingDayPolicy::Exclude,
            ..WeekOptions::default()
        };
        let report = load_week(&repo, "anna", ymd(2025, 2, 3), options, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(report.stats.average.calories, 500.0);
    }

    #[tokio::test]
    async fn failed_day_is_reported_and_counts_as_zero() {
        let repo = seeded().await;
        repo.fail_day("20250205").await;
        let report = load_week(&repo, "anna", ymd(2025, 2, 3), WeekOptions::default(), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(report.failed_days, vec!["20250205".to_string()]);
        assert_eq!(report.stats.total.calories, 1100.0);
        assert_eq!(report.chart.series[0].data[2], 0.0);
        assert!(!report.days[2].has_data);
    }

    #[tokio::test]
    async fn cancelled_load_stops_before_fetching() {
        let repo = seeded().await;
        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = load_week(&repo, "anna", ymd(2025, 2, 3), WeekOptions::default(), &cancel).await;
        assert_eq!(result, Err(PipelineError::Cancelled));
        assert_eq!(repo.fetch_count(), 0);
    }

    #[tokio::test]
    async fn cancel_during_week_stops_at_next_day() {
        let cancel = CancelFlag::new();
        let repo = CancelAfter {
            inner: seeded().await,
            after: 3,
            cancel: cancel.clone(),
        };
        let result = load_week(&repo, "anna", ymd(2025, 2, 3), WeekOptions::default(), &cancel).await;
        assert_eq!(result, Err(PipelineError::Cancelled));
        assert_eq!(repo.inner.fetch_count(), 3);
    }

    #[tokio::test]
    async fn cancel_after_last_day_discards_result() {
        let cancel = CancelFlag::new();
        let repo = CancelAfter {
            inner: seeded().await,
            after: 7,
            cancel: cancel.clone(),
        };
        let result = load_week(&repo, "anna", ymd(2025, 2, 3), WeekOptions::default(), &cancel).await;
        assert_eq!(result, Err(PipelineError::Cancelled));
        assert_eq!(repo.inner.fetch_count(), 7);
    }

    #[tokio::test]
    async fn reloading_same_week_is_identical() {
        let repo = seeded().await;
        let options = WeekOptions {
            visibility: MacroVisibility::default().with(Macro::Fats, false),
            ..WeekOptions::default()
        };
        let first = load_week(&repo, "anna", ymd(2025, 2, 4), options, &CancelFlag::new()).await.unwrap();
        let second = load_week(&repo, "anna", ymd(2025, 2, 8), options, &CancelFlag::new()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.chart.series.len(), 3);
    }

    #[tokio::test]
    async fn unknown_client_gets_empty_week() {
        let repo = seeded().await;
        let report = load_week(&repo, "nobody", ymd(2025, 2, 3), WeekOptions::default(), &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(report.stats.days_with_data, 0);
        assert_eq!(report.stats.average.calories, 0.0);
        assert_eq!(report.days.len(), 7);
    }
}

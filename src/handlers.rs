use crate::aggregate::summarize_day;
use crate::calendar::{day_key, parse_day_key};
use crate::chart::MacroVisibility;
use crate::errors::AppError;
use crate::models::{DayView, FoodEntry, MissingDayPolicy, NewFoodEntry, WeekReport};
use crate::state::AppState;
use crate::ui::render_dashboard;
use crate::week::{WeekOptions, load_week};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::{Datelike, Local, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};

const MAX_CLIENT_ID_LEN: usize = 128;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub client: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub date: Option<String>,
    pub calories: Option<bool>,
    pub protein: Option<bool>,
    pub carbs: Option<bool>,
    pub fats: Option<bool>,
    pub policy: Option<String>,
}

pub async fn index(Query(query): Query<DashboardQuery>) -> Result<Html<String>, AppError> {
    let client_id = query.client.unwrap_or_else(|| "demo".to_string());
    validate_client_id(&client_id)?;
    Ok(Html(render_dashboard(&client_id, today())))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn log_food(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(payload): Json<NewFoodEntry>,
) -> Result<(StatusCode, Json<FoodEntry>), AppError> {
    validate_client_id(&client_id)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    let date = match payload.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };

    let entry = FoodEntry {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        calories: payload.calories,
        protein: payload.protein,
        carbs: payload.carbs,
        fats: payload.fats,
        timestamp: Utc::now(),
    };
    let key = day_key(date);
    state.repo.append_entry(&client_id, &key, entry.clone()).await?;

    info!(client_id = %client_id, day_key = %key, entry_id = %entry.id, "food logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path((client_id, key)): Path<(String, String)>,
) -> Result<Json<DayView>, AppError> {
    validate_client_id(&client_id)?;
    let date = parse_day_key(&key).ok_or_else(|| AppError::bad_request("day key must be YYYYMMDD"))?;

    let (entries, fetch_failed) = match state.repo.fetch_entries_for_day(&client_id, &key).await {
        Ok(entries) => (entries, false),
        Err(err) => {
            warn!(client_id = %client_id, day_key = %key, error = %err, "day fetch failed; showing empty day");
            (Vec::new(), true)
        }
    };

    Ok(Json(DayView {
        summary: summarize_day(&entries),
        client_id,
        day_key: key,
        date,
        entries,
        fetch_failed,
    }))
}

pub async fn get_week(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekReport>, AppError> {
    validate_client_id(&client_id)?;
    let pivot = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    let policy = match query.policy.as_deref() {
        Some(raw) => raw.parse::<MissingDayPolicy>().map_err(AppError::bad_request)?,
        None => state.default_policy,
    };
    let defaults = MacroVisibility::default();
    let options = WeekOptions {
        visibility: MacroVisibility {
            calories: query.calories.unwrap_or(defaults.calories),
            protein: query.protein.unwrap_or(defaults.protein),
            carbs: query.carbs.unwrap_or(defaults.carbs),
            fats: query.fats.unwrap_or(defaults.fats),
        },
        policy,
    };

    let load = state.week_loads.begin(&client_id);
    let report = load_week(state.repo.as_ref(), &client_id, pivot, options, load.flag()).await?;

    info!(
        client_id = %client_id,
        week = %report.week,
        days_with_data = report.stats.days_with_data,
        failed_days = report.failed_days.len(),
        "week loaded"
    );
    Ok(Json(report))
}

fn validate_client_id(client_id: &str) -> Result<(), AppError> {
    if client_id.trim().is_empty() || client_id.len() > MAX_CLIENT_ID_LEN || client_id.contains('/') {
        return Err(AppError::bad_request("invalid client id"));
    }
    Ok(())
}

/// Only four-digit years, so the date always maps to an eight-digit day key.
fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be YYYY-MM-DD"))?;
    if !(0..=9999).contains(&date.year()) {
        return Err(AppError::bad_request("date year must be between 0000 and 9999"));
    }
    Ok(date)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::{WeekLoad, WeekLoads};
    use crate::models::DailySummary;
    use crate::repository::{FetchError, FoodEntryRepository, MemoryRepository};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    fn new_entry(body: serde_json::Value) -> Json<NewFoodEntry> {
        Json(serde_json::from_value(body).unwrap())
    }

    /// Starts a newer week load for the same client as soon as the first day is read.
    struct SupersedingRepository {
        loads: Arc<WeekLoads>,
        newer: Mutex<Option<WeekLoad>>,
    }

    #[async_trait]
    impl FoodEntryRepository for SupersedingRepository {
        async fn fetch_entries_for_day(&self, client_id: &str, _day_key: &str) -> Result<Vec<FoodEntry>, FetchError> {
            let mut newer = self.newer.lock().unwrap();
            if newer.is_none() {
                *newer = Some(self.loads.begin(client_id));
            }
            Ok(Vec::new())
        }

        async fn append_entry(&self, _client_id: &str, _day_key: &str, _entry: FoodEntry) -> Result<(), FetchError> {
            Ok(())
        }
    }

    #[test]
    fn client_id_rules() {
        assert!(validate_client_id("anna").is_ok());
        assert!(validate_client_id(" ").is_err());
        assert!(validate_client_id("a/b").is_err());
        assert!(validate_client_id(&"x".repeat(MAX_CLIENT_ID_LEN + 1)).is_err());
    }

    #[test]
    fn dates_parse() {
        assert_eq!(parse_date("2025-02-03").unwrap(), NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
        assert_eq!(parse_date("2025-02-30").unwrap_err().status, StatusCode::BAD_REQUEST);
        assert_eq!(parse_date("0000-01-01").unwrap(), NaiveDate::from_ymd_opt(0, 1, 1).unwrap());
        assert_eq!(parse_date("9999-12-31").unwrap(), NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
    }

    #[test]
    fn dates_outside_four_digit_years_are_rejected() {
        for raw in ["+10000-01-01", "10000-01-01", "-0005-01-01", "-1-01-01"] {
            assert_eq!(parse_date(raw).unwrap_err().status, StatusCode::BAD_REQUEST, "{raw}");
        }
    }

    #[tokio::test]
    async fn logged_food_shows_in_day_view() {
        let state = AppState::new(Arc::new(MemoryRepository::new()), MissingDayPolicy::ZeroFill);
        let (status, Json(created)) = log_food(
            State(state.clone()),
            Path("anna".to_string()),
            new_entry(serde_json::json!({ "name": "toast", "calories": "180", "date": "2025-02-03" })),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(day) = get_day(State(state), Path(("anna".to_string(), "20250203".to_string())))
            .await
            .unwrap();
        assert!(!day.fetch_failed);
        assert_eq!(day.entries, vec![created]);
        assert_eq!(day.summary.calories, 180.0);
    }

    #[tokio::test]
    async fn far_future_date_is_not_logged() {
        let repo = Arc::new(MemoryRepository::new());
        let state = AppState::new(repo.clone(), MissingDayPolicy::ZeroFill);
        let err = log_food(
            State(state),
            Path("anna".to_string()),
            new_entry(serde_json::json!({ "name": "toast", "date": "+10000-01-01" })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(repo.fetch_entries_for_day("anna", "100000101").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn day_view_flags_failed_fetch() {
        let repo = Arc::new(MemoryRepository::new());
        repo.append_entry("anna", "20250203", FoodEntry {
            id: "a".into(),
            name: "toast".into(),
            calories: Some("180".into()),
            protein: None,
            carbs: None,
            fats: None,
            timestamp: Utc::now(),
        })
        .await
        .unwrap();
        repo.fail_day("20250203").await;
        let state = AppState::new(repo, MissingDayPolicy::ZeroFill);

        let Json(day) = get_day(State(state), Path(("anna".to_string(), "20250203".to_string())))
            .await
            .unwrap();
        assert!(day.fetch_failed);
        assert!(day.entries.is_empty());
        assert_eq!(day.summary, DailySummary::default());
    }

    #[tokio::test]
    async fn superseded_week_request_is_conflict() {
        let loads = Arc::new(WeekLoads::default());
        let repo = Arc::new(SupersedingRepository {
            loads: Arc::clone(&loads),
            newer: Mutex::new(None),
        });
        let state = AppState {
            repo: repo.clone(),
            week_loads: loads,
            default_policy: MissingDayPolicy::ZeroFill,
        };
        let query = WeekQuery {
            date: Some("2025-02-03".to_string()),
            ..WeekQuery::default()
        };

        let err = get_week(State(state), Path("anna".to_string()), Query(query))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "superseded by a newer week request");

        let newer = repo.newer.lock().unwrap().take().unwrap();
        assert!(!newer.flag().is_cancelled());
    }
}

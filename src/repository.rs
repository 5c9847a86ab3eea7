use crate::models::{FoodData, FoodEntry};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode food data: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("food store unavailable: {0}")]
    Unavailable(String),
}

/// Access to food entries keyed like `users/{client}/foods/{day_key}/entries`.
#[async_trait]
pub trait FoodEntryRepository: Send + Sync {
    async fn fetch_entries_for_day(&self, client_id: &str, day_key: &str) -> Result<Vec<FoodEntry>, FetchError>;

    async fn append_entry(&self, client_id: &str, day_key: &str, entry: FoodEntry) -> Result<(), FetchError>;
}

pub(crate) fn entries_for_day(data: &FoodData, client_id: &str, day_key: &str) -> Vec<FoodEntry> {
    data.users
        .get(client_id)
        .and_then(|user| user.foods.get(day_key))
        .map(|day| day.entries.clone())
        .unwrap_or_default()
}

pub(crate) fn push_entry(data: &mut FoodData, client_id: &str, day_key: &str, entry: FoodEntry) {
    data.users
        .entry(client_id.to_string())
        .or_default()
        .foods
        .entry(day_key.to_string())
        .or_default()
        .entries
        .push(entry);
}

/// In-memory store. Days can be marked as failing to simulate an unreachable backend.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    data: Mutex<FoodData>,
    failing_days: Mutex<HashSet<String>>,
    fetches: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_day(&self, day_key: &str) {
        self.failing_days.lock().await.insert(day_key.to_string());
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FoodEntryRepository for MemoryRepository {
    async fn fetch_entries_for_day(&self, client_id: &str, day_key: &str) -> Result<Vec<FoodEntry>, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if self.failing_days.lock().await.contains(day_key) {
            return Err(FetchError::Unavailable(format!("day {day_key} could not be read")));
        }
        let data = self.data.lock().await;
        Ok(entries_for_day(&data, client_id, day_key))
    }

    async fn append_entry(&self, client_id: &str, day_key: &str, entry: FoodEntry) -> Result<(), FetchError> {
        let mut data = self.data.lock().await;
        push_entry(&mut data, client_id, day_key, entry);
        Ok(())
    }
}

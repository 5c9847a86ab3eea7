use crate::models::{FoodData, FoodEntry};
use crate::repository::{FetchError, FoodEntryRepository, entries_for_day, push_entry};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error};

pub async fn load_data(path: &Path) -> FoodData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse food data file: {err}");
                FoodData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => FoodData::default(),
        Err(err) => {
            error!("failed to read food data file: {err}");
            FoodData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &FoodData) -> Result<(), FetchError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

/// Food entries kept in one JSON document, rewritten on every append.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    data: Mutex<FoodData>,
}

impl JsonFileRepository {
    pub async fn open(path: PathBuf) -> Result<Self, FetchError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let data = load_data(&path).await;
        debug!(path = %path.display(), clients = data.users.len(), "food store loaded");
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FoodEntryRepository for JsonFileRepository {
    async fn fetch_entries_for_day(&self, client_id: &str, day_key: &str) -> Result<Vec<FoodEntry>, FetchError> {
        let data = self.data.lock().await;
        Ok(entries_for_day(&data, client_id, day_key))
    }

    async fn append_entry(&self, client_id: &str, day_key: &str, entry: FoodEntry) -> Result<(), FetchError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        push_entry(&mut next, client_id, day_key, entry);
        persist_data(&self.path, &next).await?;
        *data = next;
        Ok(())
    }
}

use crate::cancel::WeekLoads;
use crate::models::MissingDayPolicy;
use crate::repository::FoodEntryRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn FoodEntryRepository>,
    pub week_loads: Arc<WeekLoads>,
    pub default_policy: MissingDayPolicy,
}

impl AppState {
    pub fn new(repo: Arc<dyn FoodEntryRepository>, default_policy: MissingDayPolicy) -> Self {
        Self {
            repo,
            week_loads: Arc::new(WeekLoads::default()),
            default_policy,
        }
    }
}

pub mod aggregate;
pub mod app;
pub mod calendar;
pub mod cancel;
pub mod chart;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;
pub mod week;

pub use app::router;
pub use config::AppConfig;
pub use repository::{FoodEntryRepository, MemoryRepository};
pub use state::AppState;
pub use storage::JsonFileRepository;
pub use week::{WeekOptions, load_week};

pub mod app;
pub mod config;
pub mod date_range;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod host;
pub mod leaderboard;
pub mod like;
pub mod models;
pub mod prefs;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Settings;
pub use gateway::{AutomationClient, Gateway, Operation};
pub use state::AppState;
pub use storage::load_data;

pub mod app;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod youtube;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::HistoryLog;

pub mod app;
pub mod catalog;
pub mod config;
pub mod deeds;
pub mod demo;
pub mod errors;
pub mod handlers;
pub mod logs;
pub mod models;
pub mod notifications;
pub mod recurrence;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{load_data, persist_data, spawn_writer};
pub use store::{AppStore, Snapshot};

pub mod app;
pub mod checker;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod history;
pub mod history_click;
pub mod metrics;
pub mod models;
pub mod panel;
pub mod state;
pub mod ui;

pub use app::router;
pub use checker::HealthChecker;
pub use config::Config;
pub use state::AppState;

pub mod app;
pub mod error;
pub mod services;
pub mod startup;

pub use app::{AppConfig, AppState, setup_db};
pub use error::{AppError, Result};
pub use services::{AppServices, SettingsService, UsageService};
pub use startup::{AppPaths, ensure_app_data_dir, import_legacy_settings};

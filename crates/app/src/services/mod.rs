mod settings;
mod usage;

use std::sync::Arc;

use chat_db::Db;

use crate::app::AppConfig;
use crate::error::Result;

pub use settings::SettingsService;
pub use usage::UsageService;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub usage: UsageService,
    pub settings: SettingsService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            usage: UsageService::new(shared.clone()),
            settings: SettingsService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}

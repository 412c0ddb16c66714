use chat_core::{Settings, SettingsPatch};
use chat_db::Db;

use crate::error::Result;
use crate::services::{SharedConfig, open_db};

#[derive(Clone)]
pub struct SettingsService {
    config: SharedConfig,
}

impl SettingsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn get(&self) -> Result<Settings> {
        Ok(self.db()?.get_settings()?)
    }

    pub fn update(&self, settings: &Settings) -> Result<()> {
        Ok(self.db()?.update_settings(settings)?)
    }

    /// Changes only the fields set in the patch and returns the result.
    pub fn merge(&self, patch: &SettingsPatch) -> Result<Settings> {
        let mut db = self.db()?;
        Ok(db.merge_settings(patch)?)
    }
}

use std::path::{Path, PathBuf};

use serde::Deserialize;

use chat_core::SettingsPatch;
use chat_db::Db;

use crate::error::Result;

const LEGACY_IMPORT_MARKER: &str = "legacy_import_done";

#[derive(Clone, Debug)]
pub struct AppPaths {
    pub app_data_dir: PathBuf,
    pub db_path: PathBuf,
    pub legacy_settings_path: PathBuf,
}

impl AppPaths {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let db_path = app_data_dir.join("chatai.sqlite");
        let legacy_settings_path = app_data_dir.join("settings.json");
        Self {
            app_data_dir,
            db_path,
            legacy_settings_path,
        }
    }
}

pub fn ensure_app_data_dir(paths: &AppPaths) -> Result<()> {
    std::fs::create_dir_all(&paths.app_data_dir)?;
    Ok(())
}

/// Shape of the legacy flat settings file; only `model` carries over.
#[derive(Deserialize)]
struct LegacySettings {
    model: Option<String>,
}

/// One-time import from the legacy flat settings file and the environment
/// credential. A persisted marker keeps later launches from overwriting
/// manual edits. Returns whether the import ran.
pub fn import_legacy_settings(
    db: &mut Db,
    legacy_file: &Path,
    env_credential: Option<&str>,
) -> Result<bool> {
    if db.get_setting(LEGACY_IMPORT_MARKER)?.is_some() {
        return Ok(false);
    }

    let mut patch = SettingsPatch::default();
    if legacy_file.exists() {
        let contents = std::fs::read_to_string(legacy_file)?;
        let legacy: LegacySettings = serde_json::from_str(&contents)?;
        patch.model_id = legacy.model;
    }
    patch.api_key = env_credential.map(str::to_string);

    if !patch.is_empty() {
        db.merge_settings(&patch)?;
        tracing::info!(
            file = %legacy_file.display(),
            "imported legacy settings"
        );
    }
    db.set_setting(LEGACY_IMPORT_MARKER, "1")?;
    Ok(true)
}

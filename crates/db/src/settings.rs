use chat_core::{Settings, SettingsPatch};
use rusqlite::{Connection, OptionalExtension, params};

use crate::Db;
use crate::error::Result;

impl Db {
    /// Returns the singleton record, or the documented defaults before the
    /// first write.
    pub fn get_settings(&self) -> Result<Settings> {
        Ok(read_settings(&self.conn)?.unwrap_or_default())
    }

    /// Replaces the singleton record wholesale.
    pub fn update_settings(&self, settings: &Settings) -> Result<()> {
        write_settings(&self.conn, settings)
    }

    /// Partial update: reads the current record, overlays the set fields and
    /// writes all three back in one transaction. Returns the merged record.
    pub fn merge_settings(&mut self, patch: &SettingsPatch) -> Result<Settings> {
        let tx = self.conn.transaction()?;
        let merged = read_settings(&tx)?.unwrap_or_default().apply(patch);
        write_settings(&tx, &merged)?;
        tx.commit()?;
        Ok(merged)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_setting WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_setting (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

fn read_settings(conn: &Connection) -> Result<Option<Settings>> {
    conn.query_row(
        "SELECT api_key, endpoint, model_id FROM settings WHERE id = 1",
        [],
        |row| {
            Ok(Settings {
                api_key: row.get(0)?,
                endpoint: row.get(1)?,
                model_id: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

fn write_settings(conn: &Connection, settings: &Settings) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO settings (id, api_key, endpoint, model_id)
        VALUES (1, ?1, ?2, ?3)
        ON CONFLICT(id) DO UPDATE SET
          api_key = excluded.api_key,
          endpoint = excluded.endpoint,
          model_id = excluded.model_id
        "#,
        params![settings.api_key, settings.endpoint, settings.model_id],
    )?;
    Ok(())
}

mod error;
mod migrations;
mod settings;
mod usage;

use std::path::Path;

use rusqlite::Connection;

pub use error::{DbError, Result};

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Explicit teardown. Dropping the handle also closes the connection;
    /// this surfaces the error instead of discarding it.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| DbError::Sqlite(err))
    }
}

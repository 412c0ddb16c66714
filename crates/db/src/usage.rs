use chat_core::{AggregateStats, ModelUsage};
use chrono::{Local, NaiveDate};
use rusqlite::params;

use crate::Db;
use crate::error::Result;

const DAY_FORMAT: &str = "%Y-%m-%d";

impl Db {
    /// Adds one completed call to the (today, model) counters. The whole
    /// read-modify-write is a single conflict-resolving insert, so concurrent
    /// callers on the same connection cannot lose updates.
    pub fn record_usage(&self, input_tokens: u64, output_tokens: u64, model_id: &str) -> Result<()> {
        self.record_usage_on(
            Local::now().date_naive(),
            input_tokens,
            output_tokens,
            model_id,
        )
    }

    pub fn record_usage_on(
        &self,
        day: NaiveDate,
        input_tokens: u64,
        output_tokens: u64,
        model_id: &str,
    ) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO usage_stat (day, model_id, requests, input_tokens, output_tokens)
            VALUES (?1, ?2, 1, ?3, ?4)
            ON CONFLICT(day, model_id) DO UPDATE SET
              requests = requests + 1,
              input_tokens = input_tokens + excluded.input_tokens,
              output_tokens = output_tokens + excluded.output_tokens
            "#,
            params![
                day.format(DAY_FORMAT).to_string(),
                model_id,
                input_tokens as i64,
                output_tokens as i64
            ],
        )?;
        Ok(())
    }

    pub fn period_stats(&self, day: NaiveDate) -> Result<AggregateStats> {
        let day = day.format(DAY_FORMAT).to_string();
        let (requests, input_tokens, output_tokens) = self.conn.query_row(
            r#"
            SELECT
              COALESCE(SUM(requests), 0),
              COALESCE(SUM(input_tokens), 0),
              COALESCE(SUM(output_tokens), 0)
            FROM usage_stat
            WHERE day = ?1
            "#,
            params![day],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )?;

        let mut stats = aggregate(requests, input_tokens, output_tokens);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT model_id, requests, input_tokens, output_tokens
            FROM usage_stat
            WHERE day = ?1
            "#,
        )?;
        let mut rows = stmt.query(params![day])?;
        while let Some(row) = rows.next()? {
            let model_id: String = row.get(0)?;
            stats.models.insert(model_id, row_to_model_usage(row)?);
        }
        Ok(stats)
    }

    pub fn all_time_stats(&self) -> Result<AggregateStats> {
        let (requests, input_tokens, output_tokens) = self.conn.query_row(
            r#"
            SELECT
              COALESCE(SUM(requests), 0),
              COALESCE(SUM(input_tokens), 0),
              COALESCE(SUM(output_tokens), 0)
            FROM usage_stat
            "#,
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )?;

        let mut stats = aggregate(requests, input_tokens, output_tokens);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT model_id,
                   SUM(requests),
                   SUM(input_tokens),
                   SUM(output_tokens)
            FROM usage_stat
            GROUP BY model_id
            "#,
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let model_id: String = row.get(0)?;
            stats.models.insert(model_id, row_to_model_usage(row)?);
        }
        Ok(stats)
    }

    /// Distinct days with at least one recorded call, ascending.
    pub fn recorded_days(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT day FROM usage_stat ORDER BY day ASC")?;
        let days = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut parsed = Vec::with_capacity(days.len());
        for day in days {
            parsed.push(NaiveDate::parse_from_str(&day, DAY_FORMAT)?);
        }
        Ok(parsed)
    }
}

fn aggregate(requests: i64, input_tokens: i64, output_tokens: i64) -> AggregateStats {
    let input_tokens = input_tokens.max(0) as u64;
    let output_tokens = output_tokens.max(0) as u64;
    AggregateStats {
        requests: requests.max(0) as u64,
        input_tokens,
        output_tokens,
        total_tokens: input_tokens + output_tokens,
        ..Default::default()
    }
}

fn row_to_model_usage(row: &rusqlite::Row<'_>) -> std::result::Result<ModelUsage, rusqlite::Error> {
    Ok(ModelUsage {
        requests: row.get::<_, i64>(1)?.max(0) as u64,
        input_tokens: row.get::<_, i64>(2)?.max(0) as u64,
        output_tokens: row.get::<_, i64>(3)?.max(0) as u64,
    })
}

use chat_core::AggregateStats;
use chat_db::Db;
use chrono::{Local, NaiveDate};

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};

/// The Usage Ledger boundary: validates reports, then hands them to storage.
#[derive(Clone)]
pub struct UsageService {
    config: SharedConfig,
}

impl UsageService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Reports one completed call for (today, model). Rejected reports leave
    /// the ledger untouched.
    pub fn record(&self, input_tokens: i64, output_tokens: i64, model_id: &str) -> Result<()> {
        if input_tokens < 0 || output_tokens < 0 {
            return Err(AppError::InvalidInput(
                "token counts must be non-negative".to_string(),
            ));
        }
        if model_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "model id must not be empty".to_string(),
            ));
        }
        let db = self.db()?;
        db.record_usage(input_tokens as u64, output_tokens as u64, model_id)?;
        Ok(())
    }

    pub fn period_stats(&self, day: NaiveDate) -> Result<AggregateStats> {
        Ok(self.db()?.period_stats(day)?)
    }

    pub fn today_stats(&self) -> Result<AggregateStats> {
        self.period_stats(Local::now().date_naive())
    }

    pub fn all_time_stats(&self) -> Result<AggregateStats> {
        Ok(self.db()?.all_time_stats()?)
    }

    pub fn first_recorded_day(&self) -> Result<Option<NaiveDate>> {
        Ok(self.db()?.recorded_days()?.into_iter().next())
    }
}

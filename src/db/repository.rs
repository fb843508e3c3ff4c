use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::{AppSettings, DailyLog, WeeklySummary};
use crate::week;

use super::store::KvStore;

const DAILY_LOGS_KEY: &str = "recap_daily_logs";
const WEEKLY_SUMMARIES_KEY: &str = "recap_weekly_summaries";
const SETTINGS_KEY: &str = "recap_settings";

pub struct Repository {
    store: KvStore,
}

impl Repository {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    async fn read_collection<T: DeserializeOwned>(&self, key: &'static str) -> Result<Vec<T>> {
        match self.store.get(key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_collection<T: Serialize>(&self, key: &'static str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(key, json).await
    }

    // Daily log operations

    /// Insert or replace by id. A replace keeps the original
    /// `created_at` and refreshes `updated_at`; an insert stores the
    /// entry as given.
    pub async fn save_log(&self, log: DailyLog) -> Result<()> {
        let mut logs: Vec<DailyLog> = self.read_collection(DAILY_LOGS_KEY).await?;

        if let Some(existing) = logs.iter_mut().find(|l| l.id == log.id) {
            existing.date = log.date;
            existing.content = log.content;
            existing.updated_at = Utc::now();
        } else {
            logs.push(log);
        }

        self.write_collection(DAILY_LOGS_KEY, &logs).await
    }

    pub async fn get_all_logs(&self) -> Result<Vec<DailyLog>> {
        self.read_collection(DAILY_LOGS_KEY).await
    }

    /// Removing an id that is not stored is a no-op, not an error.
    pub async fn delete_log(&self, id: &str) -> Result<()> {
        let mut logs: Vec<DailyLog> = self.read_collection(DAILY_LOGS_KEY).await?;
        logs.retain(|l| l.id != id);
        self.write_collection(DAILY_LOGS_KEY, &logs).await
    }

    /// Entries whose date falls inside the Monday..Sunday window
    /// containing `anchor`, both ends inclusive, ascending by date.
    pub async fn get_logs_for_week(&self, anchor: NaiveDate) -> Result<Vec<DailyLog>> {
        let start = week::week_start(anchor);
        let end = week::week_end(anchor);

        let mut logs: Vec<DailyLog> = self
            .read_collection::<DailyLog>(DAILY_LOGS_KEY)
            .await?
            .into_iter()
            .filter(|l| l.date >= start && l.date <= end)
            .collect();
        logs.sort_by_key(|l| l.date);
        Ok(logs)
    }

    // Weekly summary operations

    /// Insert or replace by week_start. Summaries have no delete;
    /// regenerating a week overwrites its record.
    pub async fn save_weekly_summary(&self, summary: WeeklySummary) -> Result<()> {
        let mut summaries: Vec<WeeklySummary> =
            self.read_collection(WEEKLY_SUMMARIES_KEY).await?;

        if let Some(existing) = summaries
            .iter_mut()
            .find(|s| s.week_start == summary.week_start)
        {
            *existing = summary;
        } else {
            summaries.push(summary);
        }

        self.write_collection(WEEKLY_SUMMARIES_KEY, &summaries).await
    }

    pub async fn get_weekly_summaries(&self) -> Result<Vec<WeeklySummary>> {
        self.read_collection(WEEKLY_SUMMARIES_KEY).await
    }

    // Settings operations

    pub async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, json).await
    }

    /// Missing settings read as the default (empty key), never an error.
    pub async fn get_settings(&self) -> Result<AppSettings> {
        match self.store.get(SETTINGS_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(AppSettings::default()),
        }
    }
}

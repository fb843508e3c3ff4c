use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::week;

/// Generated prose summary for one Monday..Sunday window.
/// `week_start` acts as the primary key; at most one record per week.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

impl WeeklySummary {
    /// Build a record for the week containing `anchor`.
    pub fn for_week(anchor: NaiveDate, summary: String) -> Self {
        Self {
            week_start: week::week_start(anchor),
            week_end: week::week_end(anchor),
            summary,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryStatus {
    #[default]
    NotGenerated,
    Generating,
    Generated,
    Failed,
    NoApiKey,
}

mod log;
mod settings;
mod summary;

pub use log::DailyLog;
pub use settings::AppSettings;
pub use summary::{SummaryStatus, WeeklySummary};

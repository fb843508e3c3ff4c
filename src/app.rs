use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use tokio::sync::mpsc;

use crate::ai::{generate_weekly_summary, OpenAiClient};
use crate::config::Config;
use crate::db::{KvStore, Repository};
use crate::error::{AppError, Result};
use crate::models::{AppSettings, DailyLog, SummaryStatus, WeeklySummary};
use crate::tui::{AppAction, View};
use crate::week;

// Message for completed generation
pub struct SummaryResult {
    pub week_start: NaiveDate,
    pub result: Result<String>,
}

pub struct App {
    // Data
    pub logs: Vec<DailyLog>,
    pub summaries: Vec<WeeklySummary>,
    pub settings: AppSettings,

    // UI state
    pub view: View,
    pub show_help: bool,
    pub selected_index: usize,
    pub log_date: NaiveDate,
    pub log_input: String,
    pub log_notice: Option<String>,
    editing_id: Option<String>,
    pub key_input: String,
    pub settings_notice: Option<String>,
    pub week_anchor: NaiveDate,
    pub summary_status: SummaryStatus,
    pub summary_error: Option<String>,

    // Async state
    pending_week: Option<NaiveDate>,
    summary_rx: mpsc::Receiver<SummaryResult>,
    summary_tx: mpsc::Sender<SummaryResult>,

    // Services
    pub repository: Repository,
    provider: Arc<OpenAiClient>,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let store = KvStore::open(&config.db_path).await?;
        let repository = Repository::new(store);
        let provider = Arc::new(OpenAiClient::new(config));

        let logs = repository.get_all_logs().await?;
        let summaries = repository.get_weekly_summaries().await?;
        let settings = repository.get_settings().await?;

        let today = Local::now().date_naive();
        let (summary_tx, summary_rx) = mpsc::channel(1);

        let mut app = Self {
            logs,
            summaries,
            key_input: settings.openai_api_key.clone(),
            settings,
            view: View::default(),
            show_help: false,
            selected_index: 0,
            log_date: today,
            log_input: String::new(),
            log_notice: None,
            editing_id: None,
            settings_notice: None,
            week_anchor: today,
            summary_status: SummaryStatus::NotGenerated,
            summary_error: None,
            pending_week: None,
            summary_rx,
            summary_tx,
            repository,
            provider,
        };
        app.load_entry_for_date();
        app.refresh_summary_status();
        Ok(app)
    }

    /// All entries, newest first, for the Entries view.
    pub fn entries_sorted(&self) -> Vec<&DailyLog> {
        let mut entries: Vec<&DailyLog> = self.logs.iter().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.updated_at.cmp(&a.updated_at)));
        entries
    }

    pub fn selected_entry(&self) -> Option<&DailyLog> {
        self.entries_sorted().get(self.selected_index).copied()
    }

    /// Logs inside the currently selected week, ascending by date.
    pub fn week_logs(&self) -> Vec<&DailyLog> {
        let start = week::week_start(self.week_anchor);
        let end = week::week_end(self.week_anchor);
        let mut logs: Vec<&DailyLog> = self
            .logs
            .iter()
            .filter(|l| l.date >= start && l.date <= end)
            .collect();
        logs.sort_by_key(|l| l.date);
        logs
    }

    /// Cached summary record for the selected week, if one exists.
    pub fn current_summary(&self) -> Option<&WeeklySummary> {
        let start = week::week_start(self.week_anchor);
        self.summaries.iter().find(|s| s.week_start == start)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextView => {
                self.view = self.view.cycle();
                if self.view == View::Summary {
                    self.refresh_summary_status();
                }
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.logs.len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::EditEntry => {
                if let Some(entry) = self.selected_entry() {
                    let (date, content, id) = (entry.date, entry.content.clone(), entry.id.clone());
                    self.log_date = date;
                    self.log_input = content;
                    self.editing_id = Some(id);
                    self.log_notice = None;
                    self.view = View::Log;
                }
            }

            AppAction::DeleteEntry => {
                if let Some(entry) = self.selected_entry() {
                    let id = entry.id.clone();
                    self.repository.delete_log(&id).await?;
                    self.reload_logs().await?;
                    if self.editing_id.as_deref() == Some(&id) {
                        self.editing_id = None;
                        self.log_input.clear();
                    }
                    let len = self.logs.len();
                    if len > 0 && self.selected_index >= len {
                        self.selected_index = len - 1;
                    }
                }
            }

            AppAction::LogInputChar(c) => {
                self.log_input.push(c);
                self.log_notice = None;
            }

            AppAction::LogInputBackspace => {
                self.log_input.pop();
            }

            AppAction::LogInputClear => {
                self.log_input.clear();
                self.log_notice = None;
            }

            AppAction::LogDatePrev => {
                self.log_date = self.log_date - Days::new(1);
                self.load_entry_for_date();
            }

            AppAction::LogDateNext => {
                self.log_date = self.log_date + Days::new(1);
                self.load_entry_for_date();
            }

            AppAction::SaveLog => {
                self.save_log().await?;
            }

            AppAction::PrevWeek => {
                self.week_anchor = self.week_anchor - Days::new(7);
                self.refresh_summary_status();
            }

            AppAction::NextWeek => {
                self.week_anchor = self.week_anchor + Days::new(7);
                self.refresh_summary_status();
            }

            AppAction::GenerateSummary => {
                self.generate_summary().await?;
            }

            AppAction::KeyInputChar(c) => {
                self.key_input.push(c);
                self.settings_notice = None;
            }

            AppAction::KeyInputBackspace => {
                self.key_input.pop();
            }

            AppAction::KeyInputClear => {
                self.key_input.clear();
            }

            AppAction::SaveSettings => {
                self.settings = AppSettings {
                    openai_api_key: self.key_input.trim().to_string(),
                };
                self.repository.save_settings(&self.settings).await?;
                self.settings_notice = Some("Settings saved".to_string());
            }
        }

        Ok(false)
    }

    /// Prefill the Log view with the stored entry for the selected
    /// date, so saving updates in place instead of duplicating the day.
    fn load_entry_for_date(&mut self) {
        let existing = self
            .logs
            .iter()
            .filter(|l| l.date == self.log_date)
            .max_by_key(|l| l.updated_at);

        match existing {
            Some(entry) => {
                self.log_input = entry.content.clone();
                self.editing_id = Some(entry.id.clone());
            }
            None => {
                self.log_input.clear();
                self.editing_id = None;
            }
        }
        self.log_notice = None;
    }

    async fn save_log(&mut self) -> Result<()> {
        let content = self.log_input.trim().to_string();
        if content.is_empty() {
            self.log_notice = Some("Nothing to save".to_string());
            return Ok(());
        }

        let mut log = DailyLog::new(self.log_date, content);
        if let Some(id) = &self.editing_id {
            log.id = id.clone();
        }
        let id = log.id.clone();

        self.repository.save_log(log).await?;
        self.reload_logs().await?;
        self.editing_id = Some(id);
        self.log_notice = Some(format!("Saved entry for {}", week::date_key(self.log_date)));
        Ok(())
    }

    /// Recompute the Summary view status for the selected week.
    fn refresh_summary_status(&mut self) {
        let start = week::week_start(self.week_anchor);
        self.summary_status = if self.pending_week == Some(start) {
            SummaryStatus::Generating
        } else if self.current_summary().is_some() {
            SummaryStatus::Generated
        } else {
            SummaryStatus::NotGenerated
        };
        self.summary_error = None;
    }

    async fn generate_summary(&mut self) -> Result<()> {
        // One generation at a time
        if self.pending_week.is_some() {
            return Ok(());
        }

        let week_start = week::week_start(self.week_anchor);
        let logs = self.repository.get_logs_for_week(self.week_anchor).await?;
        let api_key = self.settings.openai_api_key.clone();

        self.summary_status = SummaryStatus::Generating;
        self.summary_error = None;
        self.pending_week = Some(week_start);

        let provider = Arc::clone(&self.provider);
        let tx = self.summary_tx.clone();

        tokio::spawn(async move {
            let result = generate_weekly_summary(&logs, &api_key, provider.as_ref()).await;
            let _ = tx.send(SummaryResult { week_start, result }).await;
        });

        Ok(())
    }

    /// Poll for completed generations (non-blocking). On success the
    /// record is persisted here; generation and persistence are
    /// separate steps.
    pub async fn poll_summary_result(&mut self) -> Result<()> {
        if let Ok(completed) = self.summary_rx.try_recv() {
            if self.pending_week == Some(completed.week_start) {
                self.pending_week = None;

                match completed.result {
                    Ok(summary) => {
                        let record = WeeklySummary::for_week(completed.week_start, summary);
                        self.repository.save_weekly_summary(record).await?;
                        self.summaries = self.repository.get_weekly_summaries().await?;
                        self.refresh_summary_status();
                    }
                    Err(AppError::MissingApiKey) => {
                        self.summary_status = SummaryStatus::NoApiKey;
                    }
                    Err(e) => {
                        tracing::error!("Failed to generate summary: {}", e);
                        self.summary_status = SummaryStatus::Failed;
                        self.summary_error = Some(e.to_string());
                    }
                }
            }
        }
        Ok(())
    }

    async fn reload_logs(&mut self) -> Result<()> {
        self.logs = self.repository.get_all_logs().await?;
        Ok(())
    }
}

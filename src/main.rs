use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod ai;
mod app;
mod config;
mod db;
mod error;
mod models;
mod tui;
mod week;

use ai::{generate_weekly_summary, OpenAiClient};
use app::App;
use config::Config;
use db::{KvStore, Repository};
use error::Result;
use models::{DailyLog, WeeklySummary};
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    // Check for --log flag (headless entry for today)
    if args.len() >= 2 && args[1] == "--log" {
        if args.len() < 3 {
            return Err(anyhow::anyhow!("Usage: recap --log <text>").into());
        }
        let content = args[2..].join(" ");
        headless_log(&config, content).await?;
        return Ok(());
    }

    // Check for --summarize flag (headless generation for a week)
    if args.len() >= 2 && args[1] == "--summarize" {
        let anchor = match args.get(2) {
            Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")?,
            None => Local::now().date_naive(),
        };
        headless_summarize(&config, anchor).await?;
        return Ok(());
    }

    if args.len() >= 2 && args[1].starts_with("--") {
        return Err(anyhow::anyhow!("Unknown flag: {}", args[1]).into());
    }

    // Initialize app
    let mut app = App::new(&config).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Poll for completed summary generations
        app.poll_summary_result().await?;

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.view, app.show_help) {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// `recap --log <text>`: upsert today's entry and exit.
async fn headless_log(config: &Config, content: String) -> Result<()> {
    let repository = Repository::new(KvStore::open(&config.db_path).await?);
    let today = Local::now().date_naive();

    let existing_id = repository
        .get_all_logs()
        .await?
        .into_iter()
        .filter(|l| l.date == today)
        .max_by_key(|l| l.updated_at)
        .map(|l| l.id);

    let mut log = DailyLog::new(today, content.trim().to_string());
    let updated = existing_id.is_some();
    if let Some(id) = existing_id {
        log.id = id;
    }
    repository.save_log(log).await?;

    let verb = if updated { "Updated" } else { "Logged" };
    println!("{} entry for {}", verb, week::date_key(today));
    Ok(())
}

/// `recap --summarize [date]`: generate, persist, and print the
/// summary for the week containing the date.
async fn headless_summarize(config: &Config, anchor: NaiveDate) -> Result<()> {
    let repository = Repository::new(KvStore::open(&config.db_path).await?);
    let provider = OpenAiClient::new(config);

    let logs = repository.get_logs_for_week(anchor).await?;
    let settings = repository.get_settings().await?;

    let summary = generate_weekly_summary(&logs, &settings.openai_api_key, &provider).await?;

    let record = WeeklySummary::for_week(anchor, summary.clone());
    println!(
        "Week {} .. {}\n\n{}",
        week::date_key(record.week_start),
        week::date_key(record.week_end),
        summary
    );
    repository.save_weekly_summary(record).await?;

    Ok(())
}

use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::SummaryStatus;
use crate::week;

use super::handler::View;

const VIEWS: [View; 4] = [View::Log, View::Entries, View::Summary, View::Settings];

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Active view
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match app.view {
        View::Log => render_log_view(frame, app, chunks[1]),
        View::Entries => render_entries_view(frame, app, chunks[1]),
        View::Summary => render_summary_view(frame, app, chunks[1]),
        View::Settings => render_settings_view(frame, app, chunks[1]),
    }

    render_status_line(frame, app, chunks[2]);

    if app.show_help {
        render_help(frame);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = VIEWS.iter().map(|v| Line::from(v.title())).collect();
    let selected = VIEWS.iter().position(|v| *v == app.view).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .title(" Weekly Recap ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_log_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Date selector
            Constraint::Min(0),    // Content input
        ])
        .split(area);

    let date_label = format!(
        " {} ({}) ",
        week::date_key(app.log_date),
        app.log_date.weekday()
    );
    let date_block = Block::default()
        .title(" Date  ←/→ to change ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let date_inner = date_block.inner(chunks[0]);
    frame.render_widget(date_block, chunks[0]);
    frame.render_widget(
        Paragraph::new(date_label).style(Style::default().fg(Color::White)),
        date_inner,
    );

    let input_block = Block::default()
        .title(" What did you work on? ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let input_text = format!("{}_", app.log_input);
    let paragraph = Paragraph::new(input_text)
        .block(input_block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, chunks[1]);
}

fn render_entries_view(frame: &mut Frame, app: &App, area: Rect) {
    let entries = app.entries_sorted();

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{}  ", week::date_key(entry.date)),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(&entry.content, Style::default().fg(Color::White)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let title = format!(" Entries ({}) ", entries.len());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_summary_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3), // Week's logs
            Constraint::Ratio(2, 3), // Summary text
        ])
        .split(area);

    let week_logs = app.week_logs();
    let items: Vec<ListItem> = week_logs
        .iter()
        .map(|log| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{}  ", week::date_key(log.date)),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(&log.content, Style::default().fg(Color::White)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let week_title = format!(
        " Week {} .. {} ",
        week::date_key(week::week_start(app.week_anchor)),
        week::date_key(week::week_end(app.week_anchor)),
    );
    let list = List::new(items).block(
        Block::default()
            .title(week_title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(list, chunks[0]);

    let content = match app.summary_status {
        SummaryStatus::NotGenerated => {
            if app.week_logs().is_empty() {
                "No logs for this week.\n\nAdd entries in the Daily Log view first.".to_string()
            } else {
                "Press Enter to generate a summary for this week...".to_string()
            }
        }
        SummaryStatus::Generating => "Generating summary...".to_string(),
        SummaryStatus::Failed => format!(
            "Failed to generate summary. Press 'g' to retry.\n\n{}",
            app.summary_error.as_deref().unwrap_or("Unknown error")
        ),
        SummaryStatus::NoApiKey => {
            "OpenAI API key not configured.\n\nAdd it in the Settings tab first.".to_string()
        }
        SummaryStatus::Generated => app
            .current_summary()
            .map(|s| {
                format!(
                    "{}\n\nGenerated {}",
                    s.summary,
                    s.generated_at.format("%Y-%m-%d %H:%M UTC")
                )
            })
            .unwrap_or_else(|| "No summary available".to_string()),
    };

    let block = Block::default()
        .title(" Summary ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[1]);
}

fn render_settings_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let display = mask_key(&app.key_input);

    let block = Block::default()
        .title(" OpenAI API key  (type to edit, Enter to save) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);
    frame.render_widget(
        Paragraph::new(format!("> {display}_")).style(Style::default().fg(Color::White)),
        inner,
    );

    let info = "The key is stored locally and sent only to api.openai.com\n\
                with each generation request.";
    frame.render_widget(
        Paragraph::new(info).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

/// Mask the middle of the key, keeping the tail for recognition.
/// Counts chars, not bytes; the key is arbitrary typed input.
fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "<empty>".to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return key.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.view {
        View::Log => app
            .log_notice
            .as_deref()
            .unwrap_or("type to edit  Enter:save  Esc:clear  ←/→:date  Tab:next view")
            .to_string(),
        View::Entries => {
            "j/k:nav  Enter:edit  d:delete  Tab:next view  ?:help  q:quit".to_string()
        }
        View::Summary => {
            "←/→:week  Enter/g:generate  Tab:next view  ?:help  q:quit".to_string()
        }
        View::Settings => app
            .settings_notice
            .clone()
            .unwrap_or_else(|| "type to edit  Enter:save  Tab:next view".to_string()),
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Views (Tab to cycle):",
        "   Daily Log       write the note for a day",
        "   Entries         browse, edit, delete entries",
        "   Weekly Summary  generate the week's report",
        "   Settings        OpenAI API key",
        "",
        " Entries:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   Enter    Edit entry",
        "   d        Delete entry",
        "",
        " Weekly Summary:",
        "   ← / p    Previous week",
        "   → / n    Next week",
        "   Enter/g  Generate summary",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit (Ctrl+C while typing)",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_mask_handles_multibyte_characters() {
        // 9 chars, 17 bytes; byte offsets 6 and len-4 fall inside chars
        assert_eq!(mask_key("aключключ"), "aключк...ключ");
    }

    #[test]
    fn key_mask_keeps_short_keys_and_flags_empty_ones() {
        assert_eq!(mask_key(""), "<empty>");
        assert_eq!(mask_key("sk-test"), "sk-test");
        assert_eq!(mask_key("sk-abcdef12345"), "sk-abc...2345");
    }
}

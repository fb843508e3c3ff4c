use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The four screens, cycled with Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Log,
    Entries,
    Summary,
    Settings,
}

impl View {
    pub fn cycle(self) -> Self {
        match self {
            View::Log => View::Entries,
            View::Entries => View::Summary,
            View::Summary => View::Settings,
            View::Settings => View::Log,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Log => "Daily Log",
            View::Entries => "Entries",
            View::Summary => "Weekly Summary",
            View::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    NextView,
    ShowHelp,
    HideHelp,
    // Entries view
    MoveUp,
    MoveDown,
    EditEntry,
    DeleteEntry,
    // Log view (always in input mode)
    LogInputChar(char),
    LogInputBackspace,
    LogInputClear,
    LogDatePrev,
    LogDateNext,
    SaveLog,
    // Summary view
    PrevWeek,
    NextWeek,
    GenerateSummary,
    // Settings view (always in input mode)
    KeyInputChar(char),
    KeyInputBackspace,
    KeyInputClear,
    SaveSettings,
}

pub fn handle_key_event(key: KeyEvent, view: View, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Ctrl+C quits from anywhere, including input views
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    if key.code == KeyCode::Tab {
        return Some(AppAction::NextView);
    }

    match view {
        // Text-entry views: printable keys go into the buffer
        View::Log => match key.code {
            KeyCode::Enter => Some(AppAction::SaveLog),
            KeyCode::Esc => Some(AppAction::LogInputClear),
            KeyCode::Backspace => Some(AppAction::LogInputBackspace),
            KeyCode::Left => Some(AppAction::LogDatePrev),
            KeyCode::Right => Some(AppAction::LogDateNext),
            KeyCode::Char(c) => Some(AppAction::LogInputChar(c)),
            _ => None,
        },

        View::Settings => match key.code {
            KeyCode::Enter => Some(AppAction::SaveSettings),
            KeyCode::Esc => Some(AppAction::KeyInputClear),
            KeyCode::Backspace => Some(AppAction::KeyInputBackspace),
            KeyCode::Char(c) => Some(AppAction::KeyInputChar(c)),
            _ => None,
        },

        View::Entries => match key.code {
            KeyCode::Char('q') => Some(AppAction::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),
            KeyCode::Enter => Some(AppAction::EditEntry),
            KeyCode::Char('d') => Some(AppAction::DeleteEntry),
            KeyCode::Char('?') => Some(AppAction::ShowHelp),
            _ => None,
        },

        View::Summary => match key.code {
            KeyCode::Char('q') => Some(AppAction::Quit),
            KeyCode::Char('p') | KeyCode::Left => Some(AppAction::PrevWeek),
            KeyCode::Char('n') | KeyCode::Right => Some(AppAction::NextWeek),
            KeyCode::Char('g') | KeyCode::Enter => Some(AppAction::GenerateSummary),
            KeyCode::Char('?') => Some(AppAction::ShowHelp),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_q_in_log_view_is_input_not_quit() {
        let action = handle_key_event(key(KeyCode::Char('q')), View::Log, false);
        assert!(matches!(action, Some(AppAction::LogInputChar('q'))));
    }

    #[test]
    fn ctrl_c_quits_even_while_typing() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(
            handle_key_event(event, View::Log, false),
            Some(AppAction::Quit)
        ));
    }

    #[test]
    fn any_key_closes_help() {
        let action = handle_key_event(key(KeyCode::Char('x')), View::Entries, true);
        assert!(matches!(action, Some(AppAction::HideHelp)));
    }

    #[test]
    fn tab_cycles_through_all_views() {
        let mut view = View::Log;
        for _ in 0..4 {
            view = view.cycle();
        }
        assert_eq!(view, View::Log);
    }
}

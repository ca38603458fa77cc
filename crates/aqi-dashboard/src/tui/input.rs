//! Keyboard input handling for the TUI.
//!
//! Key presses are translated into [`Action`]s, which are then applied to
//! the application state. Actions that need the backend produce a
//! [`Command`] for the worker.
//!
//! # Key Bindings
//!
//! | Key               | Action                     |
//! |-------------------|----------------------------|
//! | `q`               | Quit                       |
//! | `r`               | Randomize accent color     |
//! | `0`-`9`           | Select accent color        |
//! | `p`               | Enter a manual prediction  |
//! | `h`               | Check backend health       |
//! | `u`               | Fetch raw sensor history   |
//! | `Tab` / `→`       | Next tab                   |
//! | `BackTab` / `←`   | Previous tab               |
//! | `?`               | Toggle help                |
//! | `Esc`             | Close help / dismiss banner|

use std::time::Instant;

use aqi_core::{Command, PaletteColor};
use crossterm::event::KeyCode;

use super::app::App;

/// User actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start the color randomizer.
    Randomize,
    /// Select the palette entry at this index.
    SelectColor(usize),
    /// Open the manual prediction prompt.
    StartPrediction,
    /// Query backend health.
    CheckHealth,
    /// Fetch raw sensor history now.
    RefreshRawHistory,
    /// Switch to the next tab.
    NextTab,
    /// Switch to the previous tab.
    PreviousTab,
    /// Toggle the help overlay.
    ToggleHelp,
    /// Close the help overlay or dismiss the error banner.
    Dismiss,
    /// Input character for text input.
    TextInput(char),
    /// Backspace for text input.
    TextBackspace,
    /// Submit text input.
    TextSubmit,
    /// Cancel text input.
    TextCancel,
    /// No action.
    None,
}

/// Map a key press to an action.
///
/// While the prediction prompt is open every key goes to the prompt.
pub fn handle_key(key: KeyCode, editing_text: bool) -> Action {
    if editing_text {
        return match key {
            KeyCode::Enter => Action::TextSubmit,
            KeyCode::Esc => Action::TextCancel,
            KeyCode::Backspace => Action::TextBackspace,
            KeyCode::Char(c) => Action::TextInput(c),
            _ => Action::None,
        };
    }

    match key {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') => Action::Randomize,
        KeyCode::Char(c @ '0'..='9') => Action::SelectColor(c as usize - '0' as usize),
        KeyCode::Char('p') => Action::StartPrediction,
        KeyCode::Char('h') => Action::CheckHealth,
        KeyCode::Char('u') => Action::RefreshRawHistory,
        KeyCode::Tab | KeyCode::Right => Action::NextTab,
        KeyCode::BackTab | KeyCode::Left => Action::PreviousTab,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::Dismiss,
        _ => Action::None,
    }
}

/// Apply an action to the application state.
///
/// Returns `Some(Command)` if the action needs the background worker,
/// `None` if it was handled entirely within the UI.
pub fn apply_action(app: &mut App, action: Action) -> Option<Command> {
    match action {
        Action::Quit => {
            app.should_quit = true;
            None
        }
        Action::Randomize => {
            if !app.picker.spin(Instant::now()) {
                app.push_status_message("Already spinning".to_string());
            }
            None
        }
        Action::SelectColor(index) => {
            if let Some(color) = PaletteColor::from_index(index) {
                match app.picker.select(color) {
                    Ok(()) => app.push_status_message(format!("Accent color: {}", color.name())),
                    Err(e) => app.push_status_message(e.to_string()),
                }
            }
            None
        }
        Action::StartPrediction => {
            if app.predicting {
                app.push_status_message("Prediction already in progress".to_string());
            } else {
                app.start_prediction_input();
            }
            None
        }
        Action::CheckHealth => {
            app.push_status_message("Checking backend health...".to_string());
            Some(Command::CheckHealth)
        }
        Action::RefreshRawHistory => {
            app.push_status_message("Fetching raw sensor history...".to_string());
            Some(Command::RefreshRawHistory)
        }
        Action::NextTab => {
            app.active_tab = app.active_tab.next();
            None
        }
        Action::PreviousTab => {
            app.active_tab = app.active_tab.previous();
            None
        }
        Action::ToggleHelp => {
            app.show_help = !app.show_help;
            None
        }
        Action::Dismiss => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.banner = None;
            }
            None
        }
        Action::TextInput(c) => {
            app.prediction_input_char(c);
            None
        }
        Action::TextBackspace => {
            app.prediction_input_backspace();
            None
        }
        Action::TextSubmit => app.submit_prediction_input(),
        Action::TextCancel => {
            app.cancel_prediction_input();
            None
        }
        Action::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Tab;
    use tokio::sync::mpsc;

    fn app() -> App {
        let (cmd_tx, _cmd_rx) = mpsc::channel(8);
        let (_event_tx, event_rx) = mpsc::channel(8);
        App::new(cmd_tx, event_rx, "http://localhost:5000")
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(handle_key(KeyCode::Char('q'), false), Action::Quit);
        assert_eq!(handle_key(KeyCode::Char('r'), false), Action::Randomize);
        assert_eq!(handle_key(KeyCode::Char('0'), false), Action::SelectColor(0));
        assert_eq!(handle_key(KeyCode::Char('9'), false), Action::SelectColor(9));
        assert_eq!(handle_key(KeyCode::Tab, false), Action::NextTab);
        assert_eq!(handle_key(KeyCode::Char('x'), false), Action::None);
    }

    #[test]
    fn test_text_mode_captures_keys() {
        assert_eq!(handle_key(KeyCode::Char('q'), true), Action::TextInput('q'));
        assert_eq!(handle_key(KeyCode::Enter, true), Action::TextSubmit);
        assert_eq!(handle_key(KeyCode::Esc, true), Action::TextCancel);
        assert_eq!(handle_key(KeyCode::Tab, true), Action::None);
    }

    #[test]
    fn test_select_color_when_idle() {
        let mut app = app();
        assert_eq!(apply_action(&mut app, Action::SelectColor(4)), None);
        assert_eq!(app.picker.selected().name(), "Red");
    }

    #[test]
    fn test_select_color_rejected_while_spinning() {
        let mut app = app();
        apply_action(&mut app, Action::Randomize);
        assert!(app.picker.is_spinning());

        let before = app.picker.selected();
        apply_action(&mut app, Action::SelectColor(7));
        assert_eq!(app.picker.selected(), before);
        assert_eq!(
            app.current_status_message(),
            Some("Color selection is locked while the randomizer is spinning")
        );
    }

    #[test]
    fn test_second_randomize_is_noop() {
        let mut app = app();
        apply_action(&mut app, Action::Randomize);
        apply_action(&mut app, Action::Randomize);
        assert!(app.picker.is_spinning());
        assert_eq!(app.current_status_message(), Some("Already spinning"));
    }

    #[test]
    fn test_prediction_flow() {
        let mut app = app();
        apply_action(&mut app, Action::StartPrediction);
        assert!(app.editing_prediction);
        for c in "150".chars() {
            apply_action(&mut app, Action::TextInput(c));
        }
        let cmd = apply_action(&mut app, Action::TextSubmit);
        assert_eq!(cmd, Some(Command::Predict { aqi: 150.0 }));

        apply_action(&mut app, Action::StartPrediction);
        assert!(!app.editing_prediction);
    }

    #[test]
    fn test_backend_actions_produce_commands() {
        let mut app = app();
        assert_eq!(
            apply_action(&mut app, Action::CheckHealth),
            Some(Command::CheckHealth)
        );
        assert_eq!(
            apply_action(&mut app, Action::RefreshRawHistory),
            Some(Command::RefreshRawHistory)
        );
    }

    #[test]
    fn test_tabs_and_dismiss() {
        let mut app = app();
        apply_action(&mut app, Action::PreviousTab);
        assert_eq!(app.active_tab, Tab::Raw);

        app.banner = Some("down".to_string());
        apply_action(&mut app, Action::ToggleHelp);
        apply_action(&mut app, Action::Dismiss);
        assert!(!app.show_help);
        assert!(app.banner.is_some());
        apply_action(&mut app, Action::Dismiss);
        assert!(app.banner.is_none());
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        apply_action(&mut app, Action::Quit);
        assert!(app.should_quit());
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Cancel,
    NextField,
    Submit,
    Backspace,
    Up,
    Down,
    Input(char),
    None,
}

/// Maps a terminal key event to an app action.
///
/// `editing` is true while a text field or editor mode captures characters;
/// plain `q` then types instead of quitting. Ctrl+C always quits.
pub fn map_key(key: KeyEvent, editing: bool) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && let KeyCode::Char('c') = key.code
    {
        return AppAction::Quit;
    }

    match key.code {
        KeyCode::Char('q') if !editing => AppAction::Quit,
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab => AppAction::NextField,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_only_outside_editors() {
        assert_eq!(map_key(key(KeyCode::Char('q')), false), AppAction::Quit);
        assert_eq!(
            map_key(key(KeyCode::Char('q')), true),
            AppAction::Input('q')
        );
    }

    #[test]
    fn ctrl_c_quits_even_while_editing() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(event, true), AppAction::Quit);
    }
}

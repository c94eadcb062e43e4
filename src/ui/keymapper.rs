//! Key mapping for console input
//!
//! Classifies crossterm key events into console actions. Anything the
//! console does not claim is passed through to the input field's default
//! editing.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::{ControlChar, Direction};

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// What a key event means to the console
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Submit the current input line
    Submit,
    /// Walk the command history
    HistoryBrowse(Direction),
    /// Ask the handler for a completion
    SuggestionRequest,
    /// Invalid edit, alert only
    Bell,
    /// One of the recognized Ctrl characters
    Control(ControlChar),
    /// Not ours; default editing applies
    PassThrough,
    /// Not a keystroke (key release)
    Ignore,
}

/// Key interpreter for the console prompt
pub struct KeyInterpreter;

impl KeyInterpreter {
    /// Classify a key event.
    ///
    /// `input_is_empty` tells whether the input field currently holds text,
    /// which decides whether Backspace is an edit or an alert.
    pub fn classify(event: &KeyEvent, input_is_empty: bool) -> KeyAction {
        if event.kind == KeyEventKind::Release {
            return KeyAction::Ignore;
        }
        let mods = Modifiers::from(event.modifiers);

        match event.code {
            KeyCode::Enter => KeyAction::Submit,
            KeyCode::Up => KeyAction::HistoryBrowse(Direction::Up),
            KeyCode::Down => KeyAction::HistoryBrowse(Direction::Down),
            KeyCode::Tab => KeyAction::SuggestionRequest,
            KeyCode::Backspace if input_is_empty => KeyAction::Bell,
            KeyCode::Char(ch) if mods.contains(Modifiers::CTRL) => ControlChar::from_key(ch)
                .map(KeyAction::Control)
                .unwrap_or(KeyAction::PassThrough),
            _ => KeyAction::PassThrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_enter_ignores_modifiers() {
        for mods in [KeyModifiers::NONE, KeyModifiers::SHIFT, KeyModifiers::CONTROL] {
            let event = key_event(KeyCode::Enter, mods);
            assert_eq!(KeyInterpreter::classify(&event, true), KeyAction::Submit);
        }
    }

    #[test]
    fn test_arrow_keys() {
        let event = key_event(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(
            KeyInterpreter::classify(&event, false),
            KeyAction::HistoryBrowse(Direction::Up)
        );
        let event = key_event(KeyCode::Down, KeyModifiers::ALT);
        assert_eq!(
            KeyInterpreter::classify(&event, false),
            KeyAction::HistoryBrowse(Direction::Down)
        );
        let event = key_event(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(KeyInterpreter::classify(&event, false), KeyAction::PassThrough);
    }

    #[test]
    fn test_backspace_depends_on_input() {
        let event = key_event(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(KeyInterpreter::classify(&event, true), KeyAction::Bell);
        assert_eq!(KeyInterpreter::classify(&event, false), KeyAction::PassThrough);
    }

    #[test]
    fn test_ctrl_keys() {
        let event = key_event(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(
            KeyInterpreter::classify(&event, false),
            KeyAction::Control(ControlChar::FormFeed)
        );
        let event = key_event(KeyCode::Char('J'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(
            KeyInterpreter::classify(&event, false),
            KeyAction::Control(ControlChar::LineFeed)
        );
        // Ctrl+C is not one of ours
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyInterpreter::classify(&event, false), KeyAction::PassThrough);
        // Without Ctrl, 'l' is just text
        let event = key_event(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(KeyInterpreter::classify(&event, false), KeyAction::PassThrough);
    }

    #[test]
    fn test_tab_requests_suggestion() {
        let event = key_event(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(KeyInterpreter::classify(&event, true), KeyAction::SuggestionRequest);
    }

    #[test]
    fn test_release_is_ignored() {
        let event = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(KeyInterpreter::classify(&event, false), KeyAction::Ignore);
    }

    #[test]
    fn test_modifiers_from_crossterm() {
        let mods = Modifiers::from(KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
    }
}

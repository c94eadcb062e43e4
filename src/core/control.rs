//! Control characters recognized at the prompt.
//!
//! Only eight Ctrl combinations mean anything to the console. Several of
//! them are deliberately left as stubs that ring the bell: the console is
//! line-oriented and has no VT100 editing model.

/// A recognized control character, named after its ASCII meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlChar {
    /// Ctrl+G
    Bell,
    /// Ctrl+H
    Backspace,
    /// Ctrl+I
    Tab,
    /// Ctrl+J
    LineFeed,
    /// Ctrl+L
    FormFeed,
    /// Ctrl+M
    CarriageReturn,
    /// Ctrl+[
    Escape,
    /// Ctrl+?
    Delete,
}

/// What the console does for a control character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlAction {
    /// Alert only, no state change
    Bell,
    /// Submit the current input
    Submit,
    /// Scroll to end and enforce the buffer cap
    FormFeed,
    /// Append the tab expansion to the input
    InsertTab,
}

impl ControlChar {
    /// All recognized control characters, in lookup order.
    pub const ALL: [ControlChar; 8] = [
        ControlChar::Bell,
        ControlChar::Backspace,
        ControlChar::Tab,
        ControlChar::LineFeed,
        ControlChar::FormFeed,
        ControlChar::CarriageReturn,
        ControlChar::Escape,
        ControlChar::Delete,
    ];

    /// The key that is held together with Ctrl to produce this character.
    pub const fn key(self) -> char {
        match self {
            ControlChar::Bell => 'G',
            ControlChar::Backspace => 'H',
            ControlChar::Tab => 'I',
            ControlChar::LineFeed => 'J',
            ControlChar::FormFeed => 'L',
            ControlChar::CarriageReturn => 'M',
            ControlChar::Escape => '[',
            ControlChar::Delete => '?',
        }
    }

    /// Look up the control character for a key pressed with Ctrl.
    ///
    /// Letters match case-insensitively since terminals report Ctrl+G as
    /// either `g` or `G`.
    pub fn from_key(ch: char) -> Option<Self> {
        let ch = ch.to_ascii_uppercase();
        Self::ALL.into_iter().find(|c| c.key() == ch)
    }

    /// Map the character to the console action it triggers.
    pub const fn action(self) -> ControlAction {
        match self {
            // Erase, delete and escape are not supported yet
            ControlChar::Backspace | ControlChar::Delete | ControlChar::Escape => ControlAction::Bell,
            ControlChar::Bell => ControlAction::Bell,
            ControlChar::CarriageReturn | ControlChar::LineFeed => ControlAction::Submit,
            ControlChar::FormFeed => ControlAction::FormFeed,
            ControlChar::Tab => ControlAction::InsertTab,
        }
    }
}

/// Resolve any character to an action; unrecognized ones ring the bell.
pub fn action_for(ch: char) -> ControlAction {
    ControlChar::from_key(ch)
        .map(ControlChar::action)
        .unwrap_or(ControlAction::Bell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_is_case_insensitive() {
        assert_eq!(ControlChar::from_key('g'), Some(ControlChar::Bell));
        assert_eq!(ControlChar::from_key('G'), Some(ControlChar::Bell));
        assert_eq!(ControlChar::from_key('l'), Some(ControlChar::FormFeed));
        assert_eq!(ControlChar::from_key('['), Some(ControlChar::Escape));
        assert_eq!(ControlChar::from_key('?'), Some(ControlChar::Delete));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(ControlChar::from_key('c'), None);
        assert_eq!(ControlChar::from_key('K'), None);
        assert_eq!(ControlChar::from_key(']'), None);
    }

    #[test]
    fn test_dispatch_table() {
        assert_eq!(ControlChar::Backspace.action(), ControlAction::Bell);
        assert_eq!(ControlChar::Bell.action(), ControlAction::Bell);
        assert_eq!(ControlChar::CarriageReturn.action(), ControlAction::Submit);
        assert_eq!(ControlChar::Delete.action(), ControlAction::Bell);
        assert_eq!(ControlChar::Escape.action(), ControlAction::Bell);
        assert_eq!(ControlChar::FormFeed.action(), ControlAction::FormFeed);
        assert_eq!(ControlChar::LineFeed.action(), ControlAction::Submit);
        assert_eq!(ControlChar::Tab.action(), ControlAction::InsertTab);
    }

    #[test]
    fn test_unknown_char_rings_bell() {
        assert_eq!(action_for('x'), ControlAction::Bell);
        assert_eq!(action_for('m'), ControlAction::Submit);
    }

    #[test]
    fn test_keys_round_trip() {
        for c in ControlChar::ALL {
            assert_eq!(ControlChar::from_key(c.key()), Some(c));
        }
    }
}

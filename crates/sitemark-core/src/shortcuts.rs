//! Keyboard shortcut mapping and documentation.

use std::fmt;

/// A key relevant to editor shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key. Letters are matched case-insensitively.
    Char(char),
    Delete,
    Backspace,
    Escape,
}

impl Key {
    fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::Delete => f.write_str("Delete"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Escape => f.write_str("Escape"),
        }
    }
}

/// A key press with its modifiers.
///
/// `ctrl` covers both Ctrl and Cmd; hosts fold the platform modifier into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyChord {
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub const fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
        }
    }

    pub const fn ctrl_shift(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: true,
        }
    }
}

impl fmt::Display for KeyChord {
    /// Format the chord for display (e.g., "Ctrl+Shift+Z").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Editor actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    Undo,
    Redo,
    /// Open the save dialog.
    Save,
    /// Open the "open document" dialog.
    Open,
    Copy,
    Paste,
    SelectAll,
    DeleteSelected,
    /// Cancel the current gesture and clear the selection.
    Escape,
}

impl EditorCommand {
    /// Map a key chord to its command.
    pub fn from_chord(chord: KeyChord) -> Option<Self> {
        let key = chord.key.normalized();
        match (key, chord.ctrl, chord.shift) {
            (Key::Char('z'), true, false) => Some(EditorCommand::Undo),
            (Key::Char('z'), true, true) | (Key::Char('y'), true, false) => Some(EditorCommand::Redo),
            (Key::Char('s'), true, false) => Some(EditorCommand::Save),
            (Key::Char('o'), true, false) => Some(EditorCommand::Open),
            (Key::Char('c'), true, false) => Some(EditorCommand::Copy),
            (Key::Char('v'), true, false) => Some(EditorCommand::Paste),
            (Key::Char('a'), true, false) => Some(EditorCommand::SelectAll),
            (Key::Delete | Key::Backspace, false, _) => Some(EditorCommand::DeleteSelected),
            (Key::Escape, _, _) => Some(EditorCommand::Escape),
            _ => None,
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub chord: KeyChord,
    pub command: EditorCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(chord: KeyChord, command: EditorCommand, description: &'static str) -> Self {
        Self {
            chord,
            command,
            description,
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use EditorCommand::*;
        vec![
            Shortcut::new(KeyChord::ctrl(Key::Char('z')), Undo, "Undo"),
            Shortcut::new(KeyChord::ctrl_shift(Key::Char('z')), Redo, "Redo"),
            Shortcut::new(KeyChord::ctrl(Key::Char('y')), Redo, "Redo"),
            Shortcut::new(KeyChord::ctrl(Key::Char('s')), Save, "Save markup..."),
            Shortcut::new(KeyChord::ctrl(Key::Char('o')), Open, "Open markup..."),
            Shortcut::new(KeyChord::ctrl(Key::Char('c')), Copy, "Copy selection"),
            Shortcut::new(KeyChord::ctrl(Key::Char('v')), Paste, "Paste"),
            Shortcut::new(KeyChord::ctrl(Key::Char('a')), SelectAll, "Select all markup"),
            Shortcut::new(KeyChord::new(Key::Delete), DeleteSelected, "Delete selection"),
            Shortcut::new(KeyChord::new(Key::Backspace), DeleteSelected, "Delete selection"),
            Shortcut::new(KeyChord::new(Key::Escape), Escape, "Deselect / cancel drawing"),
        ]
    }

    /// Render the shortcut table for help output.
    pub fn help_text() -> String {
        Self::all()
            .iter()
            .map(|s| format!("  {:20} {}\n", s.chord.to_string(), s.description))
            .collect()
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Z,
    Y,
    S,
    D,
    Space,
    Delete,
    Backspace,
}

/// A key press with modifiers. `command` is Ctrl on Linux/Windows and Cmd on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub command: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            command: false,
            shift: false,
        }
    }

    pub fn command(key: Key) -> Self {
        Self {
            key,
            command: true,
            shift: false,
        }
    }

    pub fn command_shift(key: Key) -> Self {
        Self {
            key,
            command: true,
            shift: true,
        }
    }
}

/// Editor command bound to a shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    QuickAdd,
    Export,
    DeleteSelected,
    DuplicateSelected,
}

/// Map a key press to a command. Nothing fires while a text field has focus.
pub fn command_for(chord: KeyChord, editing_text: bool) -> Option<Command> {
    if editing_text {
        return None;
    }

    match (chord.key, chord.command, chord.shift) {
        (Key::Z, true, false) => Some(Command::Undo),
        (Key::Z, true, true) | (Key::Y, true, _) => Some(Command::Redo),
        (Key::S, true, _) => Some(Command::Export),
        (Key::D, true, _) => Some(Command::DuplicateSelected),
        (Key::Space, false, _) => Some(Command::QuickAdd),
        (Key::Delete | Key::Backspace, false, _) => Some(Command::DeleteSelected),
        _ => None,
    }
}

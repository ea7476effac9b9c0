//! Input events.
//!
//! Editing consumes exactly two shapes of event: text input, which carries one or
//! more printable characters, and key-down, which carries a named key along with the
//! state of modifier keys. Sources of these events, such as the terminal
//! [`Keyboard`](crate::key::Keyboard), translate raw device input into these shapes.

use std::fmt::{self, Display, Formatter};

/// Named keys recognized in key-down events.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Scancode {
    Return,
    Escape,
    Backspace,
    Tab,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Function(u8),

    /// An ordinary character key whose value is carried in [`KeyDown::key`].
    Char,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct KeyDown {
    pub scancode: Scancode,

    /// The character associated with the key, which is present only for
    /// [`Scancode::Char`] keys.
    pub key: Option<char>,

    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyDown {
    /// Creates a key-down event for `scancode` with no modifiers.
    pub const fn new(scancode: Scancode) -> KeyDown {
        KeyDown {
            scancode,
            key: None,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    /// Creates a key-down event for the character key `c` with no modifiers.
    pub const fn char(c: char) -> KeyDown {
        KeyDown {
            scancode: Scancode::Char,
            key: Some(c),
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub const fn with_ctrl(mut self) -> KeyDown {
        self.ctrl = true;
        self
    }

    pub const fn with_shift(mut self) -> KeyDown {
        self.shift = true;
        self
    }

    pub const fn with_alt(mut self) -> KeyDown {
        self.alt = true;
        self
    }
}

impl Display for KeyDown {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "C-")?;
        }
        if self.alt {
            write!(f, "A-")?;
        }
        if self.shift {
            write!(f, "S-")?;
        }
        match (self.scancode, self.key) {
            (Scancode::Char, Some(c)) => write!(f, "{c}"),
            (Scancode::Function(n), _) => write!(f, "F{n}"),
            (code, _) => write!(f, "{code:?}"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum InputEvent {
    Text(String),
    Key(KeyDown),
}

impl InputEvent {
    pub fn text(text: &str) -> InputEvent {
        InputEvent::Text(text.to_string())
    }

    pub fn key(scancode: Scancode) -> InputEvent {
        InputEvent::Key(KeyDown::new(scancode))
    }

    pub fn ctrl(c: char) -> InputEvent {
        InputEvent::Key(KeyDown::char(c).with_ctrl())
    }
}

impl From<KeyDown> for InputEvent {
    fn from(key: KeyDown) -> InputEvent {
        InputEvent::Key(key)
    }
}

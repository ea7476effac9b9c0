//! Modal dialogs.
//!
//! At most one dialog is open at any time. While open, a dialog captures text input
//! into its staging field and interprets a small set of keys. Committing a dialog
//! only reports what the user asked for; carrying it out, and deciding whether the
//! dialog closes as a result, is left to the editor.

use crate::input::{InputEvent, KeyDown, Scancode};
use std::fmt::{self, Display, Formatter};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DialogKind {
    Save,
    Load,
    Find,
}

impl Display for DialogKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialogKind::Save => "save",
            DialogKind::Load => "load",
            DialogKind::Find => "find",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub enum Dialog {
    #[default]
    Normal,
    Save {
        path: String,
    },
    Load {
        path: String,
    },
    Find {
        query: String,
    },
}

/// The result of handling an input event while a dialog is open.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    /// The event was absorbed by the dialog.
    Consumed,

    /// The event has no meaning to the dialog and should be handled by normal
    /// editing.
    Ignored,

    /// The dialog was closed without committing.
    Cancelled,

    Commit(Commit),
}

/// A request to carry out the action of a dialog using its staged value.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Commit {
    Save(String),
    Load { path: String, new_tab: bool },
    Find(String),
}

impl Dialog {
    pub fn kind(&self) -> Option<DialogKind> {
        match self {
            Dialog::Normal => None,
            Dialog::Save { .. } => Some(DialogKind::Save),
            Dialog::Load { .. } => Some(DialogKind::Load),
            Dialog::Find { .. } => Some(DialogKind::Find),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::Normal)
    }

    /// Opens the dialog of `kind` with its staging field initialized to `seed`,
    /// replacing any dialog already open.
    pub fn open(&mut self, kind: DialogKind, seed: &str) {
        let seed = seed.to_string();
        *self = match kind {
            DialogKind::Save => Dialog::Save { path: seed },
            DialogKind::Load => Dialog::Load { path: seed },
            DialogKind::Find => Dialog::Find { query: seed },
        };
    }

    pub fn close(&mut self) {
        *self = Dialog::Normal;
    }

    /// Closes the dialog if `kind` is already open, otherwise opens it as in
    /// [`open`](Self::open).
    pub fn toggle(&mut self, kind: DialogKind, seed: &str) {
        if self.kind() == Some(kind) {
            self.close();
        } else {
            self.open(kind, seed);
        }
    }

    /// Returns the staging field of the open dialog.
    pub fn staged(&self) -> Option<&str> {
        match self {
            Dialog::Normal => None,
            Dialog::Save { path } | Dialog::Load { path } => Some(path),
            Dialog::Find { query } => Some(query),
        }
    }

    fn staged_mut(&mut self) -> Option<&mut String> {
        match self {
            Dialog::Normal => None,
            Dialog::Save { path } | Dialog::Load { path } => Some(path),
            Dialog::Find { query } => Some(query),
        }
    }

    /// Interprets `event` in the context of the open dialog.
    ///
    /// Text is appended to the staging field and _BACKSPACE_ removes its last
    /// character. _ESCAPE_ closes the dialog. _ENTER_ produces a commit, where a
    /// modified _ENTER_ in the load dialog asks for a new tab.
    ///
    /// The find dialog ignores every other key so that editing continues while it is
    /// open, whereas the save and load dialogs consume them. When no dialog is open,
    /// every event is ignored.
    pub fn handle(&mut self, event: &InputEvent) -> Outcome {
        match event {
            InputEvent::Text(text) => match self.staged_mut() {
                Some(staged) => {
                    staged.push_str(text);
                    Outcome::Consumed
                }
                None => Outcome::Ignored,
            },
            InputEvent::Key(key) if self.is_open() => self.handle_key(key),
            InputEvent::Key(_) => Outcome::Ignored,
        }
    }

    fn handle_key(&mut self, key: &KeyDown) -> Outcome {
        match key.scancode {
            Scancode::Backspace => {
                if let Some(staged) = self.staged_mut() {
                    staged.pop();
                }
                Outcome::Consumed
            }
            Scancode::Escape => {
                self.close();
                Outcome::Cancelled
            }
            Scancode::Return => {
                let commit = match self {
                    Dialog::Save { path } => Commit::Save(path.clone()),
                    Dialog::Load { path } => Commit::Load {
                        path: path.clone(),
                        new_tab: key.shift || key.alt,
                    },
                    Dialog::Find { query } => Commit::Find(query.clone()),
                    Dialog::Normal => return Outcome::Ignored,
                };
                Outcome::Commit(commit)
            }
            _ => {
                if matches!(self, Dialog::Find { .. }) {
                    Outcome::Ignored
                } else {
                    Outcome::Consumed
                }
            }
        }
    }
}

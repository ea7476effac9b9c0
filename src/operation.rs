//! Actions that reach beyond a single editor.

use std::path::{Path, PathBuf};

/// An action returned by an editor that is meant to be carried out by the workspace
/// that owns it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Action {
    Quit,

    /// Open an empty editor in a new tab.
    NewTab,

    /// Open the file at the given path in a new tab.
    OpenTab(PathBuf),
}

impl Action {
    pub fn quit() -> Option<Action> {
        Some(Action::Quit)
    }

    pub fn new_tab() -> Option<Action> {
        Some(Action::NewTab)
    }

    pub fn open_tab<P: AsRef<Path>>(path: P) -> Option<Action> {
        Some(Action::OpenTab(path.as_ref().to_path_buf()))
    }
}

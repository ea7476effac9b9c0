//! A clipboard that manages access to both local and global instances.
//!
//! A _local_ clipboard lives only as long as the process, whereas a _global_
//! clipboard is provided by the OS. A global clipboard falls back to local storage
//! whenever the OS service cannot be reached, so text exchange is always available
//! within the editor.

use arboard::Clipboard as GlobalClipboard;
use tracing::warn;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Scope {
    Local,
    Global,
}

pub struct Clipboard {
    scope: Scope,
    local: Option<String>,
}

impl Clipboard {
    pub fn new(scope: Scope) -> Clipboard {
        Clipboard { scope, local: None }
    }

    /// Creates a clipboard that never touches the OS service.
    pub fn local() -> Clipboard {
        Clipboard::new(Scope::Local)
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Places `text` on the clipboard.
    pub fn set_text(&mut self, text: &str) {
        if self.scope == Scope::Global {
            // OS-specific clipboards behave in different ways, so recommendation is
            // to create new instance prior to each access.
            match GlobalClipboard::new().and_then(|mut clip| clip.set_text(text)) {
                Ok(()) => {}
                Err(e) => warn!("global clipboard unavailable: {e}"),
            }
        }
        self.local = Some(text.to_string());
    }

    /// Returns text from the clipboard, or an empty string if nothing has been
    /// placed on it.
    pub fn get_text(&self) -> String {
        let global = if self.scope == Scope::Global {
            GlobalClipboard::new()
                .and_then(|mut clip| clip.get_text())
                .map_err(|e| warn!("global clipboard unavailable: {e}"))
                .ok()
        } else {
            None
        };
        global
            .or_else(|| self.local.clone())
            .unwrap_or_default()
    }
}

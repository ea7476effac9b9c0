//! Workspace.
//!
//! A workspace owns an ordered collection of tabs, each holding exactly one
//! [`Editor`], along with the clipboard, the syntax registry, and the configuration
//! shared by all editors. Events pass through the workspace first, which interprets
//! a handful of global keys before handing the event to the active editor.

use crate::clip::Clipboard;
use crate::config::Configuration;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::input::{InputEvent, KeyDown, Scancode};
use crate::operation::Action;
use crate::syntax::RegistryRef;
use crate::sys::AsString;
use std::path::Path;
use tracing::{debug, error, info};

pub struct Workspace {
    tabs: Vec<Editor>,
    active: usize,
    clip: Clipboard,
    registry: RegistryRef,
    config: Configuration,

    /// Indicates that changes to the configuration are written back to its file.
    persist: bool,
}

impl Workspace {
    /// Creates a workspace with a single empty tab.
    pub fn new(config: Configuration, registry: RegistryRef, clip: Clipboard) -> Workspace {
        Workspace {
            tabs: vec![Editor::new(registry.clone())],
            active: 0,
            clip,
            registry,
            config,
            persist: true,
        }
    }

    /// Prevents changes to the configuration from being written back to its file.
    pub fn without_persistence(mut self) -> Workspace {
        self.persist = false;
        self
    }

    /// Replaces all tabs with one tab per path in `paths`, activating the first.
    ///
    /// A path that does not exist yields an empty editor that will be written to that
    /// path when saved. If `paths` is empty, the workspace is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if any path refers to a directory or cannot be read.
    pub fn open<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut tabs = Vec::new();
        for path in paths {
            let editor = match Editor::open(path, self.registry.clone()) {
                Ok(editor) => editor,
                Err(Error::FileNotFound { .. }) => Editor::create(path, self.registry.clone()),
                Err(e) => return Err(e),
            };
            tabs.push(editor);
        }
        self.tabs = tabs;
        self.active = 0;
        Ok(())
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clip
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Editor {
        &self.tabs[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Editor {
        &mut self.tabs[self.active]
    }

    /// Returns the title of each tab in order.
    pub fn titles(&self) -> Vec<String> {
        self.tabs.iter().map(|editor| editor.title()).collect()
    }

    /// Makes the tab at `index` active, returning `false` if no such tab exists.
    pub fn activate(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Adds `editor` as a new tab immediately following the active tab and makes it
    /// active.
    pub fn add_tab(&mut self, editor: Editor) {
        self.active = if self.tabs.is_empty() {
            0
        } else {
            self.active + 1
        };
        self.tabs.insert(self.active, editor);
    }

    /// Closes the active tab, making its left neighbor active, and returns `true` if
    /// it was the last tab.
    pub fn close_tab(&mut self) -> bool {
        self.tabs.remove(self.active);
        if self.tabs.is_empty() {
            true
        } else {
            self.active = self.active.saturating_sub(1);
            false
        }
    }

    /// Runs `event` to completion, returning [`Action::Quit`] if the workspace has no
    /// remaining tabs.
    pub fn handle(&mut self, event: &InputEvent) -> Option<Action> {
        if let InputEvent::Key(key) = event
            && let Some(action) = self.handle_global(key)
        {
            return action;
        }
        let action = self.tabs[self.active].handle(event, &mut self.clip)?;
        self.act(action)
    }

    /// Handles `key` if bound to a global function, returning the resulting action,
    /// or `None` if not bound.
    fn handle_global(&mut self, key: &KeyDown) -> Option<Option<Action>> {
        if !key.ctrl || key.scancode != Scancode::Char {
            return None;
        }
        let action = match key.key? {
            c @ '1'..='9' => {
                let index = c as usize - '1' as usize;
                if self.activate(index) {
                    debug!(tab = index, "tab activated");
                }
                None
            }
            '-' => {
                self.zoom(-1);
                None
            }
            '=' | '+' => {
                self.zoom(1);
                None
            }
            'w' => {
                if self.close_tab() {
                    Action::quit()
                } else {
                    None
                }
            }
            _ => return None,
        };
        Some(action)
    }

    fn act(&mut self, action: Action) -> Option<Action> {
        match action {
            Action::Quit => Action::quit(),
            Action::NewTab => {
                self.add_tab(Editor::new(self.registry.clone()));
                None
            }
            Action::OpenTab(path) => {
                match Editor::open(&path, self.registry.clone()) {
                    Ok(editor) => self.add_tab(editor),
                    Err(e) => {
                        error!(path = %path.as_string(), "open failed: {e}");
                        let status = if e.is_not_found() {
                            "File not found".to_string()
                        } else {
                            e.to_string()
                        };
                        self.active_mut().set_status(&status);
                    }
                }
                None
            }
        }
    }

    fn zoom(&mut self, delta: i32) {
        let size = self.config.settings.zoom(delta);
        info!(font_size = size, "zoom");
        if self.persist
            && let Err(e) = self.config.store()
        {
            error!("failed to store configuration: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::DialogKind;
    use crate::syntax::Registry;
    use std::fs;

    fn build_workspace() -> Workspace {
        Workspace::new(
            Configuration::default(),
            Registry::load().unwrap().to_ref(),
            Clipboard::local(),
        )
        .without_persistence()
    }

    #[test]
    fn new_workspace_has_one_tab() {
        let ws = build_workspace();
        assert_eq!(ws.tab_count(), 1);
        assert_eq!(ws.titles(), vec!["untitled"]);
    }

    #[test]
    fn titles_track_changes() {
        let mut ws = build_workspace();
        ws.handle(&InputEvent::text("x"));
        assert_eq!(ws.titles(), vec!["untitled*"]);
    }

    #[test]
    fn new_tab_and_switch() {
        let mut ws = build_workspace();
        assert_eq!(ws.handle(&InputEvent::ctrl('n')), None);
        assert_eq!(ws.tab_count(), 2);
        assert_eq!(ws.active_index(), 1);
        ws.handle(&InputEvent::text("b"));

        ws.handle(&InputEvent::ctrl('1'));
        assert_eq!(ws.active_index(), 0);
        assert_eq!(ws.active().buffer().lines(), &[""]);

        ws.handle(&InputEvent::ctrl('9'));
        assert_eq!(ws.active_index(), 0);
        ws.handle(&InputEvent::ctrl('2'));
        assert_eq!(ws.active().buffer().lines(), &["b"]);
    }

    #[test]
    fn closing_last_tab_quits() {
        let mut ws = build_workspace();
        ws.handle(&InputEvent::ctrl('n'));
        assert_eq!(ws.handle(&InputEvent::ctrl('w')), None);
        assert_eq!(ws.tab_count(), 1);
        assert_eq!(ws.handle(&InputEvent::ctrl('w')), Some(Action::Quit));
    }

    #[test]
    fn close_activates_left_neighbor() {
        let mut ws = build_workspace();
        ws.handle(&InputEvent::ctrl('n'));
        ws.handle(&InputEvent::ctrl('n'));
        ws.activate(1);
        ws.close_tab();
        assert_eq!(ws.active_index(), 0);
        assert_eq!(ws.tab_count(), 2);
    }

    #[test]
    fn open_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.rs");
        let b = dir.path().join("b.txt");
        fs::write(&a, "fn a() {}").unwrap();

        let mut ws = build_workspace();
        ws.open(&[&a, &b]).unwrap();
        assert_eq!(ws.titles(), vec!["a.rs", "b.txt"]);
        assert_eq!(ws.active().language(), "rust");
        assert!(ws.open(&[dir.path()]).is_err());
        assert_eq!(ws.tab_count(), 2);
    }

    #[test]
    fn open_tab_from_load_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        fs::write(&path, "{}").unwrap();

        let mut ws = build_workspace();
        ws.handle(&InputEvent::ctrl('o'));
        assert_eq!(ws.active().dialog().kind(), Some(DialogKind::Load));
        for _ in 0..ws.active().metadata().staged_path.chars().count() {
            ws.handle(&InputEvent::key(Scancode::Backspace));
        }
        ws.handle(&InputEvent::text(&path.as_string()));
        ws.handle(&InputEvent::Key(KeyDown::new(Scancode::Return).with_shift()));

        assert_eq!(ws.titles(), vec!["untitled", "c.json"]);
        assert_eq!(ws.active_index(), 1);
        assert_eq!(ws.active().language(), "json");
    }

    #[test]
    fn open_tab_of_vanished_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = build_workspace();
        assert_eq!(ws.act(Action::OpenTab(dir.path().join("gone.txt"))), None);
        assert_eq!(ws.tab_count(), 1);
        assert_eq!(ws.active().status(), "File not found");
    }

    #[test]
    fn zoom_stores_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\nfont-size = 20\n").unwrap();

        let mut ws = Workspace::new(
            Configuration::load_file(&path).unwrap(),
            Registry::load().unwrap().to_ref(),
            Clipboard::local(),
        );
        ws.handle(&InputEvent::ctrl('='));
        ws.handle(&InputEvent::ctrl('='));
        ws.handle(&InputEvent::ctrl('-'));
        assert_eq!(ws.config().settings.font_size, 21);
        let config = Configuration::load_file(&path).unwrap();
        assert_eq!(config.settings.font_size, 21);
    }

    #[test]
    fn copy_paste_across_tabs() {
        let mut ws = build_workspace();
        ws.handle(&InputEvent::text("shared"));
        ws.handle(&InputEvent::ctrl('a'));
        ws.handle(&InputEvent::ctrl('c'));
        ws.handle(&InputEvent::ctrl('n'));
        ws.handle(&InputEvent::ctrl('v'));
        assert_eq!(ws.active().buffer().lines(), &["shared"]);
        assert_eq!(ws.clipboard().get_text(), "shared");
    }
}

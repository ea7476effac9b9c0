//! Editor.
//!
//! An editor composes a [`Buffer`], a [`Cursor`], a [`Selection`] and a [`Dialog`],
//! and is the sole owner of each. Every input event is run to completion by
//! [`Editor::handle`], and every operation that changes the contents of the buffer
//! is followed by highlighting of the entire buffer, so that the highlighted lines
//! are always consistent with the buffer.
//!
//! Failures of file operations never escape an editor. They are logged and reported
//! to the user through the _action status_, a short message shown alongside the
//! open dialog.

use crate::buffer::Buffer;
use crate::clip::Clipboard;
use crate::cursor::Cursor;
use crate::dialog::{Commit, Dialog, DialogKind, Outcome};
use crate::eol::Eol;
use crate::error::{Error, Result};
use crate::input::{InputEvent, KeyDown, Scancode};
use crate::io;
use crate::operation::Action;
use crate::selection::Selection;
use crate::size::Point;
use crate::syntax::{PLAINTEXT, RegistryRef, Syntax};
use crate::sys::{self, AsString};
use crate::token::{self, Lines};
use std::collections::VecDeque;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tracing::{debug, error, info, warn};

pub struct Editor {
    /// An optional path if the buffer is associated with a file.
    path: Option<PathBuf>,

    buffer: Buffer,
    cursor: Cursor,
    selection: Selection,
    dialog: Dialog,

    /// The most recent query entered in the find dialog.
    find_query: String,

    /// Indicates that the buffer was modified since it was loaded or saved.
    changed: bool,

    /// Recent action statuses, the most recent of which is at the back.
    statuses: VecDeque<String>,

    /// Language tag derived from the path.
    language: String,

    registry: RegistryRef,

    /// Highlighted spans of each line in the buffer.
    highlights: Lines,
}

/// A snapshot of an editor taken for the purpose of rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    pub path: Option<PathBuf>,

    /// The value staged in the save or load dialog, or the value with which either
    /// dialog would be seeded if neither is open.
    pub staged_path: String,

    pub filename: String,
    pub is_changed: bool,
    pub find_query: String,
    pub eol: Eol,
    pub cursor: Point,
    pub action_status: String,
    pub language: String,
    pub dialog: Option<DialogKind>,
}

impl Editor {
    /// Number of action statuses retained.
    const STATUS_LIMIT: usize = 32;

    /// Multiplier applied to cursor movement when _ALT_ is held.
    const ACCELERATION: isize = 5;

    const UNTITLED: &str = "untitled";

    /// Creates an editor with an empty buffer that is not associated with any file.
    pub fn new(registry: RegistryRef) -> Editor {
        Editor::with_buffer(None, Buffer::new(), registry)
    }

    /// Creates an editor whose buffer contains the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, registry: RegistryRef) -> Result<Editor> {
        let path = path.as_ref();
        let buffer = io::read_file(path)?;
        info!(path = %path.as_string(), lines = buffer.line_count(), eol = %buffer.eol(), "file loaded");
        Ok(Editor::with_buffer(
            Some(path.to_path_buf()),
            buffer,
            registry,
        ))
    }

    /// Creates an editor with an empty buffer that is associated with `path`, used
    /// when asked to edit a file that does not yet exist.
    pub fn create<P: AsRef<Path>>(path: P, registry: RegistryRef) -> Editor {
        let path = path.as_ref();
        let mut editor = Editor::with_buffer(Some(path.to_path_buf()), Buffer::new(), registry);
        editor.set_status("New file");
        editor
    }

    fn with_buffer(path: Option<PathBuf>, buffer: Buffer, registry: RegistryRef) -> Editor {
        let language = match path {
            Some(ref path) => registry.language_of(path),
            None => PLAINTEXT.to_string(),
        };
        let mut editor = Editor {
            path,
            buffer,
            cursor: Cursor::new(),
            selection: Selection::new(),
            dialog: Dialog::Normal,
            find_query: String::new(),
            changed: false,
            statuses: VecDeque::new(),
            language,
            registry,
            highlights: Lines::new(),
        };
        editor.highlight();
        editor
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Point {
        self.cursor.pos()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn highlights(&self) -> &Lines {
        &self.highlights
    }

    /// Returns the most recent action status, or an empty string if there is none.
    pub fn status(&self) -> &str {
        self.statuses.back().map(|s| s.as_str()).unwrap_or("")
    }

    /// Returns recent action statuses in the order they were set.
    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.statuses.iter().map(|s| s.as_str())
    }

    pub fn set_status(&mut self, status: &str) {
        if self.statuses.len() == Self::STATUS_LIMIT {
            self.statuses.pop_front();
        }
        self.statuses.push_back(status.to_string());
    }

    /// Returns the name of the file associated with the editor, or `untitled`.
    pub fn filename(&self) -> String {
        self.path
            .as_ref()
            .and_then(sys::file_name)
            .unwrap_or_else(|| Self::UNTITLED.to_string())
    }

    /// Returns the title of the editor, which is the filename followed by `*` if the
    /// buffer has unsaved changes.
    pub fn title(&self) -> String {
        let mut title = self.filename();
        if self.changed {
            title.push('*');
        }
        title
    }

    pub fn metadata(&self) -> Metadata {
        let staged_path = match self.dialog.kind() {
            Some(DialogKind::Save | DialogKind::Load) => self.dialog.staged().map(str::to_string),
            _ => None,
        }
        .unwrap_or_else(|| self.path_seed());
        Metadata {
            path: self.path.clone(),
            staged_path,
            filename: self.filename(),
            is_changed: self.changed,
            find_query: self.find_query.clone(),
            eol: self.buffer.eol(),
            cursor: self.cursor.pos(),
            action_status: self.status().to_string(),
            language: self.language.clone(),
            dialog: self.dialog.kind(),
        }
    }

    /// Runs `event` to completion, returning an action if the event requires the
    /// attention of the workspace.
    ///
    /// An open dialog sees the event first, and only if the dialog ignores the event
    /// does it apply to normal editing.
    pub fn handle(&mut self, event: &InputEvent, clip: &mut Clipboard) -> Option<Action> {
        match self.dialog.handle(event) {
            Outcome::Consumed => {
                if let Dialog::Find { ref query } = self.dialog {
                    self.find_query.clone_from(query);
                }
                None
            }
            Outcome::Cancelled => {
                debug!("dialog cancelled");
                None
            }
            Outcome::Commit(commit) => self.commit(commit),
            Outcome::Ignored => match event {
                InputEvent::Text(text) => {
                    self.insert_text(text);
                    None
                }
                InputEvent::Key(key) => self.handle_key(key, clip),
            },
        }
    }

    fn handle_key(&mut self, key: &KeyDown, clip: &mut Clipboard) -> Option<Action> {
        if key.ctrl && key.scancode == Scancode::Char {
            match key.key {
                Some('n') => return Action::new_tab(),
                Some('s') => self.toggle_dialog(DialogKind::Save),
                Some('o') => self.toggle_dialog(DialogKind::Load),
                Some('f') => self.toggle_dialog(DialogKind::Find),
                Some('a') => self.select_all(),
                Some('q') => self.start_of_line(),
                Some('e') => self.end_of_line(),
                Some('c') => self.copy_selection(clip),
                Some('v') => self.paste(clip),
                Some('x') => self.cut_selection(clip),
                Some('l') => self.select_line(),
                _ => (),
            }
            return None;
        }

        let n = if key.alt { Self::ACCELERATION } else { 1 };
        let (dx, dy) = match key.scancode {
            Scancode::Return => {
                self.insert_newline();
                return None;
            }
            Scancode::Backspace => {
                self.remove_char();
                return None;
            }
            Scancode::Tab => {
                self.insert_text("\t");
                return None;
            }
            Scancode::Home => {
                self.start_of_line();
                return None;
            }
            Scancode::End => {
                self.end_of_line();
                return None;
            }
            Scancode::Left => (-n, 0),
            Scancode::Right => (n, 0),
            Scancode::Up => (0, -n),
            Scancode::Down => (0, n),
            _ => return None,
        };
        if key.shift {
            self.register_selection();
        } else {
            self.end_selection();
        }
        self.move_cursor(dx, dy, false);
        None
    }

    /// Inserts `text` at the cursor and moves the cursor to the end of the inserted
    /// text, ending the selection beforehand.
    ///
    /// Line breaks in `text` split the line at the cursor.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.selection.release();
        let fragments = text.split('\n').collect::<Vec<_>>();
        let p = self.buffer.insert_fragments(self.cursor.pos(), &fragments);
        self.cursor.place(p);
        self.touch();
    }

    /// Removes the character preceding the cursor, or the selection if active.
    ///
    /// At the start of a line, the line is merged onto the end of the previous line,
    /// unless it is blank, meaning empty or a single space, in which case it is
    /// removed entirely. In both cases, the cursor lands at the end of what was the
    /// previous line. Nothing happens at the start of the first line.
    pub fn remove_char(&mut self) {
        if self.selection.is_active() {
            self.remove_selection();
            return;
        }
        let p = self.buffer.clamp(self.cursor.pos());
        if p.col > 0 {
            self.buffer.remove_char_left(p.row, p.col);
            let p = Point::new(p.col - 1, p.row);
            if self.buffer.line_len(p.row) > 0 {
                self.cursor.place(p);
            } else {
                self.cursor.set(p);
            }
        } else if p.row > 0 {
            let line = self.buffer.line(p.row);
            if line.is_empty() || line == " " {
                // Row must still exist when moving up from it.
                self.cursor.set(p);
                self.cursor.move_by(&self.buffer, 0, -1, true);
                self.buffer.remove_line(p.row);
            } else {
                let col = self.buffer.join_with_previous(p.row);
                self.cursor.place(Point::new(col, p.row - 1));
            }
        } else {
            return;
        }
        self.touch();
    }

    /// Splits the line at the cursor and moves the cursor to the start of the new
    /// line, ending the selection beforehand.
    pub fn insert_newline(&mut self) {
        self.selection.release();
        let p = self.buffer.clamp(self.cursor.pos());
        self.buffer.split_line(p.row, p.col);
        self.cursor.place(Point::new(0, p.row + 1));
        self.touch();
    }

    /// Moves the cursor as described in [`Cursor::move_by`], and moves the head of
    /// the selection along with it if active.
    pub fn move_cursor(&mut self, dx: isize, dy: isize, force_end: bool) {
        self.cursor.move_by(&self.buffer, dx, dy, force_end);
        self.selection.follow(self.cursor.pos());
    }

    /// Moves the cursor to `p`, clamped to the buffer, which also becomes the sticky
    /// column.
    pub fn set_cursor(&mut self, p: Point) {
        self.cursor.place(self.buffer.clamp(p));
        self.selection.follow(self.cursor.pos());
    }

    pub fn start_of_line(&mut self) {
        self.cursor.start_of_line();
        self.selection.follow(self.cursor.pos());
    }

    pub fn end_of_line(&mut self) {
        self.cursor.end_of_line(&self.buffer);
        self.selection.follow(self.cursor.pos());
    }

    /// Anchors a selection at the cursor unless one is already active.
    pub fn register_selection(&mut self) {
        self.selection.register(self.cursor.pos());
    }

    pub fn end_selection(&mut self) {
        self.selection.release();
    }

    /// Returns the selected text, with lines joined by the line ending sequence of
    /// the buffer.
    pub fn selected_text(&self) -> String {
        self.selection
            .extract(&self.buffer)
            .join(self.buffer.eol().sequence())
    }

    /// Places the selected text on `clip` and ends the selection, though nothing
    /// happens if the selection is not active.
    pub fn copy_selection(&mut self, clip: &mut Clipboard) {
        if self.selection.is_active() {
            clip.set_text(&self.selected_text());
            self.selection.release();
        }
    }

    /// Places the selected text on `clip` and removes it from the buffer, though
    /// nothing happens if the selection is not active.
    pub fn cut_selection(&mut self, clip: &mut Clipboard) {
        if self.selection.is_active() {
            clip.set_text(&self.selected_text());
            self.remove_selection();
        }
    }

    /// Removes the selected text and moves the cursor to where the text was.
    pub fn remove_selection(&mut self) {
        let p = self.selection.remove(&mut self.buffer);
        self.cursor.place(p);
        self.touch();
    }

    /// Inserts text from `clip` at the cursor, ending the selection beforehand.
    ///
    /// Text is split into lines at each `\n`, and a `\r` preceding the `\n` is
    /// discarded, so text copied from buffers of either line ending convention
    /// pastes the same way.
    pub fn paste(&mut self, clip: &Clipboard) {
        let text = clip.get_text();
        if text.is_empty() {
            return;
        }
        self.selection.release();
        let fragments = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect::<Vec<_>>();
        let p = self.buffer.insert_fragments(self.cursor.pos(), &fragments);
        self.cursor.place(p);
        self.touch();
    }

    pub fn select_line(&mut self) {
        let row = self.buffer.clamp(self.cursor.pos()).row;
        let head = self.selection.select_line(&self.buffer, row);
        self.cursor.place(head);
    }

    pub fn select_all(&mut self) {
        let head = self.selection.select_all(&self.buffer);
        self.cursor.place(head);
    }

    /// Opens the dialog of `kind`, or closes it if already open.
    ///
    /// The save and load dialogs are seeded with the path of the editor, or the
    /// working directory if there is no path. The find dialog is seeded with the
    /// most recent query.
    pub fn toggle_dialog(&mut self, kind: DialogKind) {
        let seed = match kind {
            DialogKind::Save | DialogKind::Load => self.path_seed(),
            DialogKind::Find => self.find_query.clone(),
        };
        self.dialog.toggle(kind, &seed);
        debug!(dialog = %kind, open = self.dialog.is_open(), "dialog toggled");
    }

    fn path_seed(&self) -> String {
        match self.path {
            Some(ref path) => path.as_string(),
            None => format!("{}{MAIN_SEPARATOR}", sys::working_dir().as_string()),
        }
    }

    fn commit(&mut self, commit: Commit) -> Option<Action> {
        match commit {
            Commit::Save(path) => {
                match self.save(&path) {
                    Ok(()) => {
                        self.dialog.close();
                        self.set_status(&format!("Saved {path}"));
                    }
                    Err(e) => {
                        error!("save failed: {e}");
                        self.dialog.close();
                        self.set_status(&e.to_string());
                    }
                }
                None
            }
            Commit::Load { path, new_tab } => {
                if !sys::is_file(&path) {
                    warn!(path = %path, "file not found");
                    self.set_status("File not found");
                    None
                } else if new_tab {
                    self.dialog.close();
                    Action::open_tab(&path)
                } else {
                    if let Err(e) = self.load(&path) {
                        error!("load failed: {e}");
                        self.set_status(&e.to_string());
                    }
                    None
                }
            }
            Commit::Find(query) => {
                self.find(&query);
                None
            }
        }
    }

    /// Writes the buffer to `path`, which becomes the path of the editor.
    ///
    /// On failure, the editor is left untouched, including its changed state.
    pub fn save(&mut self, path: &str) -> Result<()> {
        if path.trim().is_empty() {
            return Err(Error::invalid_path(path));
        }
        let path = PathBuf::from(path);
        let n = io::write_file(&path, &self.buffer)?;
        info!(path = %path.as_string(), bytes = n, "file saved");
        if self.path.as_ref() != Some(&path) {
            self.language = self.registry.language_of(&path);
            self.path = Some(path);
            self.highlight();
        }
        self.changed = false;
        Ok(())
    }

    /// Replaces this editor with a new editor whose buffer contains the file at
    /// `path`.
    ///
    /// On failure, this editor is left untouched.
    pub fn load(&mut self, path: &str) -> Result<()> {
        let mut editor = Editor::open(path, self.registry.clone())?;
        editor.find_query = std::mem::take(&mut self.find_query);
        *self = editor;
        Ok(())
    }

    /// Moves the cursor to the start of each line containing `query` in turn,
    /// setting a status for each, such that the cursor ends on the last such line.
    pub fn find(&mut self, query: &str) {
        if query.is_empty() {
            return;
        }
        self.find_query = query.to_string();
        self.selection.release();
        let rows = self
            .buffer
            .lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| line.contains(query))
            .map(|(row, _)| row)
            .collect::<Vec<_>>();
        if rows.is_empty() {
            self.set_status(&format!("No occurrence of {query}"));
        } else {
            for row in rows {
                self.cursor.place(Point::new(0, row));
                self.set_status(&format!("Found occurrence of {query} at {}", row + 1));
            }
        }
    }

    /// Marks the buffer as changed and highlights it.
    fn touch(&mut self) {
        self.changed = true;
        self.highlight();
    }

    fn highlight(&mut self) {
        let text = self.buffer.text();
        self.highlights = match self.registry.find(&self.language) {
            Some(syntax) => token::highlight(&text, syntax),
            None => token::highlight(&text, &Syntax::plain(&self.language)),
        };
    }
}

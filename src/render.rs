//! Render model.
//!
//! Functions in this module turn the state of a workspace into rows of colored
//! [`Chunk`]s, leaving the actual drawing to a surface. A frame is stacked from top
//! to bottom as the tab strip, the top bar of an open dialog, the body containing
//! the buffer, and the bottom bar.

use crate::color::Rgb;
use crate::config::{Configuration, Theme};
use crate::dialog::DialogKind;
use crate::editor::{Editor, Metadata};
use crate::size::{Point, Size};
use crate::sys::AsString;
use crate::workspace::Workspace;

/// A run of text drawn with a single pair of colors.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Chunk {
    pub text: String,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Chunk {
    pub fn new(text: &str, fg: Rgb, bg: Rgb) -> Chunk {
        Chunk {
            text: text.to_string(),
            fg,
            bg,
        }
    }
}

pub type Row = Vec<Chunk>;

/// Returns the concatenated text of `row`.
pub fn row_text(row: &Row) -> String {
    row.iter().map(|chunk| chunk.text.as_str()).collect()
}

/// Width of the rule separating the staging field from the instructions of a dialog.
const RULE_WIDTH: usize = 46;

/// Number of ruler rows at the top of the body.
const RULER_ROWS: usize = 2;

/// Returns the row of tab titles with the active tab highlighted.
pub fn tab_strip(titles: &[String], active: usize, theme: &Theme) -> Row {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let text = format!(" {title} ");
            if i == active {
                Chunk::new(&text, theme.background_primary, theme.text_primary)
            } else {
                Chunk::new(&text, theme.text_dim, theme.background_secondary)
            }
        })
        .collect()
}

/// Returns the rows of the open dialog, or no rows if no dialog is open.
pub fn top_bar(meta: &Metadata, theme: &Theme) -> Vec<Row> {
    let Some(kind) = meta.dialog else {
        return Vec::new();
    };
    let line = |text: &str, fg: Rgb| vec![Chunk::new(text, fg, theme.background_primary)];

    let field = match kind {
        DialogKind::Find => format!("Search: {}", meta.find_query),
        DialogKind::Save | DialogKind::Load => format!("Path: {}", meta.staged_path),
    };
    let mut rows = vec![
        line(&field, theme.text_primary),
        line(" ", theme.text_primary),
        line(&"=".repeat(RULE_WIDTH), theme.text_plain),
        line(" ", theme.text_primary),
        line("Click ENTER to confirm, ESC to cancel", theme.text_primary),
    ];
    if kind == DialogKind::Load {
        rows.push(line("Press SHIFT+ENTER to open in a new tab", theme.text_primary));
    }
    rows.push(line(&meta.action_status, theme.text_primary));
    rows
}

/// Returns the status rows describing the cursor, line ending, language, and path.
pub fn bottom_bar(meta: &Metadata, theme: &Theme) -> Vec<Row> {
    let status = format!(
        "Ln {}, Col {} | EOL: {} | {}",
        meta.cursor.row + 1,
        meta.cursor.col + 1,
        meta.eol.name(),
        meta.language
    );
    let path = match meta.path {
        Some(ref path) => path.as_string(),
        None => "new file".to_string(),
    };
    vec![
        vec![Chunk::new(&status, theme.text_primary, theme.background_primary)],
        vec![Chunk::new(
            &format!("Path: {path}"),
            theme.background_primary,
            theme.text_dim,
        )],
    ]
}

/// A single character along with its colors, which is the unit from which content
/// rows are assembled before being coalesced into chunks.
#[derive(Copy, Clone)]
struct Cell {
    value: char,
    fg: Rgb,
    bg: Rgb,
}

/// Returns `size.rows` rows depicting the buffer of `editor`.
///
/// The first two rows are rulers marking every tenth and every even column. Content
/// rows follow, scrolled such that the cursor sits near the middle when possible,
/// each prefixed with its line number. Rows beyond the end of the buffer show `~`.
pub fn body(editor: &Editor, config: &Configuration, size: Size) -> Vec<Row> {
    let theme = &config.theme;
    let rows = size.rows as usize;
    let cols = size.cols as usize;
    let cursor = editor.cursor();
    let start = cursor.row.saturating_sub(rows / 2);
    let gutter = (rows + start).to_string().len();

    let mut out = Vec::with_capacity(rows);
    for ruler in [tens_ruler(gutter, cols), even_ruler(gutter, cols)] {
        out.push(vec![Chunk::new(&ruler, theme.text_dim, theme.background_primary)]);
    }
    out.truncate(rows);

    let buffer = editor.buffer();
    let highlights = editor.highlights();
    for row in start..(start + rows.saturating_sub(RULER_ROWS)) {
        if row >= buffer.line_count() {
            out.push(vec![Chunk::new("~", theme.text_dim, theme.background_primary)]);
            continue;
        }

        let mut cells = Vec::new();
        if let Some(spans) = highlights.get(row) {
            for span in spans {
                let fg = config.token_color(&span.class);
                cells.extend(span.text.chars().map(|value| Cell {
                    value,
                    fg,
                    bg: theme.background_primary,
                }));
            }
        }

        for (col, cell) in cells.iter_mut().enumerate() {
            if editor.selection().contains(Point::new(col, row)) {
                cell.fg = theme.background_primary;
                cell.bg = theme.text_primary;
            }
        }

        if row == cursor.row {
            if cursor.col >= cells.len() {
                cells.push(Cell {
                    value: ' ',
                    fg: theme.text_plain,
                    bg: theme.background_primary,
                });
            }
            if let Some(cell) = cells.get_mut(cursor.col) {
                cell.fg = theme.background_primary;
                cell.bg = theme.text_primary;
            }
        }

        let mut line = vec![Chunk::new(
            &format!("{:<gutter$} ", row + 1),
            theme.text_dim,
            theme.background_primary,
        )];
        line.extend(coalesce(&cells));
        out.push(line);
    }
    out
}

/// Returns a ruler with the tens digit of every tenth column.
fn tens_ruler(gutter: usize, cols: usize) -> String {
    ruler(gutter, cols, |n| {
        if n % 10 == 0 {
            char::from_digit(((n % 100) / 10) as u32, 10)
        } else {
            None
        }
    })
}

/// Returns a ruler with the ones digit of every even column.
fn even_ruler(gutter: usize, cols: usize) -> String {
    ruler(gutter, cols, |n| {
        let digit = n % 10;
        if digit % 2 == 0 {
            char::from_digit(digit as u32, 10)
        } else {
            None
        }
    })
}

fn ruler<F>(gutter: usize, cols: usize, mark: F) -> String
where
    F: Fn(usize) -> Option<char>,
{
    let mut text = " ".repeat(gutter + 1);
    text.extend((1..=cols.saturating_sub(gutter + 1)).map(|n| mark(n).unwrap_or(' ')));
    text
}

/// Joins adjacent cells with identical colors into chunks.
fn coalesce(cells: &[Cell]) -> Row {
    let mut row: Row = Vec::new();
    for cell in cells {
        match row.last_mut() {
            Some(chunk) if chunk.fg == cell.fg && chunk.bg == cell.bg => chunk.text.push(cell.value),
            _ => row.push(Chunk {
                text: cell.value.to_string(),
                fg: cell.fg,
                bg: cell.bg,
            }),
        }
    }
    row
}

/// Returns exactly `size.rows` rows depicting the active tab of `workspace`.
pub fn frame(workspace: &Workspace, size: Size) -> Vec<Row> {
    let config = workspace.config();
    let theme = &config.theme;
    let editor = workspace.active();
    let meta = editor.metadata();

    let header = top_bar(&meta, theme);
    let footer = bottom_bar(&meta, theme);
    let chrome = 1 + header.len() + footer.len();
    let body_rows = (size.rows as usize).saturating_sub(chrome);

    let mut rows = vec![tab_strip(&workspace.titles(), workspace.active_index(), theme)];
    rows.extend(header);
    rows.extend(body(editor, config, Size::new(body_rows as u32, size.cols)));
    rows.extend(footer);
    rows.resize(size.rows as usize, Row::new());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Clipboard;
    use crate::input::InputEvent;
    use crate::syntax::Registry;
    use std::fs;

    fn build_workspace(text: &str) -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        fs::write(&path, text).unwrap();
        let mut ws = Workspace::new(
            Configuration::default(),
            Registry::load().unwrap().to_ref(),
            Clipboard::local(),
        )
        .without_persistence();
        ws.open(&[&path]).unwrap();
        (dir, ws)
    }

    #[test]
    fn no_top_bar_without_dialog() {
        let (_dir, ws) = build_workspace("x");
        let meta = ws.active().metadata();
        assert!(top_bar(&meta, &Theme::default()).is_empty());
    }

    #[test]
    fn find_top_bar() {
        let (_dir, mut ws) = build_workspace("cat");
        ws.handle(&InputEvent::ctrl('f'));
        ws.handle(&InputEvent::text("ca"));
        let rows = top_bar(&ws.active().metadata(), &Theme::default());
        let text = rows.iter().map(row_text).collect::<Vec<_>>();
        assert_eq!(
            text,
            vec![
                "Search: ca".to_string(),
                " ".to_string(),
                "=".repeat(RULE_WIDTH),
                " ".to_string(),
                "Click ENTER to confirm, ESC to cancel".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn load_top_bar_has_new_tab_hint() {
        let (_dir, mut ws) = build_workspace("x");
        ws.handle(&InputEvent::ctrl('o'));
        let rows = top_bar(&ws.active().metadata(), &Theme::default());
        assert_eq!(rows.len(), 7);
        assert!(row_text(&rows[0]).ends_with("test.txt"));
        assert_eq!(row_text(&rows[5]), "Press SHIFT+ENTER to open in a new tab");
    }

    #[test]
    fn bottom_bar_text() {
        let (_dir, mut ws) = build_workspace("ab\r\ncd");
        ws.active_mut().set_cursor(Point::new(1, 1));
        let rows = bottom_bar(&ws.active().metadata(), &Theme::default());
        assert_eq!(row_text(&rows[0]), "Ln 2, Col 2 | EOL: CRLF | plaintext");
        assert!(row_text(&rows[1]).starts_with("Path: "));

        let editor = Editor::new(Registry::load().unwrap().to_ref());
        let rows = bottom_bar(&editor.metadata(), &Theme::default());
        assert_eq!(row_text(&rows[1]), "Path: new file");
    }

    #[test]
    fn rulers() {
        assert_eq!(tens_ruler(1, 24), format!("  {}1{}2  ", " ".repeat(9), " ".repeat(9)));
        assert_eq!(even_ruler(1, 12), "   2 4 6 8 0");
    }

    #[test]
    fn body_rows() {
        let (_dir, ws) = build_workspace("one\ntwo");
        let rows = body(ws.active(), ws.config(), Size::new(5, 20));
        assert_eq!(rows.len(), 5);
        assert_eq!(row_text(&rows[2]), "1 one");
        assert_eq!(row_text(&rows[3]), "2 two");
        assert_eq!(row_text(&rows[4]), "~");
    }

    #[test]
    fn cursor_is_inverted() {
        let (_dir, mut ws) = build_workspace("abc");
        ws.active_mut().set_cursor(Point::new(1, 0));
        let theme = Theme::default();
        let rows = body(ws.active(), ws.config(), Size::new(3, 20));
        let line = &rows[2];
        assert_eq!(line[1].text, "a");
        assert_eq!(line[2], Chunk::new("b", theme.background_primary, theme.text_primary));
        assert_eq!(line[3].text, "c");
    }

    #[test]
    fn cursor_past_end_of_line() {
        let (_dir, mut ws) = build_workspace("ab");
        ws.active_mut().end_of_line();
        let rows = body(ws.active(), ws.config(), Size::new(3, 20));
        assert_eq!(row_text(&rows[2]), "1 ab ");
    }

    #[test]
    fn selection_background() {
        let (_dir, mut ws) = build_workspace("hello\nworld");
        let editor = ws.active_mut();
        editor.set_cursor(Point::new(3, 1));
        editor.register_selection();
        editor.move_cursor(0, -1, false);
        let theme = Theme::default();
        let rows = body(ws.active(), ws.config(), Size::new(4, 20));
        assert_eq!(rows[2][1], Chunk::new("hel", theme.text_plain, theme.background_primary));
        assert_eq!(rows[2][2], Chunk::new("lo", theme.background_primary, theme.text_primary));
        assert_eq!(rows[3][1], Chunk::new("wor", theme.background_primary, theme.text_primary));
    }

    #[test]
    fn body_scrolls_with_cursor() {
        let text = (1..=50).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let (_dir, mut ws) = build_workspace(&text);
        ws.active_mut().set_cursor(Point::new(0, 39));
        let rows = body(ws.active(), ws.config(), Size::new(10, 20));
        assert_eq!(row_text(&rows[2]), "35 35");
    }

    #[test]
    fn frame_fills_surface() {
        let (_dir, mut ws) = build_workspace("x");
        for rows in [0, 3, 12, 40] {
            assert_eq!(frame(&ws, Size::new(rows, 30)).len(), rows as usize);
        }
        ws.handle(&InputEvent::ctrl('s'));
        let rows = frame(&ws, Size::new(20, 30));
        assert_eq!(rows.len(), 20);
        assert_eq!(row_text(&rows[0]), " test.txt ");
        assert!(row_text(&rows[1]).starts_with("Path: "));
    }

    #[test]
    fn tab_strip_marks_active() {
        let theme = Theme::default();
        let titles = vec!["a".to_string(), "b*".to_string()];
        let row = tab_strip(&titles, 1, &theme);
        assert_eq!(row[0].fg, theme.text_dim);
        assert_eq!(row[1], Chunk::new(" b* ", theme.background_primary, theme.text_primary));
    }
}

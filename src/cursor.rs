//! Cursor positioning.
//!
//! A cursor is a [`Point`] in a [`Buffer`] together with a _sticky column_, which
//! remembers the column most recently chosen by horizontal movement. Vertical
//! movement consults the sticky column to decide where to land, so that moving down
//! through short lines and back up restores the original column.

use crate::buffer::Buffer;
use crate::size::Point;

#[derive(Clone, Debug, Default)]
pub struct Cursor {
    pos: Point,
    sticky_col: usize,
}

impl Cursor {
    pub fn new() -> Cursor {
        Cursor::default()
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn sticky_col(&self) -> usize {
        self.sticky_col
    }

    /// Sets the cursor position to `p` without altering the sticky column.
    pub fn set(&mut self, p: Point) {
        self.pos = p;
    }

    /// Sets the cursor position to `p` and makes its column sticky.
    pub fn place(&mut self, p: Point) {
        self.pos = p;
        self.sticky_col = p.col;
    }

    /// Moves the cursor by `dx` columns and `dy` rows.
    ///
    /// Vertical movement is applied first. The destination row is clamped to the
    /// buffer, and the column becomes the sticky column clamped to the length of the
    /// destination line, or the end of the line if `force_end` is `true`. An empty
    /// destination line always puts the column at `0`.
    ///
    /// Horizontal movement is applied next. Travelling past the end of a line
    /// continues at the start of the following line, and travelling before the start
    /// of a line continues at the end of the preceding line, with one column consumed
    /// by each line break. At the edges of the buffer, the column is clamped. The
    /// resolved column becomes sticky if the line on which it lands is not empty.
    pub fn move_by(&mut self, buffer: &Buffer, dx: isize, dy: isize, force_end: bool) {
        let p = buffer.clamp(self.pos);
        let last_row = buffer.last_row() as isize;
        let mut row = p.row as isize;
        let mut col = p.col as isize;

        if dy != 0 {
            row = (row + dy).clamp(0, last_row);
            let len = buffer.line_len(row as usize);
            col = if len == 0 {
                0
            } else if force_end {
                len as isize
            } else {
                len.min(self.sticky_col) as isize
            };
        }

        if dx != 0 {
            col += dx;
            loop {
                let len = buffer.line_len(row as usize) as isize;
                if col > len {
                    if row < last_row {
                        col -= len + 1;
                        row += 1;
                    } else {
                        col = len;
                        break;
                    }
                } else if col < 0 {
                    if row > 0 {
                        row -= 1;
                        col += buffer.line_len(row as usize) as isize + 1;
                    } else {
                        col = 0;
                        break;
                    }
                } else {
                    break;
                }
            }
            if buffer.line_len(row as usize) > 0 {
                self.sticky_col = col as usize;
            }
        }

        self.pos = Point::new(col as usize, row as usize);
    }

    /// Moves the cursor to the start of the current line and resets the sticky
    /// column to `0`.
    pub fn start_of_line(&mut self) {
        self.place(Point::new(0, self.pos.row));
    }

    /// Moves the cursor to the end of the current line and makes that column sticky.
    pub fn end_of_line(&mut self, buffer: &Buffer) {
        let row = self.pos.row.min(buffer.last_row());
        self.place(Point::new(buffer.line_len(row), row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_buffer(lines: &[&str]) -> Buffer {
        Buffer::load(&lines.join("\n"))
    }

    fn cursor_at(col: usize, row: usize) -> Cursor {
        let mut cursor = Cursor::new();
        cursor.place(Point::new(col, row));
        cursor
    }

    #[test]
    fn move_right_within_line() {
        let buf = build_buffer(&["abc"]);
        let mut cursor = Cursor::new();
        cursor.move_by(&buf, 1, 0, false);
        cursor.move_by(&buf, 1, 0, false);
        assert_eq!(cursor.pos(), Point::new(2, 0));
        assert_eq!(cursor.sticky_col(), 2);
    }

    #[test]
    fn move_down_clamps_and_keeps_sticky() {
        let buf = build_buffer(&["abc", "de"]);
        let mut cursor = Cursor::new();
        for _ in 0..3 {
            cursor.move_by(&buf, 1, 0, false);
        }
        assert_eq!(cursor.pos(), Point::new(3, 0));

        cursor.move_by(&buf, 0, 1, false);
        assert_eq!(cursor.pos(), Point::new(2, 1));
        assert_eq!(cursor.sticky_col(), 3);

        // No row follows, so the cursor stays put.
        cursor.move_by(&buf, 0, 1, false);
        assert_eq!(cursor.pos(), Point::new(2, 1));
        assert_eq!(cursor.sticky_col(), 3);
    }

    #[test]
    fn move_up_restores_sticky_column() {
        let buf = build_buffer(&["abcdef", "x", "", "abcdef"]);
        let mut cursor = cursor_at(5, 0);
        cursor.move_by(&buf, 0, 1, false);
        assert_eq!(cursor.pos(), Point::new(1, 1));
        cursor.move_by(&buf, 0, 1, false);
        assert_eq!(cursor.pos(), Point::new(0, 2));
        cursor.move_by(&buf, 0, 1, false);
        assert_eq!(cursor.pos(), Point::new(5, 3));
        cursor.move_by(&buf, 0, -3, false);
        assert_eq!(cursor.pos(), Point::new(5, 0));
    }

    #[test]
    fn move_up_from_top_row() {
        let buf = build_buffer(&["abc", "abcdef"]);
        let mut cursor = cursor_at(2, 0);
        cursor.move_by(&buf, 0, -5, false);
        assert_eq!(cursor.pos(), Point::new(2, 0));
    }

    #[test]
    fn move_vertical_force_end() {
        let buf = build_buffer(&["abcdef", "ab"]);
        let mut cursor = cursor_at(1, 1);
        cursor.move_by(&buf, 0, -1, true);
        assert_eq!(cursor.pos(), Point::new(6, 0));
        assert_eq!(cursor.sticky_col(), 1);
    }

    #[test]
    fn move_right_wraps_to_next_line() {
        let buf = build_buffer(&["ab", "", "cd"]);
        let mut cursor = cursor_at(2, 0);
        cursor.move_by(&buf, 1, 0, false);
        assert_eq!(cursor.pos(), Point::new(0, 1));
        cursor.move_by(&buf, 2, 0, false);
        assert_eq!(cursor.pos(), Point::new(1, 2));
        assert_eq!(cursor.sticky_col(), 1);
    }

    #[test]
    fn accelerated_move_cascades_through_short_lines() {
        let buf = build_buffer(&["abc", "d", "", "efghij"]);
        let mut cursor = cursor_at(1, 0);
        cursor.move_by(&buf, 5, 0, false);
        assert_eq!(cursor.pos(), Point::new(0, 2));
        cursor.move_by(&buf, 5, 0, false);
        assert_eq!(cursor.pos(), Point::new(4, 3));
    }

    #[test]
    fn move_left_wraps_to_previous_line() {
        let buf = build_buffer(&["abc", "de"]);
        let mut cursor = cursor_at(0, 1);
        cursor.move_by(&buf, -1, 0, false);
        assert_eq!(cursor.pos(), Point::new(3, 0));
        assert_eq!(cursor.sticky_col(), 3);
    }

    #[test]
    fn move_clamps_at_buffer_edges() {
        let buf = build_buffer(&["abc", "de"]);
        let mut cursor = cursor_at(1, 0);
        cursor.move_by(&buf, -5, 0, false);
        assert_eq!(cursor.pos(), Point::new(0, 0));
        let mut cursor = cursor_at(1, 1);
        cursor.move_by(&buf, 5, 0, false);
        assert_eq!(cursor.pos(), Point::new(2, 1));
    }

    #[test]
    fn sticky_ignores_empty_lines() {
        let buf = build_buffer(&["abcd", "", "x"]);
        let mut cursor = cursor_at(4, 0);
        cursor.move_by(&buf, 1, 0, false);
        assert_eq!(cursor.pos(), Point::new(0, 1));
        assert_eq!(cursor.sticky_col(), 4);
    }

    #[test]
    fn start_and_end_of_line() {
        let buf = build_buffer(&["hello", "hi"]);
        let mut cursor = cursor_at(2, 0);
        cursor.end_of_line(&buf);
        assert_eq!(cursor.pos(), Point::new(5, 0));
        assert_eq!(cursor.sticky_col(), 5);
        cursor.start_of_line();
        assert_eq!(cursor.pos(), Point::new(0, 0));
        assert_eq!(cursor.sticky_col(), 0);
    }

    #[test]
    fn stale_position_is_clamped_first() {
        let buf = build_buffer(&["ab"]);
        let mut cursor = cursor_at(9, 4);
        cursor.move_by(&buf, -1, 0, false);
        assert_eq!(cursor.pos(), Point::new(1, 0));
    }
}

//! Line buffer.
//!
//! A buffer is an ordered sequence of lines, none of which contain line breaks.
//! Positions within a line are character offsets, not byte offsets. A buffer is never
//! empty: an empty document is a single empty line.
//!
//! Functions in this module assume that rows passed as arguments exist, and will
//! panic otherwise, since such a request indicates a defect in the caller's clamping
//! of positions. Columns, on the other hand, are clamped to the length of the line.

use crate::eol::Eol;
use crate::etc;
use crate::size::Point;

#[derive(Clone, Debug)]
pub struct Buffer {
    lines: Vec<String>,
    eol: Eol,
}

impl Buffer {
    /// Creates a buffer with a single empty line using the line ending convention
    /// native to the platform.
    pub fn new() -> Buffer {
        Buffer::with_eol(Eol::platform())
    }

    /// Creates a buffer with a single empty line using `eol` as its line ending
    /// convention.
    pub fn with_eol(eol: Eol) -> Buffer {
        Buffer {
            lines: vec![String::new()],
            eol,
        }
    }

    /// Creates a buffer from `text`, whose line ending convention is detected from the
    /// first line break.
    ///
    /// Lines are always split on `\n`. Under the CRLF convention, one trailing `\r`
    /// is removed from each line, so a stray `\n` still starts a new line.
    pub fn load(text: &str) -> Buffer {
        let eol = Eol::detect(text);
        let lines = text
            .split('\n')
            .map(|line| match eol {
                Eol::Crlf => line.strip_suffix('\r').unwrap_or(line),
                Eol::Lf => line,
            })
            .map(|line| line.to_string())
            .collect::<Vec<_>>();
        Buffer { lines, eol }
    }

    /// Returns the contents of the buffer with lines joined by the line ending
    /// sequence.
    pub fn save(&self) -> String {
        self.lines.join(self.eol.sequence())
    }

    /// Returns the contents of the buffer with lines joined by `\n`, regardless of
    /// the line ending convention, which is suitable for tokenization.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn eol(&self) -> Eol {
        self.eol
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn last_row(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> &str {
        &self.lines[row]
    }

    /// Returns the number of characters in the line at `row`.
    pub fn line_len(&self, row: usize) -> usize {
        etc::char_len(&self.lines[row])
    }

    /// Returns the end of the buffer, which is the point following the last
    /// character of the last line.
    pub fn end(&self) -> Point {
        let row = self.last_row();
        Point::new(self.line_len(row), row)
    }

    /// Returns `p` clamped such that its row exists and its column does not extend
    /// beyond the end of the line.
    pub fn clamp(&self, p: Point) -> Point {
        let row = p.row.min(self.last_row());
        Point::new(p.col.min(self.line_len(row)), row)
    }

    /// Inserts `text`, which is assumed to not contain line breaks, into the line at
    /// `row` before the character at `col`, returning the number of characters
    /// inserted.
    pub fn insert_str(&mut self, row: usize, col: usize, text: &str) -> usize {
        let line = &mut self.lines[row];
        let offset = etc::pos_to_offset(line, col);
        line.insert_str(offset, text);
        etc::char_len(text)
    }

    /// Removes the character preceding `col` in the line at `row`, returning the
    /// character removed or `None` if `col` is `0`.
    pub fn remove_char_left(&mut self, row: usize, col: usize) -> Option<char> {
        if col == 0 {
            None
        } else {
            let line = &mut self.lines[row];
            let offset = etc::pos_to_offset(line, col - 1);
            if offset < line.len() {
                Some(line.remove(offset))
            } else {
                None
            }
        }
    }

    /// Splits the line at `row` such that characters from `col` to the end of the
    /// line become a new line inserted at `row + 1`.
    pub fn split_line(&mut self, row: usize, col: usize) {
        let line = &mut self.lines[row];
        let offset = etc::pos_to_offset(line, col);
        let tail = line.split_off(offset);
        self.lines.insert(row + 1, tail);
    }

    /// Appends the line at `row` onto the end of the preceding line and removes it,
    /// returning the column of the preceding line where the join occurred.
    ///
    /// This function panics if `row` is `0`.
    pub fn join_with_previous(&mut self, row: usize) -> usize {
        assert!(row > 0, "no line precedes row 0");
        let line = self.lines.remove(row);
        let prev = &mut self.lines[row - 1];
        let col = etc::char_len(prev);
        prev.push_str(&line);
        col
    }

    /// Removes the line at `row` and returns its contents.
    ///
    /// If `row` is the only line in the buffer, the line is cleared rather than
    /// removed, which preserves the invariant that a buffer always has one line.
    pub fn remove_line(&mut self, row: usize) -> String {
        if self.lines.len() == 1 {
            std::mem::take(&mut self.lines[row])
        } else {
            self.lines.remove(row)
        }
    }

    /// Returns the text between `start` and `end` as a list of line fragments, where
    /// the points are normalized into document order and clamped to the buffer.
    ///
    /// Interior rows are returned in full, whereas the first row begins at the column
    /// of the earlier point and the last row ends at the column of the later point.
    pub fn copy_span(&self, start: Point, end: Point) -> Vec<String> {
        let (from, to) = self.ordered(start, end);
        (from.row..=to.row)
            .map(|row| {
                let line = &self.lines[row];
                let start_col = if row == from.row { from.col } else { 0 };
                let end_col = if row == to.row {
                    to.col
                } else {
                    etc::char_len(line)
                };
                etc::char_slice(line, start_col, end_col).to_string()
            })
            .collect()
    }

    /// Removes the text between `start` and `end`, including any line breaks between
    /// them, returning the earlier of the two points, which is where the text now
    /// joins.
    ///
    /// Points are normalized and clamped as in [`copy_span`](Self::copy_span).
    pub fn remove_span(&mut self, start: Point, end: Point) -> Point {
        let (from, to) = self.ordered(start, end);
        let tail = {
            let line = &self.lines[to.row];
            line[etc::pos_to_offset(line, to.col)..].to_string()
        };
        let head = &mut self.lines[from.row];
        let offset = etc::pos_to_offset(head, from.col);
        head.truncate(offset);
        head.push_str(&tail);
        self.lines.drain(from.row + 1..=to.row);
        from
    }

    /// Inserts `fragments` at `p` such that the first fragment is spliced into the
    /// line at `p`, each subsequent fragment starts a new line, and the remainder of
    /// the original line follows the last fragment.
    ///
    /// Returns the point immediately following the inserted text.
    pub fn insert_fragments<S: AsRef<str>>(&mut self, p: Point, fragments: &[S]) -> Point {
        let p = self.clamp(p);
        match fragments {
            [] => p,
            [only] => {
                let n = self.insert_str(p.row, p.col, only.as_ref());
                Point::new(p.col + n, p.row)
            }
            [first, rest @ ..] => {
                self.split_line(p.row, p.col);
                self.insert_str(p.row, p.col, first.as_ref());
                let mut row = p.row;
                for fragment in &rest[..rest.len() - 1] {
                    row += 1;
                    self.lines.insert(row, fragment.as_ref().to_string());
                }
                row += 1;
                let last = rest[rest.len() - 1].as_ref();
                let col = self.insert_str(row, 0, last);
                Point::new(col, row)
            }
        }
    }

    fn ordered(&self, a: Point, b: Point) -> (Point, Point) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl Default for Buffer {
    fn default() -> Buffer {
        Buffer::new()
    }
}

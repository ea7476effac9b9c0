//! Range selection.
//!
//! A selection is described by an _anchor_, fixed when the selection begins, and a
//! _head_, which follows the cursor. The head may precede the anchor, in which case
//! the selection is said to be reversed. All operations that touch the buffer
//! normalize the two points into document order first.

use crate::buffer::Buffer;
use crate::size::Point;

#[derive(Clone, Debug, Default)]
pub struct Selection {
    anchor: Point,
    head: Point,
    active: bool,
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn head(&self) -> Point {
        self.head
    }

    /// Begins a selection anchored at `at`, unless a selection is already active,
    /// in which case the anchor is left alone.
    pub fn register(&mut self, at: Point) {
        if !self.active {
            self.anchor = at;
            self.head = at;
            self.active = true;
        }
    }

    /// Ends the selection, though the anchor and head are retained.
    pub fn release(&mut self) {
        self.active = false;
    }

    /// Moves the head to `p` if the selection is active.
    pub fn follow(&mut self, p: Point) {
        if self.active {
            self.head = p;
        }
    }

    /// Returns the anchor and head in document order.
    pub fn span(&self) -> (Point, Point) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    /// Returns `true` if the selection is active and `p` falls within it, where the
    /// later endpoint is excluded.
    pub fn contains(&self, p: Point) -> bool {
        let (start, end) = self.span();
        self.active && p >= start && p < end
    }

    /// Returns the selected text of `buffer` as a list of line fragments.
    pub fn extract(&self, buffer: &Buffer) -> Vec<String> {
        buffer.copy_span(self.anchor, self.head)
    }

    /// Removes the selected text from `buffer` and ends the selection, returning the
    /// point at which the cursor belongs, which is the earlier of the endpoints.
    pub fn remove(&mut self, buffer: &mut Buffer) -> Point {
        self.active = false;
        buffer.remove_span(self.anchor, self.head)
    }

    /// Selects the entirety of the line at `row`, returning the head.
    pub fn select_line(&mut self, buffer: &Buffer, row: usize) -> Point {
        self.select(Point::new(0, row), Point::new(buffer.line_len(row), row))
    }

    /// Selects the entire buffer, returning the head.
    pub fn select_all(&mut self, buffer: &Buffer) -> Point {
        self.select(Point::ORIGIN, buffer.end())
    }

    fn select(&mut self, anchor: Point, head: Point) -> Point {
        self.anchor = anchor;
        self.head = head;
        self.active = true;
        head
    }
}

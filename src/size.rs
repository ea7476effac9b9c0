//! Basic types representing size and point information.

use std::fmt::{self, Display, Formatter};

/// Represents the size of a 2-dimensional display surface expressed as _rows_ and
/// _columns_.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Size {
    pub rows: u32,
    pub cols: u32,
}

impl Size {
    /// A size of (`0`, `0`).
    pub const ZERO: Size = Size::new(0, 0);

    /// Creates a size of (`rows`, `cols`).
    pub const fn new(rows: u32, cols: u32) -> Size {
        Size { rows, cols }
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.rows, self.cols)
    }
}

/// Represents a position in a buffer expressed as _row_ and _column_, both of
/// which are `0`-based.
///
/// Points are ordered by row first and column second, which is document order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    /// A point of (`0`, `0`).
    pub const ORIGIN: Point = Point::new(0, 0);

    /// Creates a point at column `col` of row `row`.
    pub const fn new(col: usize, row: usize) -> Point {
        Point { row, col }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_order() {
        assert!(Point::new(9, 0) < Point::new(0, 1));
        assert!(Point::new(1, 2) < Point::new(2, 2));
        assert_eq!(Point::new(3, 4).max(Point::new(5, 3)), Point::new(3, 4));
    }
}

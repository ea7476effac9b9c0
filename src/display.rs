//! Sends frames to the terminal.
//!
//! A display draws each row of a frame from its left edge, expanding tabs to the
//! configured width and clipping text that would fall beyond the right edge. The
//! remainder of each row is cleared using the color of its last chunk.

use crate::control::Surface;
use crate::error::Result;
use crate::render::Row;
use crate::size::Size;
use crate::term;
use crate::writer::Writer;
use std::io::{self, Stdout, Write};

pub struct Display<W: Write = Stdout> {
    writer: Writer<W>,
    tab_width: usize,

    /// Fixed size used in place of the terminal size.
    size: Option<Size>,
}

impl Display {
    /// Creates a display attached to standard output whose size follows the terminal.
    pub fn new(tab_width: usize) -> Display {
        Display {
            writer: Writer::new(io::stdout()),
            tab_width,
            size: None,
        }
    }
}

impl<W: Write> Display<W> {
    /// Creates a display of fixed `size` attached to `out`.
    pub fn with_output(out: W, size: Size, tab_width: usize) -> Display<W> {
        Display {
            writer: Writer::new(out),
            tab_width,
            size: Some(size),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn draw_row(&mut self, row: u32, chunks: &Row, cols: usize) {
        self.writer.set_cursor(row, 0);
        let mut col = 0;
        for chunk in chunks {
            if col >= cols {
                break;
            }
            self.writer.set_color(chunk.fg, chunk.bg);
            for c in chunk.text.chars() {
                if c == '\t' {
                    let n = (self.tab_width - col % self.tab_width.max(1)).min(cols - col);
                    self.writer.write_str(&" ".repeat(n));
                    col += n;
                } else {
                    self.writer.write(c);
                    col += 1;
                }
                if col >= cols {
                    break;
                }
            }
        }
        if col < cols {
            match chunks.last() {
                Some(chunk) => {
                    self.writer.set_color(chunk.fg, chunk.bg);
                }
                None => {
                    self.writer.reset_color();
                }
            }
            self.writer.clear_line();
        }
    }
}

impl<W: Write> Surface for Display<W> {
    fn size(&mut self) -> Result<Size> {
        match self.size {
            Some(size) => Ok(size),
            None => term::size(),
        }
    }

    fn draw(&mut self, rows: &[Row]) -> Result<()> {
        let size = self.size()?;
        self.writer.hide_cursor();
        for (i, row) in rows.iter().take(size.rows as usize).enumerate() {
            self.draw_row(i as u32, row, size.cols as usize);
        }
        self.writer.reset_color();
        self.writer.send()
    }

    fn clear(&mut self) -> Result<()> {
        self.writer.reset_color().clear_screen();
        self.writer.send()
    }

    fn resized(&mut self) -> bool {
        self.size.is_none() && term::size_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi;
    use crate::color::Rgb;
    use crate::render::Chunk;

    /// Removes ANSI sequences from `out` and returns the visible text.
    fn visible(out: &str) -> String {
        let mut text = String::new();
        let mut chars = out.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                text.push(c);
            }
        }
        text
    }

    fn draw(rows: &[Row], size: Size, tab_width: usize) -> String {
        let mut display = Display::with_output(Vec::new(), size, tab_width);
        display.draw(rows).unwrap();
        String::from_utf8(display.into_inner()).unwrap()
    }

    fn chunk(text: &str) -> Chunk {
        Chunk::new(text, Rgb::WHITE, Rgb::BLACK)
    }

    #[test]
    fn expands_tabs() {
        let out = draw(&[vec![chunk("a\tb")]], Size::new(1, 10), 4);
        assert_eq!(visible(&out), "a   b");
    }

    #[test]
    fn clips_to_width() {
        let out = draw(&[vec![chunk("abc"), chunk("defgh")]], Size::new(1, 5), 2);
        assert_eq!(visible(&out), "abcde");
    }

    #[test]
    fn clips_to_height() {
        let rows = vec![vec![chunk("1")], vec![chunk("2")], vec![chunk("3")]];
        let out = draw(&rows, Size::new(2, 5), 2);
        assert_eq!(visible(&out), "12");
    }

    #[test]
    fn writes_truecolor() {
        let out = draw(&[vec![Chunk::new("x", Rgb::new(1, 2, 3), Rgb::WHITE)]], Size::new(1, 5), 2);
        assert!(out.contains(&ansi::set_color(Rgb::new(1, 2, 3), Rgb::WHITE)));
        assert!(out.contains(&ansi::set_cursor(0, 0)));
    }
}

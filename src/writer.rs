//! A buffered abstraction over an output stream that sends content to the
//! terminal in a structured way.

use crate::ansi;
use crate::color::Rgb;
use crate::error::Result;
use std::io::Write;

pub struct Writer<W: Write> {
    out: W,
    buf: String,

    /// Colors most recently written, used to avoid redundant sequences.
    color: Option<(Rgb, Rgb)>,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Writer<W> {
        Writer {
            out,
            buf: String::new(),
            color: None,
        }
    }

    /// Sends buffered changes to the underlying stream.
    pub fn send(&mut self) -> Result<()> {
        if self.buf.len() > 0 {
            self.out.write_all(self.buf.as_bytes())?;
            self.out.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn set_cursor(&mut self, row: u32, col: u32) -> &mut Self {
        self.buf.push_str(&ansi::set_cursor(row, col));
        self
    }

    pub fn hide_cursor(&mut self) -> &mut Self {
        self.buf.push_str(ansi::hide_cursor());
        self
    }

    pub fn clear_line(&mut self) -> &mut Self {
        self.buf.push_str(ansi::clear_line());
        self
    }

    pub fn clear_screen(&mut self) -> &mut Self {
        self.color = None;
        self.buf.push_str(ansi::clear_screen());
        self
    }

    pub fn reset_color(&mut self) -> &mut Self {
        self.color = None;
        self.buf.push_str(ansi::reset_color());
        self
    }

    pub fn set_color(&mut self, fg: Rgb, bg: Rgb) -> &mut Self {
        if self.color != Some((fg, bg)) {
            self.buf.push_str(&ansi::set_color(fg, bg));
            self.color = Some((fg, bg));
        }
        self
    }

    pub fn write(&mut self, c: char) -> &mut Self {
        self.buf.push(c);
        self
    }

    pub fn write_str(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }
}

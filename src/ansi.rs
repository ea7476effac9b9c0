//! A collection of functions that produce ANSI control sequences used in the
//! rendering of terminal output.
//!
//! Of particular note, ANSI sequences related to cursor positioning are `1`-based,
//! so functions in this module that accept *row* and *column* are presumed to be
//! `0`-based and silently add `1` to values.

use crate::color::Rgb;

pub fn clear_screen() -> &'static str {
    "\x1b[2J\x1b[H"
}

pub fn clear_line() -> &'static str {
    "\x1b[K"
}

pub fn show_cursor() -> &'static str {
    "\x1b[?25h"
}

pub fn hide_cursor() -> &'static str {
    "\x1b[?25l"
}

pub fn reset_color() -> &'static str {
    "\x1b[0m"
}

pub fn alt_screen(on: bool) -> &'static str {
    if on { "\x1b[?1049h" } else { "\x1b[?1049l" }
}

pub fn set_cursor(row: u32, col: u32) -> String {
    format!("\x1b[{};{}H", row + 1, col + 1)
}

/// Returns the sequence setting foreground and background to 24-bit colors.
pub fn set_color(fg: Rgb, bg: Rgb) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m",
        fg.r, fg.g, fg.b, bg.r, bg.g, bg.b
    )
}

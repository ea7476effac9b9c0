//! Keyboard reader.
//!
//! A keyboard turns raw bytes from the terminal into [`InputEvent`]s. Printable
//! characters become text input, whereas control bytes and ANSI escape sequences
//! become key-down events carrying the state of modifier keys.

use crate::control::EventSource;
use crate::error::Result;
use crate::input::{InputEvent, KeyDown, Scancode};
use std::io::{self, Bytes, Read, Stdin};
use std::str::from_utf8;

/// A keyboard that reads bytes from a terminal and produces corresponding
/// [`InputEvent`]s.
pub struct Keyboard<R: Read = Stdin> {
    term: Bytes<R>,
}

impl Keyboard {
    /// Creates a new keyboard reader attached to standard input.
    pub fn new() -> Keyboard {
        Keyboard::with_reader(io::stdin())
    }
}

impl<R: Read> Keyboard<R> {
    pub fn with_reader(reader: R) -> Keyboard<R> {
        Keyboard {
            term: reader.bytes(),
        }
    }

    fn next(&mut self) -> Result<Option<u8>> {
        Ok(self.term.next().transpose()?)
    }

    /// Reads the next event.
    ///
    /// Reads one or more bytes from the underlying terminal and returns the
    /// corresponding event, or `None` under any of the following conditions:
    ///
    /// - no bytes are available to read after waiting for `1/10` second
    /// - a byte or sequence of bytes is unrecognized
    /// - a byte or sequence of bytes is malformed, such as a `UTF-8` character
    ///
    /// A keyboard assumes that characters from the terminal are encoded as `UTF-8`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if an I/O error occurred while reading bytes from the
    /// underlying terminal.
    pub fn read_event(&mut self) -> Result<Option<InputEvent>> {
        let event = match self.next()? {
            Some(27) => self.read_escape()?.map(InputEvent::Key),
            Some(b @ 32..=126) => Some(InputEvent::Text((b as char).to_string())),
            Some(b @ (0..=31 | 127)) => map_control(b).map(InputEvent::Key),
            Some(b) => self.read_unicode(b)?.map(|c| InputEvent::Text(c.to_string())),
            None => None,
        };
        Ok(event)
    }

    /// Reads a sequence of bytes prefixed with `ESC`.
    ///
    /// In most cases, this reads an ANSI escape sequence. A lone `ESC` yields the
    /// _ESCAPE_ key itself, and `ESC` followed by any other key yields that key with
    /// _ALT_ pressed, which is how most terminals convey the _ALT_ modifier.
    fn read_escape(&mut self) -> Result<Option<KeyDown>> {
        let key = match self.next()? {
            Some(27) => self.read_escape()?.map(KeyDown::with_alt),
            Some(b'[') => self.read_ansi()?,
            Some(b'O') => match self.next()? {
                Some(b) => map_xterm(b, 1),
                None => None,
            },
            Some(b @ 32..=126) => Some(KeyDown::char(b as char).with_alt()),
            Some(b @ (0..=31 | 127)) => map_control(b).map(KeyDown::with_alt),
            Some(b) => self.read_unicode(b)?.map(|c| KeyDown::char(c).with_alt()),
            None => Some(KeyDown::new(Scancode::Escape)),
        };
        Ok(key)
    }

    /// Reads a sequence of bytes prefixed with `ESC [`.
    ///
    /// The sequence consists of optional numeric parameters separated by `;` and
    /// terminated by a final byte. Only the most common sequences are interpreted, so
    /// some well-formed sequences are ignored.
    fn read_ansi(&mut self) -> Result<Option<KeyDown>> {
        let mut params = vec![0_u32];
        let final_b = loop {
            match self.next()? {
                Some(b @ b'0'..=b'9') => {
                    if let Some(n) = params.last_mut() {
                        *n = n.saturating_mul(10).saturating_add((b - b'0') as u32);
                    }
                }
                Some(b';') if params.len() < Self::MAX_PARAMS => params.push(0),
                Some(b @ 0x40..=0x7e) => break b,
                _ => return Ok(None),
            }
        };

        // Per ANSI standard, both key code and key modifier default to 1.
        let param = |i: usize| params.get(i).copied().filter(|&n| n > 0).unwrap_or(1);

        let key = match final_b {
            // modifyOtherKeys form: ESC [ 27 ; mod ; code ~
            b'~' if param(0) == 27 => map_code(param(2)).map(|key| modify(key, param(1))),
            b'~' => map_vt(param(0), param(1)),
            // fixterms form: ESC [ code ; mod u
            b'u' => map_code(param(0)).map(|key| modify(key, param(1))),
            b => map_xterm(b, param(1)),
        };
        Ok(key)
    }

    const MAX_PARAMS: usize = 4;

    /// Reads a `UTF-8` sequence of bytes where `b` is the first byte.
    ///
    /// `UTF-8` encoding is strictly limited to 2-4 bytes, so anything outside this
    /// range is considered malformed, yielding `None`.
    fn read_unicode(&mut self, b: u8) -> Result<Option<char>> {
        let n = b.leading_ones() as usize;
        if n < 2 || n > 4 {
            return Ok(None);
        }
        let mut buf = [0; 4];
        buf[0] = b;
        for i in 1..n {
            match self.next()? {
                Some(b) => buf[i] = b,
                // Expected number of bytes not read, so assumed to be malformed.
                None => return Ok(None),
            }
        }
        Ok(from_utf8(&buf[..n]).ok().and_then(|s| s.chars().next()))
    }
}

impl<R: Read> EventSource for Keyboard<R> {
    fn read(&mut self) -> Result<Option<InputEvent>> {
        self.read_event()
    }
}

/// Returns the key corresponding to the control byte `b`.
fn map_control(b: u8) -> Option<KeyDown> {
    let key = match b {
        9 => KeyDown::new(Scancode::Tab),
        10 | 13 => KeyDown::new(Scancode::Return),
        8 | 127 => KeyDown::new(Scancode::Backspace),
        27 => KeyDown::new(Scancode::Escape),
        1..=26 => KeyDown::char((b'a' + b - 1) as char).with_ctrl(),
        28 => KeyDown::char('\\').with_ctrl(),
        29 => KeyDown::char(']').with_ctrl(),
        30 => KeyDown::char('^').with_ctrl(),
        // Most terminals send this for CONTROL and `-` together.
        31 => KeyDown::char('-').with_ctrl(),
        _ => return None,
    };
    Some(key)
}

/// Returns the key corresponding to the Unicode code point `code`.
fn map_code(code: u32) -> Option<KeyDown> {
    let key = match code {
        9 => KeyDown::new(Scancode::Tab),
        13 => KeyDown::new(Scancode::Return),
        27 => KeyDown::new(Scancode::Escape),
        127 => KeyDown::new(Scancode::Backspace),
        _ => KeyDown::char(char::from_u32(code).filter(|c| !c.is_control())?),
    };
    Some(key)
}

/// Returns the key corresponding to the VT-style key code and key modifier.
fn map_vt(key_code: u32, key_mod: u32) -> Option<KeyDown> {
    let scancode = match key_code {
        1 | 7 => Scancode::Home,
        2 => Scancode::Insert,
        3 => Scancode::Delete,
        4 | 8 => Scancode::End,
        5 => Scancode::PageUp,
        6 => Scancode::PageDown,
        // F1-F5
        code @ 11..=15 => Scancode::Function((code - 10) as u8),
        // F6-F10
        code @ 17..=21 => Scancode::Function((code - 11) as u8),
        // F11-F12
        code @ 23..=24 => Scancode::Function((code - 12) as u8),
        _ => return None,
    };
    Some(modify(KeyDown::new(scancode), key_mod))
}

/// Returns the key corresponding to the xterm-style final byte and key modifier.
fn map_xterm(final_b: u8, key_mod: u32) -> Option<KeyDown> {
    let scancode = match final_b {
        b'A' => Scancode::Up,
        b'B' => Scancode::Down,
        b'C' => Scancode::Right,
        b'D' => Scancode::Left,
        b'F' => Scancode::End,
        b'H' => Scancode::Home,
        b'Z' => return Some(KeyDown::new(Scancode::Tab).with_shift()),
        // F1-F4
        b @ b'P'..=b'S' => Scancode::Function(b - b'P' + 1),
        _ => return None,
    };
    Some(modify(KeyDown::new(scancode), key_mod))
}

// Bitmasks for each type of recognized key modifier per ANSI standard.
const MOD_SHIFT_MASK: u32 = 0x01;
const MOD_ALT_MASK: u32 = 0x02;
const MOD_CONTROL_MASK: u32 = 0x04;

/// Applies the modifiers of the bitmask `key_mod` to `key`.
fn modify(mut key: KeyDown, key_mod: u32) -> KeyDown {
    // Per ANSI standard, all key modifiers default to 1, hence the reason for
    // subtraction before applying the bitmask.
    let bits = key_mod.saturating_sub(1);
    key.shift |= bits & MOD_SHIFT_MASK != 0;
    key.alt |= bits & MOD_ALT_MASK != 0;
    key.ctrl |= bits & MOD_CONTROL_MASK != 0;
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(bytes: &[u8]) -> Vec<InputEvent> {
        let mut keyboard = Keyboard::with_reader(bytes);
        let mut events = Vec::new();
        while let Some(event) = keyboard.read_event().unwrap() {
            events.push(event);
        }
        events
    }

    fn read_one(bytes: &[u8]) -> Option<InputEvent> {
        Keyboard::with_reader(bytes).read_event().unwrap()
    }

    fn key(key: KeyDown) -> Option<InputEvent> {
        Some(InputEvent::Key(key))
    }

    #[test]
    fn printable_characters() {
        assert_eq!(read_one(b"a"), Some(InputEvent::text("a")));
        assert_eq!(read_one("é".as_bytes()), Some(InputEvent::text("é")));
        assert_eq!(read_one("😀".as_bytes()), Some(InputEvent::text("😀")));
    }

    #[test]
    fn malformed_unicode() {
        assert_eq!(read_one(&[0xc3]), None);
        assert_eq!(read_one(&[0xff]), None);
    }

    #[test]
    fn control_bytes() {
        assert_eq!(read_one(&[13]), key(KeyDown::new(Scancode::Return)));
        assert_eq!(read_one(&[9]), key(KeyDown::new(Scancode::Tab)));
        assert_eq!(read_one(&[127]), key(KeyDown::new(Scancode::Backspace)));
        assert_eq!(read_one(&[19]), Some(InputEvent::ctrl('s')));
        assert_eq!(read_one(&[31]), Some(InputEvent::ctrl('-')));
    }

    #[test]
    fn escape_alone() {
        assert_eq!(read_one(&[27]), key(KeyDown::new(Scancode::Escape)));
    }

    #[test]
    fn alt_prefixed_keys() {
        assert_eq!(read_one(b"\x1bx"), key(KeyDown::char('x').with_alt()));
        assert_eq!(read_one(b"\x1b\r"), key(KeyDown::new(Scancode::Return).with_alt()));
        assert_eq!(
            read_one(b"\x1b\x1b[C"),
            key(KeyDown::new(Scancode::Right).with_alt())
        );
    }

    #[test]
    fn arrow_keys_with_modifiers() {
        assert_eq!(read_one(b"\x1b[A"), key(KeyDown::new(Scancode::Up)));
        assert_eq!(read_one(b"\x1bOB"), key(KeyDown::new(Scancode::Down)));
        assert_eq!(
            read_one(b"\x1b[1;2D"),
            key(KeyDown::new(Scancode::Left).with_shift())
        );
        assert_eq!(
            read_one(b"\x1b[1;4C"),
            key(KeyDown::new(Scancode::Right).with_shift().with_alt())
        );
        assert_eq!(
            read_one(b"\x1b[1;5H"),
            key(KeyDown::new(Scancode::Home).with_ctrl())
        );
    }

    #[test]
    fn vt_keys() {
        assert_eq!(read_one(b"\x1b[3~"), key(KeyDown::new(Scancode::Delete)));
        assert_eq!(read_one(b"\x1b[4~"), key(KeyDown::new(Scancode::End)));
        assert_eq!(read_one(b"\x1b[15~"), key(KeyDown::new(Scancode::Function(5))));
        assert_eq!(read_one(b"\x1b[24~"), key(KeyDown::new(Scancode::Function(12))));
        assert_eq!(read_one(b"\x1bOP"), key(KeyDown::new(Scancode::Function(1))));
        assert_eq!(read_one(b"\x1b[Z"), key(KeyDown::new(Scancode::Tab).with_shift()));
    }

    #[test]
    fn modified_character_keys() {
        assert_eq!(read_one(b"\x1b[27;5;49~"), Some(InputEvent::ctrl('1')));
        assert_eq!(read_one(b"\x1b[61;5u"), Some(InputEvent::ctrl('=')));
        assert_eq!(
            read_one(b"\x1b[13;2u"),
            key(KeyDown::new(Scancode::Return).with_shift())
        );
    }

    #[test]
    fn unrecognized_sequences() {
        assert_eq!(read_one(b"\x1b[99~"), None);
        assert_eq!(read_one(b"\x1b[1;5"), None);
    }

    #[test]
    fn sequence_of_events() {
        let events = read_all(b"hi\x1b[B\x13");
        assert_eq!(
            events,
            vec![
                InputEvent::text("h"),
                InputEvent::text("i"),
                InputEvent::key(Scancode::Down),
                InputEvent::ctrl('s'),
            ]
        );
    }
}

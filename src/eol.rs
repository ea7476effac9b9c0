//! Line ending conventions.

use std::fmt::{self, Display, Formatter};

/// The line ending convention of a buffer, detected once when text is loaded and
/// used for both splitting and joining lines thereafter.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Eol {
    Lf,
    Crlf,
}

impl Eol {
    /// Classifies `text` by looking at the character preceding the first `\n`.
    ///
    /// Text without any `\n` is classified as [`Eol::Lf`].
    pub fn detect(text: &str) -> Eol {
        match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => Eol::Crlf,
            _ => Eol::Lf,
        }
    }

    /// Returns the convention native to the host platform.
    pub fn platform() -> Eol {
        if cfg!(windows) { Eol::Crlf } else { Eol::Lf }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Eol::Lf => "LF",
            Eol::Crlf => "CRLF",
        }
    }

    pub fn sequence(&self) -> &'static str {
        match self {
            Eol::Lf => "\n",
            Eol::Crlf => "\r\n",
        }
    }
}

impl Default for Eol {
    fn default() -> Eol {
        Eol::platform()
    }
}

impl Display for Eol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

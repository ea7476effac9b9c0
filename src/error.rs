//! A complete collection of errors.

use std::io;
use thiserror::Error;
use toml::de;

/// A convenient `Result` type whose error type is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The set of possible errors.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error reported by the operating system.
    #[error("I/O error: {cause}")]
    Os { cause: io::Error },

    /// An I/O error resulting from an operation on a file referenced by `path`.
    #[error("{path}: {cause}")]
    Io { path: String, cause: io::Error },

    /// The file referenced by `path` does not exist.
    #[error("{path}: file not found")]
    FileNotFound { path: String },

    /// The `path` refers to something other than a regular file, such as a directory.
    #[error("{path}: not a file")]
    InvalidPath { path: String },

    /// An error occurred while parsing or writing a configuration file referenced by
    /// `path`.
    #[error("{path}: configuration error: {cause}")]
    Configuration { path: String, cause: String },

    /// An error occurred while parsing a syntax file referenced by `path`.
    #[error("{path}: syntax configuration error: {cause}")]
    Syntax { path: String, cause: String },

    /// A regular expression `pattern` is invalid or too large in compiled form.
    #[error("{pattern}: invalid regular expression: {cause}")]
    InvalidRegex { pattern: String, cause: String },

    /// The color `value` is not a valid `#rrggbb` color.
    #[error("{value}: invalid color")]
    InvalidColor { value: String },
}

impl Error {
    pub fn os() -> Error {
        Error::Os {
            cause: io::Error::last_os_error(),
        }
    }

    pub fn os_cloning(e: &io::Error) -> Error {
        Error::Os {
            cause: io::Error::new(e.kind(), e.to_string()),
        }
    }

    pub fn io(path: &str, cause: io::Error) -> Error {
        Error::Io {
            path: path.to_string(),
            cause,
        }
    }

    pub fn file_not_found(path: &str) -> Error {
        Error::FileNotFound {
            path: path.to_string(),
        }
    }

    pub fn invalid_path(path: &str) -> Error {
        Error::InvalidPath {
            path: path.to_string(),
        }
    }

    pub fn configuration(path: &str, e: &de::Error) -> Error {
        Error::Configuration {
            path: path.to_string(),
            cause: format!("{e}"),
        }
    }

    pub fn configuration_output(path: &str, e: &toml::ser::Error) -> Error {
        Error::Configuration {
            path: path.to_string(),
            cause: format!("{e}"),
        }
    }

    pub fn syntax(path: &str, e: &de::Error) -> Error {
        Error::Syntax {
            path: path.to_string(),
            cause: format!("{e}"),
        }
    }

    pub fn invalid_regex(pattern: &str, e: &regex_lite::Error) -> Error {
        Error::InvalidRegex {
            pattern: pattern.to_string(),
            cause: format!("{e}"),
        }
    }

    pub fn invalid_color(value: &str) -> Error {
        Error::InvalidColor {
            value: value.to_string(),
        }
    }

    /// Returns `true` if this error means the file could not be found or is not a
    /// regular file, both of which are treated the same by the load dialog.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileNotFound { .. } | Error::InvalidPath { .. } => true,
            Error::Io { cause, .. } => cause.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(cause: io::Error) -> Error {
        Error::Os { cause }
    }
}

//! # System functions
//!
//! A collection of functions that make common system-level operations easier to
//! perform. In most cases, these are convenience wrappers that reduce verbosity
//! and take an opinionated stance on how to interpret errors.
use std::env;
use std::path::{Path, PathBuf};

pub trait AsString {
    fn as_string(&self) -> String;
}

impl AsString for PathBuf {
    fn as_string(&self) -> String {
        self.display().to_string()
    }
}

impl AsString for Path {
    fn as_string(&self) -> String {
        self.display().to_string()
    }
}

/// Returns the `HOME` path as derived from the environment, or [`this_dir`] if an
/// error occurred while getting the value of `HOME`.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(this_dir)
}

/// Returns the path of the working directory, or [`this_dir`] if an error occurred
/// while retrieving the value.
pub fn working_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| this_dir())
}

/// Returns the path for `"."`.
pub fn this_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Returns the final component of `path` if it has one.
pub fn file_name<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
}

/// Returns `true` if `path` exists and is not a directory.
pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    path.exists() && !path.is_dir()
}

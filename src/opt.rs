//! Options parser.

use clap::Parser;
use std::path::PathBuf;

/// Version along with the commit from which the binary was built.
const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VITRINE_BUILD_HASH"),
    " ",
    env!("VITRINE_BUILD_DATE"),
    ")"
);

/// A small editor with modal load, save and find dialogs
#[derive(Parser, Debug)]
#[command(name = "vitrine", version = VERSION)]
pub struct Options {
    /// Files to open, each in its own tab
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Load configuration from PATH instead of the standard locations
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// Load additional syntax definitions from *.toml files in DIR
    #[arg(long = "syntax", value_name = "DIR")]
    pub syntax_dir: Option<PathBuf>,

    /// Ignore configuration files and never write configuration changes
    #[arg(long, conflicts_with = "config_path")]
    pub bare: bool,

    /// Keep copied text within the editor rather than the system clipboard
    #[arg(long)]
    pub local_clipboard: bool,
}

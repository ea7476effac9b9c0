//! A small plain-text editor with modal load, save and find dialogs.
//!
//! Copyright 2024 David Edwards
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//! <https://www.apache.org/licenses/LICENSE-2.0>
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.
mod ansi;
mod buffer;
mod clip;
mod color;
mod config;
mod control;
mod cursor;
mod dialog;
mod display;
mod editor;
mod eol;
mod error;
mod etc;
mod input;
mod io;
mod key;
mod logging;
mod operation;
mod opt;
mod render;
mod selection;
mod size;
mod syntax;
mod sys;
mod term;
mod token;
mod workspace;
mod writer;

use crate::clip::{Clipboard, Scope};
use crate::config::Configuration;
use crate::control::{Controller, Surface};
use crate::display::Display;
use crate::error::Result;
use crate::key::Keyboard;
use crate::opt::Options;
use crate::syntax::Registry;
use crate::workspace::Workspace;
use clap::Parser;
use std::ops::Drop;
use std::process::ExitCode;
use tracing::{error, info};

/// Used for restoring the terminal via [`Drop`] to its original state.
struct RestoreTerminal;

impl Drop for RestoreTerminal {
    fn drop(&mut self) {
        print!("{}{}", ansi::show_cursor(), ansi::alt_screen(false));
        term::restore().unwrap_or_else(|e| println!("error restoring terminal: {e}"));
    }
}

fn main() -> ExitCode {
    let opts = Options::parse();
    if let Err(e) = logging::init() {
        eprintln!("logging disabled: {e}");
    }
    match run(opts) {
        Err(e) => {
            error!("{e}");
            println!("{e}");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(opts: Options) -> Result<()> {
    // Load optional configuration from either standard location or path specified on
    // command line, unless explicitly asked to ignore configuration files.
    let config = if opts.bare {
        Configuration::default()
    } else if let Some(ref config_path) = opts.config_path {
        Configuration::load_file(config_path)?
    } else {
        Configuration::load()?
    };

    let registry = if let Some(ref syntax_dir) = opts.syntax_dir {
        Registry::load_dir(syntax_dir)?
    } else {
        Registry::load()?
    };

    let scope = if opts.local_clipboard {
        Scope::Local
    } else {
        Scope::Global
    };

    let mut workspace = Workspace::new(config, registry.to_ref(), Clipboard::new(scope));
    if opts.bare {
        workspace = workspace.without_persistence();
    }
    workspace.open(&opts.files)?;
    info!(tabs = workspace.tab_count(), "workspace opened");

    let tab_width = workspace.config().settings.tab_width;
    let mut controller = Controller::new(Keyboard::new(), Display::new(tab_width), workspace);

    // Puts terminal into raw mode prior to running main controller loop, but also
    // ensures terminal settings are restored upon exit.
    term::init()?;
    let _restore = RestoreTerminal;
    print!("{}", ansi::alt_screen(true));
    Display::new(tab_width).clear()?;
    controller.run()
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::io;

use puflib::{Level, Module, PufError};
use rustyline::error::ReadlineError;
use rustyline::Editor;

/// Print formatted status messages as they arrive.
pub fn status_handler(_module: Option<&dyn Module>, _level: Level, message: &str) {
    println!("{}", message);
}

/// Answer module queries from the terminal. EOF or an interrupt from the
/// line editor counts as user cancellation, not as an I/O failure.
pub fn query_handler(module: &dyn Module, key: &str, prompt: &str) -> puflib::Result<String> {
    println!("Query from module \"{}\", key \"{}\"", module.name(), key);
    let mut editor = Editor::<()>::new();
    match editor.readline(prompt) {
        Ok(line) => Ok(line),
        Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Err(PufError::Canceled),
        Err(ReadlineError::Io(err)) => Err(PufError::Io(err)),
        Err(err) => Err(PufError::Io(io::Error::new(
            io::ErrorKind::Other,
            err.to_string(),
        ))),
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PufError>;

#[derive(Error, Debug)]
pub enum PufError {
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    #[error("nonvolatile store already exists at '{}'", .0.display())]
    AlreadyExists(PathBuf),

    /// Both the enabled and the disabled store exist at once. The lifecycle
    /// engine refuses to guess which one is authoritative.
    #[error("cannot {action} module '{module}': both enabled and disabled stores exist")]
    InconsistentState {
        module: String,
        action: &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed header: {0}")]
    MalformedBlob(&'static str),

    /// The query handler reported that the user canceled the request.
    /// Never to be conflated with an I/O failure.
    #[error("query canceled by user")]
    Canceled,

    /// No query handler is installed; queries cannot be answered.
    #[error("query handler not available")]
    QueryUnavailable,

    #[error("module '{module}' does not support {what}")]
    Unsupported {
        module: String,
        what: &'static str,
    },
}

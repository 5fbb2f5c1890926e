/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use nix::unistd::{access, AccessFlags, Uid};
use walkdir::WalkDir;

use crate::error::{PufError, Result};

pub const PATH_SEP: &str = "/";

const SYSTEM_STORE_ROOT: &str = "/var/lib/puflib";
const USER_STORE_SUBDIR: &str = ".local/lib/puflib";

/// Where nonvolatile stores live when no override is installed: a system-wide
/// prefix for privileged processes, a prefix under `$HOME` otherwise.
pub(crate) fn default_store_root() -> Result<PathBuf> {
    if Uid::effective().is_root() {
        return Ok(PathBuf::from(SYSTEM_STORE_ROOT));
    }
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(USER_STORE_SUBDIR)),
        _ => Err(PufError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "HOME is not set",
        ))),
    }
}

/// Create a directory and all missing parents, `mkdir -p` style. With
/// `skip_last` the final component is treated as a file name and only its
/// parents are created. Components that already exist are not an error.
pub fn create_directory_tree(path: &Path, skip_last: bool) -> Result<()> {
    let target = if skip_last {
        match path.parent() {
            Some(parent) => parent,
            None => return Ok(()),
        }
    } else {
        path
    };
    if target.as_os_str().is_empty() {
        return Ok(());
    }
    DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(target)?;
    Ok(())
}

/// Atomically create and open a new file, failing if it already exists.
/// Owner-only read and write.
pub fn create_and_open(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    Ok(file)
}

/// Open an existing file for read and write without creating it.
pub fn open_existing(path: &Path) -> Result<File> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    Ok(file)
}

/// Advisory probe for whether the running process can use `path`: read,
/// write and execute for directories, read and write for files.
///
/// Warning: the result is stale the moment it is returned. Use it for status
/// reporting only, never to gate an access decision.
pub fn is_accessible(path: &Path, is_dir: bool) -> bool {
    let flags = if is_dir {
        AccessFlags::R_OK | AccessFlags::W_OK | AccessFlags::X_OK
    } else {
        AccessFlags::R_OK | AccessFlags::W_OK
    };
    access(path, flags).is_ok()
}

/// Delete an entire directory tree, depth first. Symlinks are removed as
/// links and never followed.
pub fn delete_tree(path: &Path) -> Result<()> {
    for entry in WalkDir::new(path).contents_first(true) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

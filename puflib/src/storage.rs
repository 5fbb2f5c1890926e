/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::platform;

/// The six kinds of nonvolatile store a module may own. File and directory
/// variants of a role map to the same path; the kind only changes how the
/// artifact is created, probed and deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageRole {
    /// Scratch file used during multi-step provisioning.
    TempFile,
    /// Scratch directory used during multi-step provisioning.
    TempDir,
    /// Provisioned-and-enabled state, as a file.
    FinalFile,
    /// Provisioned-and-enabled state, as a directory.
    FinalDir,
    /// Provisioned state renamed aside to disable, as a file.
    DisabledFile,
    /// Provisioned state renamed aside to disable, as a directory.
    DisabledDir,
}

impl StorageRole {
    pub fn is_dir(self) -> bool {
        matches!(
            self,
            StorageRole::TempDir | StorageRole::FinalDir | StorageRole::DisabledDir
        )
    }

    fn subdir(self) -> &'static str {
        match self {
            StorageRole::TempFile | StorageRole::TempDir => "temp",
            StorageRole::FinalFile | StorageRole::FinalDir => "final",
            StorageRole::DisabledFile | StorageRole::DisabledDir => "disabled",
        }
    }
}

static STORE_ROOT_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Retarget the store base for the whole process, or restore the default
/// discovery with `None`. Intended for embedders that relocate state and for
/// tests running against a scratch directory.
pub fn set_store_root(root: Option<PathBuf>) {
    *STORE_ROOT_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = root;
}

fn store_root() -> Result<PathBuf> {
    let override_root = STORE_ROOT_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    match override_root {
        Some(root) => Ok(root),
        None => platform::default_store_root(),
    }
}

/// Compose the path of the store `role` for module `module_name`:
/// `<base>/{temp,final,disabled}/<module_name>`.
pub fn nv_store_path(module_name: &str, role: StorageRole) -> Result<PathBuf> {
    Ok(store_root()?.join(role.subdir()).join(module_name))
}

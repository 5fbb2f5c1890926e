/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;

use crate::error::{PufError, Result};
use crate::module::Module;
use crate::platform;
use crate::report::{report, Level};
use crate::storage::{nv_store_path, StorageRole};

/// Create the nonvolatile store for `role`, including any missing parent
/// directories. File roles are created exclusively with owner-only
/// permissions and closed again; directory roles refuse to overwrite an
/// existing directory. Either way the caller gets the path back.
///
/// Fails with [`PufError::AlreadyExists`] when a previous run never
/// concluded or the module is already provisioned; aborting with
/// [`delete_nv_store`] or continuing with [`get_nv_store`] resolves that.
pub fn create_nv_store(module: &dyn Module, role: StorageRole) -> Result<PathBuf> {
    let path = nv_store_path(module.name(), role)?;

    if role.is_dir() && platform::is_accessible(&path, true) {
        return Err(PufError::AlreadyExists(path));
    }

    platform::create_directory_tree(&path, !role.is_dir())?;

    if !role.is_dir() {
        match platform::create_and_open(&path) {
            Ok(file) => drop(file),
            Err(PufError::Io(err)) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(PufError::AlreadyExists(path));
            }
            Err(err) => return Err(err),
        }
    }

    debug!("created {:?} store for module '{}'", role, module.name());
    Ok(path)
}

/// Return the path of an existing store iff it is accessible.
pub fn get_nv_store(module: &dyn Module, role: StorageRole) -> Result<PathBuf> {
    let path = nv_store_path(module.name(), role)?;
    if platform::is_accessible(&path, role.is_dir()) {
        Ok(path)
    } else {
        Err(PufError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("nonvolatile store '{}' is not accessible", path.display()),
        )))
    }
}

/// Delete a store: unlink for file roles, recursive removal for directory
/// roles.
pub fn delete_nv_store(module: &dyn Module, role: StorageRole) -> Result<()> {
    let path = nv_store_path(module.name(), role)?;
    debug!("deleting {:?} store for module '{}'", role, module.name());
    if role.is_dir() {
        platform::delete_tree(&path)
    } else {
        fs::remove_file(&path)?;
        Ok(())
    }
}

const DEPROVISION_ORDER: &[StorageRole] = &[
    StorageRole::FinalFile,
    StorageRole::FinalDir,
    StorageRole::DisabledFile,
    StorageRole::DisabledDir,
    StorageRole::TempFile,
    StorageRole::TempDir,
];

/// Remove every artifact the module owns, across both kinds and all three
/// roles. Artifacts that are already absent are not an error, so a
/// partially-gone module deprovisions cleanly.
pub fn deprovision(module: &dyn Module) -> Result<()> {
    for &role in DEPROVISION_ORDER {
        let path = nv_store_path(module.name(), role)?;
        if platform::is_accessible(&path, role.is_dir()) {
            debug!(
                "deprovision '{}': removing {:?} store",
                module.name(),
                role
            );
            if role.is_dir() {
                platform::delete_tree(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
    }
    Ok(())
}

/// Re-enable a disabled module by renaming its DISABLED store back to FINAL.
/// A no-op if the module is already enabled.
pub fn enable(module: &dyn Module) -> Result<()> {
    en_dis(module, true)
}

/// Disable a provisioned module by renaming its FINAL store to DISABLED,
/// keeping the provisioned state around. A no-op if already disabled.
pub fn disable(module: &dyn Module) -> Result<()> {
    en_dis(module, false)
}

fn en_dis(module: &dyn Module, enable: bool) -> Result<()> {
    const KINDS: &[(StorageRole, StorageRole, bool)] = &[
        (StorageRole::FinalFile, StorageRole::DisabledFile, false),
        (StorageRole::FinalDir, StorageRole::DisabledDir, true),
    ];
    let action = if enable { "enable" } else { "disable" };

    for &(final_role, disabled_role, is_dir) in KINDS {
        let final_path = nv_store_path(module.name(), final_role)?;
        let disabled_path = nv_store_path(module.name(), disabled_role)?;

        let (old_path, new_path) = if enable {
            (disabled_path, final_path)
        } else {
            (final_path, disabled_path)
        };

        let acc_old = platform::is_accessible(&old_path, is_dir);
        let acc_new = platform::is_accessible(&new_path, is_dir);

        if acc_old {
            platform::create_directory_tree(&new_path, true)?;
        }

        if acc_old && acc_new {
            report(
                Some(module),
                Level::Error,
                &format!(
                    "cannot {} module - both enabled and disabled stores exist",
                    action
                ),
            );
            return Err(PufError::InconsistentState {
                module: module.name().to_owned(),
                action,
            });
        }

        // already in the requested state for this kind
        if acc_new {
            continue;
        }

        if acc_old {
            debug!("{} module '{}' ({:?} kind)", action, module.name(), final_role);
            fs::rename(&old_path, &new_path)?;
        }
    }

    Ok(())
}

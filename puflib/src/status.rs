/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bitflags::bitflags;

use crate::error::Result;
use crate::module::Module;
use crate::platform;
use crate::storage::{nv_store_path, StorageRole};

bitflags! {
    /// Where a module stands in its lifecycle. Never stored; always derived
    /// from which storage artifacts exist.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModuleStatus: u32 {
        /// A TEMP artifact exists: provisioning was started and not finished.
        const IN_PROGRESS = 1 << 0;
        /// A FINAL or DISABLED artifact exists.
        const PROVISIONED = 1 << 1;
        /// A DISABLED artifact exists.
        const DISABLED = 1 << 2;
    }
}

const ROLE_FLAGS: &[(StorageRole, ModuleStatus)] = &[
    (StorageRole::TempFile, ModuleStatus::IN_PROGRESS),
    (StorageRole::TempDir, ModuleStatus::IN_PROGRESS),
    (StorageRole::FinalFile, ModuleStatus::PROVISIONED),
    (StorageRole::FinalDir, ModuleStatus::PROVISIONED),
    (
        StorageRole::DisabledFile,
        ModuleStatus::PROVISIONED.union(ModuleStatus::DISABLED),
    ),
    (
        StorageRole::DisabledDir,
        ModuleStatus::PROVISIONED.union(ModuleStatus::DISABLED),
    ),
];

/// Derive the module's status from which storage artifacts are accessible.
/// The result is a best-effort snapshot of the filesystem.
pub fn module_status(module: &dyn Module) -> Result<ModuleStatus> {
    let mut status = ModuleStatus::empty();
    for &(role, flags) in ROLE_FLAGS {
        let path = nv_store_path(module.name(), role)?;
        if platform::is_accessible(&path, role.is_dir()) {
            status |= flags;
        }
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serial_test::serial;

    use super::*;
    use crate::registry;
    use crate::storage::set_store_root;

    fn with_store_root<F: FnOnce()>(body: F) {
        let dir = tempfile::tempdir().unwrap();
        set_store_root(Some(dir.path().to_path_buf()));
        body();
        set_store_root(None);
    }

    fn place(subdir: &str, name: &str) {
        let root = nv_store_path(name, StorageRole::TempFile)
            .unwrap()
            .parent()
            .unwrap()
            .parent()
            .unwrap()
            .to_path_buf();
        fs::create_dir_all(root.join(subdir)).unwrap();
        fs::write(root.join(subdir).join(name), b"x").unwrap();
    }

    #[test]
    #[serial]
    fn test_status_of_unprovisioned_module_is_empty() {
        with_store_root(|| {
            let module = registry::get_module("testpuf").unwrap();
            assert_eq!(module_status(module).unwrap(), ModuleStatus::empty());
        });
    }

    #[test]
    #[serial]
    fn test_status_derivation_table() {
        // every combination of (temp, final, disabled) file artifacts
        for bits in 0u8..8 {
            with_store_root(|| {
                let module = registry::get_module("testpuf").unwrap();
                let mut expected = ModuleStatus::empty();
                if bits & 1 != 0 {
                    place("temp", module.name());
                    expected |= ModuleStatus::IN_PROGRESS;
                }
                if bits & 2 != 0 {
                    place("final", module.name());
                    expected |= ModuleStatus::PROVISIONED;
                }
                if bits & 4 != 0 {
                    place("disabled", module.name());
                    expected |= ModuleStatus::PROVISIONED | ModuleStatus::DISABLED;
                }
                assert_eq!(module_status(module).unwrap(), expected, "bits {:03b}", bits);
            });
        }
    }

    #[test]
    #[serial]
    fn test_directory_artifacts_contribute_like_files() {
        with_store_root(|| {
            let module = registry::get_module("dirtestpuf").unwrap();
            let path = nv_store_path(module.name(), StorageRole::FinalDir).unwrap();
            fs::create_dir_all(&path).unwrap();
            assert_eq!(module_status(module).unwrap(), ModuleStatus::PROVISIONED);
        });
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PufError, Result};
use crate::lifecycle;
use crate::module::{Module, Provisioning};
use crate::report::{report, report_os_error, Level};
use crate::storage::StorageRole;

const STEP_FILENAME: &str = "step";

/// Directory-backed test module: the same step counter as `testpuf`, kept
/// in a file inside the TEMP directory. Exercises the directory kind of
/// every storage role. Seal, unseal and challenge-response are unsupported.
pub struct DirTestPuf;

impl DirTestPuf {
    pub const fn new() -> Self {
        Self {}
    }

    fn start(&self, dir: &Path) -> Result<Provisioning> {
        report(Some(self), Level::Info, "writing to NV store");
        fs::write(dir.join(STEP_FILENAME), b"1\n")?;
        report(
            Some(self),
            Level::Info,
            "provisioning will continue after the next invocation",
        );
        Ok(Provisioning::Incomplete)
    }

    fn advance(&self, dir: &Path) -> Result<Provisioning> {
        report(Some(self), Level::Info, "reading from NV store");
        let contents = fs::read_to_string(dir.join(STEP_FILENAME))?;

        match contents.trim() {
            "1" => {
                report(Some(self), Level::Info, "writing to NV store again");
                report(
                    Some(self),
                    Level::Info,
                    "provisioning will continue after the next invocation",
                );
                fs::write(dir.join(STEP_FILENAME), b"2\n")?;
                Ok(Provisioning::Incomplete)
            }
            "2" => {
                report(Some(self), Level::Info, "complete");
                report(Some(self), Level::Info, "deleting NV store");
                lifecycle::delete_nv_store(self, StorageRole::TempDir)?;

                let final_dir = lifecycle::create_nv_store(self, StorageRole::FinalDir)?;
                fs::write(final_dir.join("provisioned"), b"")?;
                Ok(Provisioning::Complete)
            }
            _ => {
                report(Some(self), Level::Warn, "NV store corrupted");
                Err(PufError::Io(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "NV store corrupted",
                )))
            }
        }
    }
}

impl Module for DirTestPuf {
    fn name(&self) -> &'static str {
        "dirtestpuf"
    }

    fn author(&self) -> &'static str {
        "PUFlib developers"
    }

    fn desc(&self) -> &'static str {
        "directory-backed test module"
    }

    fn is_hw_supported(&self) -> bool {
        true
    }

    fn provision(&self) -> Result<Provisioning> {
        let result = match lifecycle::create_nv_store(self, StorageRole::TempDir) {
            Ok(dir) => {
                report(Some(self), Level::Info, "creating NV store");
                self.start(&dir)
            }
            Err(PufError::AlreadyExists(_)) => {
                report(Some(self), Level::Info, "NV store exists, continuing provision");
                let dir = lifecycle::get_nv_store(self, StorageRole::TempDir)?;
                self.advance(&dir)
            }
            Err(err) => Err(err),
        };
        if let Err(PufError::Io(ref err)) = result {
            report_os_error(Some(self), err);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::status::{module_status, ModuleStatus};
    use crate::storage::{nv_store_path, set_store_root};

    #[test]
    #[serial]
    fn test_directory_provisioning_progresses() {
        let dir = tempfile::tempdir().unwrap();
        set_store_root(Some(dir.path().to_path_buf()));
        let module = DirTestPuf::new();
        let temp_dir = nv_store_path(module.name(), StorageRole::TempDir).unwrap();
        let final_dir = nv_store_path(module.name(), StorageRole::FinalDir).unwrap();

        assert_eq!(module.provision().unwrap(), Provisioning::Incomplete);
        assert_eq!(fs::read(temp_dir.join(STEP_FILENAME)).unwrap(), b"1\n");

        assert_eq!(module.provision().unwrap(), Provisioning::Incomplete);
        assert_eq!(fs::read(temp_dir.join(STEP_FILENAME)).unwrap(), b"2\n");

        assert_eq!(module.provision().unwrap(), Provisioning::Complete);
        assert!(!temp_dir.exists());
        assert!(final_dir.join("provisioned").is_file());
        assert_eq!(
            module_status(&module).unwrap(),
            ModuleStatus::PROVISIONED
        );

        set_store_root(None);
    }

    #[test]
    fn test_seal_is_unsupported() {
        let module = DirTestPuf::new();
        assert!(matches!(
            module.seal(b"data"),
            Err(PufError::Unsupported { .. })
        ));
        assert!(matches!(
            module.chal_resp(b"data"),
            Err(PufError::Unsupported { .. })
        ));
    }
}

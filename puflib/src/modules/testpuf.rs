/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PufError, Result};
use crate::handlers;
use crate::lifecycle;
use crate::module::{Module, Provisioning};
use crate::report::{report, report_os_error, Level};
use crate::storage::StorageRole;

/// File-backed test module. Seal and unseal are the identity, and
/// provisioning is a three-step counter kept in the TEMP store, which makes
/// it a convenient stand-in for exercising the resumable lifecycle without
/// any hardware.
pub struct TestPuf;

impl TestPuf {
    pub const fn new() -> Self {
        Self {}
    }

    fn start(&self, path: &Path) -> Result<Provisioning> {
        report(Some(self), Level::Info, "writing to NV store");
        fs::write(path, b"1\n")?;
        report(
            Some(self),
            Level::Info,
            "provisioning will continue after the next invocation",
        );

        match handlers::query(self, "testquery", "Enter any data: ") {
            Ok(answer) => report(
                Some(self),
                Level::Info,
                &format!("query input was: {}", answer),
            ),
            Err(PufError::Canceled) | Err(PufError::QueryUnavailable) => {}
            Err(err) => return Err(err),
        }

        Ok(Provisioning::Incomplete)
    }

    fn advance(&self, path: &Path) -> Result<Provisioning> {
        report(Some(self), Level::Info, "reading from NV store");
        let contents = fs::read_to_string(path)?;

        match contents.trim() {
            "1" => {
                report(Some(self), Level::Info, "writing to NV store again");
                report(
                    Some(self),
                    Level::Info,
                    "provisioning will continue after the next invocation",
                );
                fs::write(path, b"2\n")?;
                Ok(Provisioning::Incomplete)
            }
            "2" => {
                report(Some(self), Level::Info, "complete");
                report(Some(self), Level::Info, "deleting NV store");
                lifecycle::delete_nv_store(self, StorageRole::TempFile)?;

                let final_path = lifecycle::create_nv_store(self, StorageRole::FinalFile)?;
                fs::write(&final_path, b"provisioned")?;
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

impl Module for TestPuf {
    fn name(&self) -> &'static str {
        "testpuf"
    }

    fn author(&self) -> &'static str {
        "PUFlib developers"
    }

    fn desc(&self) -> &'static str {
        "file-backed test module"
    }

    fn is_hw_supported(&self) -> bool {
        true
    }

    fn provision(&self) -> Result<Provisioning> {
        let result = match lifecycle::create_nv_store(self, StorageRole::TempFile) {
            Ok(path) => {
                report(Some(self), Level::Info, "creating NV store");
                self.start(&path)
            }
            Err(PufError::AlreadyExists(_)) => {
                report(Some(self), Level::Info, "NV store exists, continuing provision");
                let path = lifecycle::get_nv_store(self, StorageRole::TempFile)?;
                self.advance(&path)
            }
            Err(err) => Err(err),
        };
        if let Err(PufError::Io(ref err)) = result {
            report_os_error(Some(self), err);
        }
        result
    }

    fn seal(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn unseal(&self, data: &[u8]) -> Result<Vec<u8>> {
        // it's a no-op anyway
        self.seal(data)
    }

    fn chal_resp(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
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
    fn test_provisioning_progresses_step_by_step() {
        let dir = tempfile::tempdir().unwrap();
        set_store_root(Some(dir.path().to_path_buf()));
        let module = TestPuf::new();
        let temp_path = nv_store_path(module.name(), StorageRole::TempFile).unwrap();
        let final_path = nv_store_path(module.name(), StorageRole::FinalFile).unwrap();

        assert_eq!(module.provision().unwrap(), Provisioning::Incomplete);
        assert_eq!(fs::read(&temp_path).unwrap(), b"1\n");
        assert_eq!(
            module_status(&module).unwrap(),
            ModuleStatus::IN_PROGRESS
        );

        assert_eq!(module.provision().unwrap(), Provisioning::Incomplete);
        assert_eq!(fs::read(&temp_path).unwrap(), b"2\n");
        assert_eq!(
            module_status(&module).unwrap(),
            ModuleStatus::IN_PROGRESS
        );

        assert_eq!(module.provision().unwrap(), Provisioning::Complete);
        assert!(!temp_path.exists());
        assert_eq!(fs::read(&final_path).unwrap(), b"provisioned");
        assert_eq!(
            module_status(&module).unwrap(),
            ModuleStatus::PROVISIONED
        );

        set_store_root(None);
    }

    #[test]
    #[serial]
    fn test_corrupted_step_counter_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        set_store_root(Some(dir.path().to_path_buf()));
        let module = TestPuf::new();

        module.provision().unwrap();
        let temp_path = nv_store_path(module.name(), StorageRole::TempFile).unwrap();
        fs::write(&temp_path, b"garbage\n").unwrap();
        assert!(module.provision().is_err());

        set_store_root(None);
    }

    #[test]
    fn test_seal_and_chal_resp_are_identity() {
        let module = TestPuf::new();
        assert_eq!(module.seal(b"data").unwrap(), b"data");
        assert_eq!(module.unseal(b"data").unwrap(), b"data");
        assert_eq!(module.chal_resp(b"data").unwrap(), b"data");
    }
}

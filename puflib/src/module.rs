/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::error::{PufError, Result};

/// Outcome of one provisioning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioning {
    /// The module cannot be provisioned on this hardware.
    NotSupported,
    /// Temporary state was saved; call `provision` again to advance.
    Incomplete,
    /// The module is fully provisioned and ready to seal.
    Complete,
}

/// A pluggable PUF binding. Modules persist their own state through the
/// lifecycle engine's nonvolatile store primitives and talk to the operator
/// through the report and query planes.
///
/// A module must stick to either file-kind or directory-kind stores; the two
/// cannot be mixed.
pub trait Module: Sync {
    /// Unique name. Used as a filesystem component and as the sealed-blob
    /// dispatch key, so it must contain no path separator and no newline.
    fn name(&self) -> &'static str;

    fn author(&self) -> &'static str;

    fn desc(&self) -> &'static str;

    /// Whether the hardware this module binds to is present. A registered
    /// module says nothing about the running system; call this before use.
    fn is_hw_supported(&self) -> bool;

    /// Run one provisioning step. The first call typically creates a TEMP
    /// store and returns [`Provisioning::Incomplete`]; later calls read it
    /// back and advance, eventually promoting the state to FINAL.
    fn provision(&self) -> Result<Provisioning>;

    /// Encrypt `data` with the device secret. Returns a freshly owned buffer.
    fn seal(&self, data: &[u8]) -> Result<Vec<u8>> {
        let _ = data;
        Err(unsupported(self.name(), "seal"))
    }

    /// Invert [`Module::seal`]. Returns a freshly owned buffer.
    fn unseal(&self, data: &[u8]) -> Result<Vec<u8>> {
        let _ = data;
        Err(unsupported(self.name(), "unseal"))
    }

    /// Raw challenge-response interface. Input and output semantics are
    /// module-defined.
    fn chal_resp(&self, data: &[u8]) -> Result<Vec<u8>> {
        let _ = data;
        Err(unsupported(self.name(), "challenge-response"))
    }
}

fn unsupported(module: &str, what: &'static str) -> PufError {
    PufError::Unsupported {
        module: module.to_owned(),
        what,
    }
}

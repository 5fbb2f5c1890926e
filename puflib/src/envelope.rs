/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::error::{PufError, Result};
use crate::module::Module;
use crate::registry;
use crate::report::{report, Level};

/// Magic prefix every sealed blob starts with. Part of the interop contract:
/// a blob is `MAGIC_HEADER || module_name || b'\n' || module_ciphertext`.
pub const MAGIC_HEADER: &[u8] = b"PUFLIB1:";

/// Seal `data` with `module` and wrap the result in a self-describing
/// header, so [`unseal`] can dispatch without the caller naming a module.
pub fn seal(module: &dyn Module, data: &[u8]) -> Result<Vec<u8>> {
    let ciphertext = module.seal(data)?;
    let name = module.name().as_bytes();

    let mut blob = Vec::with_capacity(MAGIC_HEADER.len() + name.len() + 1 + ciphertext.len());
    blob.extend_from_slice(MAGIC_HEADER);
    blob.extend_from_slice(name);
    blob.push(b'\n');
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Parse the blob header, resolve the module that produced it, and hand the
/// module the ciphertext. The caller never names a module; the bytes of the
/// blob alone determine dispatch.
pub fn unseal(blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < MAGIC_HEADER.len() {
        return Err(malformed("too short for puflib magic prefix"));
    }
    if &blob[..MAGIC_HEADER.len()] != MAGIC_HEADER {
        return Err(malformed("no puflib magic prefix"));
    }

    let rest = &blob[MAGIC_HEADER.len()..];
    if rest.is_empty() || rest[0] == b'\n' {
        return Err(malformed("too short for module name"));
    }
    let name_end = match rest.iter().position(|&b| b == b'\n') {
        Some(pos) => pos,
        None => return Err(malformed("no module name")),
    };

    let name_bytes = &rest[..name_end];
    let module = std::str::from_utf8(name_bytes)
        .ok()
        .and_then(registry::get_module);
    let module = match module {
        Some(module) => module,
        None => {
            let shown = String::from_utf8_lossy(name_bytes).into_owned();
            report(
                None,
                Level::Error,
                &format!("cannot unseal blob; requested module not found: {}", shown),
            );
            return Err(PufError::ModuleNotFound(shown));
        }
    };

    module.unseal(&rest[name_end + 1..])
}

/// Pass `data` through the module's raw challenge-response interface. The
/// envelope imposes no format on either side.
pub fn chal_resp(module: &dyn Module, data: &[u8]) -> Result<Vec<u8>> {
    module.chal_resp(data)
}

fn malformed(reason: &'static str) -> PufError {
    report(
        None,
        Level::Error,
        &format!("malformed header: {}", reason),
    );
    PufError::MalformedBlob(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn testpuf() -> &'static dyn Module {
        registry::get_module("testpuf").unwrap()
    }

    #[test]
    fn test_seal_layout() {
        let blob = seal(testpuf(), b"hello").unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(MAGIC_HEADER);
        expected.extend_from_slice(b"testpuf\n");
        expected.extend_from_slice(b"hello");
        assert_eq!(blob, expected);
    }

    #[test]
    fn test_seal_unseal_round_trip() {
        let blob = seal(testpuf(), b"hello").unwrap();
        assert_eq!(unseal(&blob).unwrap(), b"hello");
    }

    #[test]
    fn test_round_trip_binary_payload() {
        let payload: Vec<u8> = (0u8..=255).collect();
        let blob = seal(testpuf(), &payload).unwrap();
        assert_eq!(unseal(&blob).unwrap(), payload);
    }

    #[test]
    fn test_unseal_dispatches_by_header_alone() {
        // forge a blob naming the directory module: dispatch must reach it,
        // and its unseal reports itself unsupported
        let mut blob = Vec::new();
        blob.extend_from_slice(MAGIC_HEADER);
        blob.extend_from_slice(b"dirtestpuf\nx");
        let result = unseal(&blob);
        assert!(matches!(
            result,
            Err(PufError::Unsupported { ref module, .. }) if module == "dirtestpuf"
        ));
    }

    #[test]
    fn test_unseal_rejects_short_blob() {
        let result = unseal(b"PU");
        assert!(matches!(
            result,
            Err(PufError::MalformedBlob("too short for puflib magic prefix"))
        ));
    }

    #[test]
    fn test_unseal_rejects_wrong_magic() {
        let result = unseal(b"not a puflib blob");
        assert!(matches!(
            result,
            Err(PufError::MalformedBlob("no puflib magic prefix"))
        ));
    }

    #[test]
    fn test_unseal_rejects_empty_module_name() {
        let mut blob = MAGIC_HEADER.to_vec();
        blob.extend_from_slice(b"\npayload");
        let result = unseal(&blob);
        assert!(matches!(
            result,
            Err(PufError::MalformedBlob("too short for module name"))
        ));
    }

    #[test]
    fn test_unseal_rejects_unterminated_module_name() {
        let mut blob = MAGIC_HEADER.to_vec();
        blob.extend_from_slice(b"testpuf");
        let result = unseal(&blob);
        assert!(matches!(
            result,
            Err(PufError::MalformedBlob("no module name"))
        ));
    }

    #[test]
    fn test_unseal_rejects_unknown_module() {
        let mut blob = MAGIC_HEADER.to_vec();
        blob.extend_from_slice(b"nosuchmod\npayload");
        let result = unseal(&blob);
        assert!(matches!(
            result,
            Err(PufError::ModuleNotFound(ref name)) if name == "nosuchmod"
        ));
    }

    #[test]
    fn test_chal_resp_pass_through() {
        let out = chal_resp(testpuf(), b"challenge").unwrap();
        assert_eq!(out, b"challenge");
    }
}

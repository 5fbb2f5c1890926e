/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! PUFlib exposes Physically-Unclonable-Function hardware as a uniform
//! sealing service: hand in bytes, get back an opaque self-describing blob,
//! hand the blob back later to recover the bytes. Pluggable modules do the
//! actual PUF binding; the library manages their on-disk lifecycle and the
//! sealed-blob envelope around them.

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod module;
pub mod modules;
pub mod platform;
pub mod registry;
pub mod report;
pub mod status;
pub mod storage;

pub use envelope::{chal_resp, seal, unseal, MAGIC_HEADER};
pub use error::{PufError, Result};
pub use handlers::{
    clear_query_handler, clear_status_handler, query, set_query_handler, set_status_handler,
    QueryHandler, StatusHandler,
};
pub use lifecycle::{
    create_nv_store, delete_nv_store, deprovision, disable, enable, get_nv_store,
};
pub use module::{Module, Provisioning};
pub use registry::{get_module, get_modules};
pub use report::{report, report_os_error, Level};
pub use status::{module_status, ModuleStatus};
pub use storage::{nv_store_path, set_store_root, StorageRole};

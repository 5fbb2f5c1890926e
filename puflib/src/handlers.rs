/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{PufError, Result};
use crate::module::Module;
use crate::report::Level;

/// Receives every operator-visible message, already formatted as
/// `level (module): message`. Must not call back into the library.
pub type StatusHandler = dyn Fn(Option<&dyn Module>, Level, &str) + Send + Sync;

/// Answers a module's request for data during provisioning. `key` uniquely
/// identifies the item so non-interactive callers can look answers up;
/// `prompt` is for humans. Return [`PufError::Canceled`] when the user backs
/// out.
pub type QueryHandler = dyn Fn(&dyn Module, &str, &str) -> Result<String> + Send + Sync;

// The only process-wide mutable state in the library, together with the
// store-root override. The mutex guards the slot, never the invocation: a
// reader clones the Arc, drops the guard, and only then calls the handler,
// so a handler is free to call set_* without deadlocking.
static STATUS_HANDLER: Mutex<Option<Arc<StatusHandler>>> = Mutex::new(None);
static QUERY_HANDLER: Mutex<Option<Arc<QueryHandler>>> = Mutex::new(None);

/// Install the status message callback. Messages emitted while no handler is
/// installed are dropped.
pub fn set_status_handler<F>(handler: F)
where
    F: Fn(Option<&dyn Module>, Level, &str) + Send + Sync + 'static,
{
    *STATUS_HANDLER
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
}

pub fn clear_status_handler() {
    *STATUS_HANDLER
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

/// Install the query callback. Modules are not required to tolerate an
/// unanswerable query, so install one before provisioning.
pub fn set_query_handler<F>(handler: F)
where
    F: Fn(&dyn Module, &str, &str) -> Result<String> + Send + Sync + 'static,
{
    *QUERY_HANDLER.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
}

pub fn clear_query_handler() {
    *QUERY_HANDLER.lock().unwrap_or_else(PoisonError::into_inner) = None;
}

pub(crate) fn status_handler() -> Option<Arc<StatusHandler>> {
    STATUS_HANDLER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Ask the operator for data on behalf of `module`. With no handler
/// installed the query fails as unavailable, which is not a system error.
pub fn query(module: &dyn Module, key: &str, prompt: &str) -> Result<String> {
    let handler = QUERY_HANDLER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    match handler {
        Some(handler) => handler(module, key, prompt),
        None => Err(PufError::QueryUnavailable),
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt::Display;
use std::io;

use crate::handlers;
use crate::module::Module;

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Route a raw message like "hardware caught fire" to the status handler as
/// `error (eeprom): hardware caught fire`. Messages for the library itself
/// are attributed to `puflib`. Debug messages are dropped in release builds.
pub fn report(module: Option<&dyn Module>, level: Level, message: &str) {
    if level == Level::Debug && !cfg!(debug_assertions) {
        return;
    }
    let handler = match handlers::status_handler() {
        Some(handler) => handler,
        None => return,
    };
    let name = module.map_or("puflib", |m| m.name());
    let formatted = format!("{} ({}): {}", level, name, message);
    handler(module, level, &formatted);
}

/// Report a system error at `error` level through the status handler.
pub fn report_os_error(module: Option<&dyn Module>, err: &io::Error) {
    report(module, Level::Error, &err.to_string());
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serial_test::serial;

    use super::*;
    use crate::handlers::{clear_status_handler, set_status_handler};
    use crate::registry;

    fn capture() -> Arc<Mutex<Vec<String>>> {
        let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(vec![]));
        let sink = messages.clone();
        set_status_handler(move |_module: Option<&dyn Module>, _level: Level, msg: &str| {
            sink.lock().unwrap().push(msg.to_owned());
        });
        messages
    }

    #[test]
    #[serial]
    fn test_report_formats_module_name() {
        let messages = capture();
        let module = registry::get_module("testpuf").unwrap();
        report(Some(module), Level::Error, "hardware caught fire");
        assert_eq!(
            messages.lock().unwrap().as_slice(),
            ["error (testpuf): hardware caught fire"]
        );
        clear_status_handler();
    }

    #[test]
    #[serial]
    fn test_report_without_module_is_attributed_to_puflib() {
        let messages = capture();
        report(None, Level::Warn, "something odd");
        assert_eq!(
            messages.lock().unwrap().as_slice(),
            ["warn (puflib): something odd"]
        );
        clear_status_handler();
    }

    #[test]
    #[serial]
    fn test_report_without_handler_is_dropped() {
        clear_status_handler();
        report(None, Level::Info, "nobody listening");
    }

    #[test]
    #[serial]
    fn test_report_os_error_uses_error_level() {
        let messages = capture();
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        report_os_error(None, &err);
        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("error (puflib): "));
        clear_status_handler();
    }
}

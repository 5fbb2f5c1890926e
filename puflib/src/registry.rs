/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::module::Module;
use crate::modules::dirtestpuf::DirTestPuf;
use crate::modules::testpuf::TestPuf;

/// Every module compiled into this build, in registration order. The order
/// is stable and defines iteration order everywhere. Registration says
/// nothing about hardware presence; check `is_hw_supported` before use.
pub const MODULES: &[&dyn Module] = &[
    &TestPuf::new(),
    &DirTestPuf::new(),
    // your module here
];

pub fn get_modules() -> &'static [&'static dyn Module] {
    MODULES
}

/// Look a module up by exact name. First match wins; duplicate names are a
/// build-time bug.
pub fn get_module(name: &str) -> Option<&'static dyn Module> {
    MODULES.iter().copied().find(|m| m.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let module = get_module("testpuf").unwrap();
        assert_eq!(module.name(), "testpuf");
        assert!(get_module("no-such-module").is_none());
        // names are case-sensitive
        assert!(get_module("TestPuf").is_none());
    }

    #[test]
    fn test_registration_order_is_stable() {
        let names: Vec<&str> = get_modules().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["testpuf", "dirtestpuf"]);
    }

    #[test]
    fn test_module_names_are_wellformed() {
        let mut seen = Vec::new();
        for module in get_modules() {
            let name = module.name();
            assert!(!name.is_empty(), "empty module name");
            assert!(
                !name.contains('/') && !name.contains('\n'),
                "module name '{}' contains a path separator or newline",
                name
            );
            assert!(!seen.contains(&name), "duplicate module name '{}'", name);
            seen.push(name);
        }
    }
}

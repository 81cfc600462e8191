//! Fuzz command-line lookup and argument splitting.

#![no_main]

use libfuzzer_sys::fuzz_target;
use singlewire::debug::Registry;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    let mut reg = Registry::new();
    let _ = reg.register("infoHelp", |_, _| {}, None, None, None);
    let _ = reg.register("levelLogSys", |_, _| {}, Some("ll"), None, None);
    let _ = reg.register("ping", |_, _| {}, Some("p"), Some("probe"), Some("diag"));

    let _ = reg.lookup(line);
});

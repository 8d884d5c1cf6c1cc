//! Fuzz the inbound command parser: arbitrary bytes must never panic —
//! malformed messages are dropped, well-formed ones produce a command.

#![no_main]

use libfuzzer_sys::fuzz_target;
use swell::app::commands::Command;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = core::str::from_utf8(data) {
        let _ = Command::parse(text);
    }
});

//! Fuzz the DFPlayer frame checksum verifier with arbitrary 10-byte frames.

#![no_main]

use libfuzzer_sys::fuzz_target;
use swell::drivers::dfplayer::{checksum_ok, frame, Cmd};

fuzz_target!(|data: &[u8]| {
    if data.len() >= 10 {
        let mut buf = [0u8; 10];
        buf.copy_from_slice(&data[..10]);
        let _ = checksum_ok(&buf);
    }

    // Frames we build always verify.
    if let [cmd_byte, p0, p1, ..] = *data {
        let cmd = match cmd_byte % 5 {
            0 => Cmd::PlayTrack,
            1 => Cmd::SetVolume,
            2 => Cmd::SetEq,
            3 => Cmd::Reset,
            _ => Cmd::Stop,
        };
        let param = u16::from_be_bytes([p0, p1]);
        assert!(checksum_ok(&frame(cmd, param, false)));
    }
});

//! Peripheral wire protocols.
//!
//! Pure frame builders and decoders — no I/O — so they run under host
//! tests.  The adapters own the actual bus traffic.

pub mod dfplayer;

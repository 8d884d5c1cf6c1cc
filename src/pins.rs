//! Hardware pin map for the Swell lamp board.
//!
//! Kept in one place so a board revision is a single-file change.

/// White LED strip PWM output (wake phase).
pub const WHITE_LED: u8 = 12;

/// Yellow LED strip PWM output (sleep phase).
pub const YELLOW_LED: u8 = 14;

/// Aromatherapy diffuser relay.
pub const AROMA_RELAY: u8 = 4;

/// DFPlayer Mini RX (lamp TX side of UART2).
pub const DFPLAYER_RX: u8 = 16;

/// DFPlayer Mini TX (lamp RX side of UART2).
pub const DFPLAYER_TX: u8 = 17;

/// LED strip PWM frequency in Hz.
pub const LED_PWM_FREQ_HZ: u32 = 100;

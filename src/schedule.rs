//! Clock-of-day window math.
//!
//! Everything here works on minutes-since-midnight in `[0, 1440)` and is
//! wraparound-aware: a window that starts at 23:30 and runs for an hour
//! contains 23:45 and 00:15 but not 01:00.  One membership routine serves
//! both the sleep/wake phase test (duration derived from the configured end
//! time) and the fixed one-hour music window, so midnight handling lives in
//! exactly one place.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// The relax-music (and aromatherapy) window: first hour of the sleep phase.
pub const MUSIC_WINDOW_MINUTES: u16 = 60;

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

/// A wall-clock reading, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    /// Construct from hour/minute.  Returns `None` out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Minutes since midnight, in `[0, 1440)`.
    pub fn minutes(self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Parse an `"H:MM"` / `"HH:MM"` string as sent by the frontend.
    /// Returns `None` for anything malformed or out of range.
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        let hour: u8 = h.parse().ok()?;
        let minute: u8 = m.parse().ok()?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ---------------------------------------------------------------------------
// Window membership
// ---------------------------------------------------------------------------

/// Whether `current` lies inside the window starting at `start` and running
/// for `duration_minutes`, all in minutes since midnight.
///
/// The window end is `(start + duration) mod 1440`.  When the window crosses
/// midnight, membership is `current >= start || current < end`; otherwise
/// `current >= start && current < end`.  The start minute is inside the
/// window, the end minute is not.
pub fn in_window(current: u16, start: u16, duration_minutes: u16) -> bool {
    let end = (start + duration_minutes) % MINUTES_PER_DAY;
    if start + duration_minutes >= MINUTES_PER_DAY {
        current >= start || current < end
    } else {
        current >= start && current < end
    }
}

/// Minutes from `start` forward to `end` on the daily circle.
pub fn span_minutes(start: u16, end: u16) -> u16 {
    (end + MINUTES_PER_DAY - start) % MINUTES_PER_DAY
}

/// Whether `current` falls in the sleep phase of a timer running from
/// `start` to `end`.
///
/// `start == end` is a zero-length wake phase: the timer is defined to be in
/// the sleep phase for the entire day.
pub fn in_sleep_phase(current: u16, start: u16, end: u16) -> bool {
    let duration = match span_minutes(start, end) {
        0 => MINUTES_PER_DAY,
        d => d,
    };
    in_window(current, start, duration)
}

/// Minutes elapsed since `start`, walking forward across midnight if needed.
pub fn elapsed_since(current: u16, start: u16) -> u16 {
    if current >= start {
        current - start
    } else {
        (MINUTES_PER_DAY - start) + current
    }
}

//! Durable user settings.
//!
//! `UserSettings` is the single source of truth for what the user *wants*:
//! timer window, light intensity, which scenarios are enabled.  It says
//! nothing about what the hardware is currently doing — that lives in
//! [`ExecState`](crate::app::state::ExecState) and is rebuilt every tick.
//!
//! Loaded from NVS once at startup, written back synchronously after each
//! accepted command.  Nothing in the scheduling path mutates it: a window
//! closing or a playback cap expiring stops *execution* only, so the same
//! scenario re-arms on the next day's window without the user re-toggling.

use serde::{Deserialize, Serialize};

use crate::playlist;
use crate::schedule::TimeOfDay;

/// DFPlayer native volume ceiling.
pub const VOLUME_MAX: u8 = 30;

/// Everything the user has configured, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub timer: TimerSettings,
    pub light: LightSettings,
    pub aromatherapy: AromaSettings,
    pub alarm: AlarmSettings,
    pub music: MusicSettings,
}

/// Daily timer window.  `confirmed == false` keeps every dependent feature
/// inert regardless of the other flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub enabled: bool,
    pub confirmed: bool,
    /// Sleep phase begins here.
    pub start: TimeOfDay,
    /// Sleep phase ends (and the alarm fires) here.
    pub end: TimeOfDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSettings {
    /// Yellow-strip intensity for the sleep phase, percent 0–100.  Mapped to
    /// the actuator-native duty range at the adapter boundary, never stored
    /// pre-mapped.
    pub intensity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AromaSettings {
    pub enabled: bool,
}

/// The alarm track is fixed ([`playlist::ALARM_TRACK`]) and not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmSettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicSettings {
    pub enabled: bool,
    /// Relax track number, validated against the fixed catalog.
    pub track: u8,
    /// DFPlayer-native volume 0–30, derived from the user-facing percent.
    pub volume: u8,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            timer: TimerSettings {
                enabled: false,
                confirmed: false,
                start: TimeOfDay { hour: 21, minute: 0 },
                end: TimeOfDay { hour: 4, minute: 0 },
            },
            light: LightSettings { intensity: 50 },
            aromatherapy: AromaSettings { enabled: false },
            alarm: AlarmSettings { enabled: false },
            music: MusicSettings {
                enabled: false,
                track: 1,
                volume: 15,
            },
        }
    }
}

impl UserSettings {
    /// Repair out-of-range values after loading from storage.  Bad data is
    /// corrected silently, never rejected: an unknown track falls back to
    /// the first catalog entry, an impossible volume to the default.
    pub fn sanitize(&mut self) {
        self.music.track = playlist::valid_track_or_default(self.music.track);
        if self.music.volume > VOLUME_MAX {
            self.music.volume = 15;
        }
        if self.light.intensity > 100 {
            self.light.intensity = 50;
        }
    }
}

// ---------------------------------------------------------------------------
// Volume conversions (user-facing percent <-> DFPlayer native)
// ---------------------------------------------------------------------------

/// Convert a user-facing volume percent to the DFPlayer's 0–30 range,
/// rounding the percent to the nearest 10% first.
pub fn volume_from_percent(percent: u8) -> u8 {
    let percent = percent.min(100);
    let rounded = ((u16::from(percent) + 5) / 10 * 10).min(100);
    (rounded * u16::from(VOLUME_MAX) / 100) as u8
}

/// Convert a stored DFPlayer volume back to the user-facing percent.
pub fn volume_to_percent(native: u8) -> u8 {
    (u16::from(native.min(VOLUME_MAX)) * 100 / u16::from(VOLUME_MAX)) as u8
}

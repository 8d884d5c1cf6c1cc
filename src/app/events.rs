//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, broadcast to WebSocket
//! clients, etc.

use core::fmt::Write as _;

use serde::Serialize;

use crate::config::{volume_to_percent, UserSettings};
use crate::playlist::Track;

use super::state::{ExecState, TimerPhase};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The observable state changed (or a client asked for it).
    Status(StatusSnapshot),
    /// The fixed relax-track catalog, in response to `getPlaylist`.
    Playlist(&'static [Track]),
    /// The timer phase flipped between sleep and wake.
    PhaseChanged { from: TimerPhase, to: TimerPhase },
    /// The application service has started (carries initial phase).
    Started(TimerPhase),
}

// ---------------------------------------------------------------------------
// Status snapshot
// ---------------------------------------------------------------------------

/// A short-lived formatted time string ("HH:MM").
pub type TimeString = heapless::String<5>;

/// Everything a remote observer sees: the durable intent plus the live
/// execution flags.  Serializes to the wire shape the frontend consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub timer: TimerStatus,
    pub light: LightStatus,
    pub aromatherapy: ToggleStatus,
    pub alarm: ToggleStatus,
    pub music: MusicStatus,
    pub exec: ExecStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerStatus {
    pub on: bool,
    pub confirmed: bool,
    pub start: TimeString,
    pub end: TimeString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightStatus {
    pub intensity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleStatus {
    pub on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MusicStatus {
    pub on: bool,
    pub track: u8,
    /// User-facing percent, mapped back from the stored 0–30 device volume.
    pub volume: u8,
}

/// Live execution flags, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecStatus {
    pub phase: TimerPhase,
    pub music_window: bool,
    pub aroma_active: bool,
    pub music_active: bool,
    pub alarm_active: bool,
}

impl StatusSnapshot {
    /// Capture the observable state of one settings/execution pair.
    pub fn capture(settings: &UserSettings, exec: &ExecState) -> Self {
        let mut start = TimeString::new();
        let mut end = TimeString::new();
        // 5 bytes always hold "HH:MM".
        let _ = write!(start, "{}", settings.timer.start);
        let _ = write!(end, "{}", settings.timer.end);

        Self {
            timer: TimerStatus {
                on: settings.timer.enabled,
                confirmed: settings.timer.confirmed,
                start,
                end,
            },
            light: LightStatus {
                intensity: settings.light.intensity,
            },
            aromatherapy: ToggleStatus {
                on: settings.aromatherapy.enabled,
            },
            alarm: ToggleStatus {
                on: settings.alarm.enabled,
            },
            music: MusicStatus {
                on: settings.music.enabled,
                track: settings.music.track,
                volume: volume_to_percent(settings.music.volume),
            },
            exec: ExecStatus {
                phase: exec.phase,
                music_window: exec.in_music_window,
                aroma_active: exec.aroma_active(),
                music_active: exec.music_active,
                alarm_active: exec.alarm_active,
            },
        }
    }
}

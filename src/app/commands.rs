//! Inbound commands to the application service.
//!
//! The frontend speaks JSON messages of the shape
//! `{"command": "music-volume", "value": 70}` over the WebSocket transport.
//! This module turns raw message text into a typed [`Command`] for the
//! [`AppService`](super::service::AppService).  Transport and session
//! handling live outside the core; only the message meaning is modelled
//! here.
//!
//! Parsing is deliberately forgiving in one direction only: a message that
//! does not name a known command, or whose value has the wrong shape, is
//! dropped (`None`) with no error surfaced.  Range problems inside a
//! well-formed command (a volume of 300, an unknown track) are *not*
//! protocol errors — the service corrects those silently.

use serde_json::Value;

use crate::schedule::TimeOfDay;

/// Commands the outside world can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Arm or disarm the daily timer.  Disarming clears the confirmation.
    TimerToggle(bool),
    /// Confirm the timer window.  Fields that failed to parse are `None`
    /// and leave the previously stored time untouched.
    TimerConfirm {
        start: Option<TimeOfDay>,
        end: Option<TimeOfDay>,
    },
    /// Sleep-phase light intensity, percent.
    LightIntensity(u8),
    AromaToggle(bool),
    AlarmToggle(bool),
    MusicToggle(bool),
    /// Select a relax track (validated against the catalog by the service).
    MusicTrack(u8),
    /// User-facing volume percent 0–100.
    MusicVolume(u8),
    /// Read-only: emit the current status snapshot.
    GetStatus,
    /// Read-only: emit the fixed track catalog.
    GetPlaylist,
}

impl Command {
    /// Parse one raw inbound message.  Returns `None` for anything
    /// malformed — such messages are dropped silently, with no state change
    /// and no response.
    pub fn parse(raw: &str) -> Option<Self> {
        let doc: Value = serde_json::from_str(raw).ok()?;
        let command = doc.get("command")?.as_str()?;
        let value = doc.get("value");

        match command {
            "getStatus" => Some(Self::GetStatus),
            "getPlaylist" => Some(Self::GetPlaylist),
            "timer-toggle" => Some(Self::TimerToggle(value?.as_bool()?)),
            "timer-confirm" => {
                let v = value?;
                Some(Self::TimerConfirm {
                    start: v.get("start").and_then(Value::as_str).and_then(TimeOfDay::parse),
                    end: v.get("end").and_then(Value::as_str).and_then(TimeOfDay::parse),
                })
            }
            "light-intensity" => Some(Self::LightIntensity(as_u8(value?)?)),
            "aroma-toggle" => Some(Self::AromaToggle(value?.as_bool()?)),
            "alarm-toggle" => Some(Self::AlarmToggle(value?.as_bool()?)),
            "music-toggle" => Some(Self::MusicToggle(value?.as_bool()?)),
            "music-track" => Some(Self::MusicTrack(as_u8(value?)?)),
            "music-volume" => Some(Self::MusicVolume(as_u8(value?)?)),
            _ => None,
        }
    }
}

/// Coerce a JSON number to `u8`, saturating rather than rejecting values
/// past 255 — out-of-range is a configuration problem, not a protocol one.
fn as_u8(v: &Value) -> Option<u8> {
    let n = v.as_u64()?;
    Some(n.min(u64::from(u8::MAX)) as u8)
}

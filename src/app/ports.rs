//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (clock, audio player, light PWM, relay, storage, event
//! sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics, so
//! the reconciliation logic never touches hardware directly and runs
//! unchanged under the integration-test mocks.

use crate::config::UserSettings;
use crate::schedule::TimeOfDay;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: RTC / monotonic timer → domain)
// ───────────────────────────────────────────────────────────────

/// Time source for the reconciliation engine.
///
/// Wall-clock time drives window membership; monotonic uptime drives every
/// duration check (spray length, cooldown, grace period, playback cap,
/// alarm duration).  Durations are always recomputed from absolute
/// timestamps, so tick jitter cannot accumulate into drift.
pub trait ClockPort {
    /// Current wall-clock time of day.
    fn wall_time(&mut self) -> Result<TimeOfDay, ClockError>;

    /// Milliseconds since boot (monotonic).
    fn uptime_ms(&mut self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// LED strip channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightChannel {
    /// Full-brightness wake light.
    White,
    /// Dimmable sleep light.
    Yellow,
}

/// Write-side port for the two LED strips.  `percent` is 0–100; the adapter
/// owns the mapping to the actuator-native duty range.
pub trait LightPort {
    fn set_channel(&mut self, channel: LightChannel, percent: u8);
}

/// Write-side port for the aromatherapy diffuser relay.
pub trait SprayPort {
    fn set_active(&mut self, on: bool);
}

/// Write-side port for the audio player.
///
/// `is_ready` reports whether the device initialised successfully at boot
/// (bounded retries).  It latches for the whole session: no mid-session
/// re-initialisation is attempted, and callers must skip playback commands
/// while it is `false`.
pub trait AudioPort {
    /// Start the given track from the beginning.  No repeat.
    fn play(&mut self, track: u8);

    /// Stop playback.
    fn stop(&mut self);

    /// Set the device volume (0–30).
    fn set_volume(&mut self, volume: u8);

    /// Whether the device is usable this session.
    fn is_ready(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Settings port (driven adapter: domain ↔ persistent storage)
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`UserSettings`].
///
/// Implementations sanitize on load (out-of-range values are corrected, not
/// rejected) and write atomically.  `NotFound` on first boot is expected —
/// callers fall back to [`UserSettings::default`].
pub trait SettingsPort {
    fn load(&self) -> Result<UserSettings, SettingsError>;
    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / transport)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, WebSocket
/// broadcast, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ClockPort::wall_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The RTC did not answer on the bus.
    ReadFailed,
    /// The RTC answered with an impossible time.
    Invalid,
}

/// Errors from [`SettingsPort`] operations.
#[derive(Debug)]
pub enum SettingsError {
    /// No settings blob in storage (first boot).
    NotFound,
    /// Stored blob failed to decode.
    Corrupted,
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "clock read failed"),
            Self::Invalid => write!(f, "clock reading invalid"),
        }
    }
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "settings not found"),
            Self::Corrupted => write!(f, "settings corrupted"),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

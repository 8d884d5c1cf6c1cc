//! Ephemeral execution state, rebuilt from live signals each tick.
//!
//! `ExecState` is the blackboard the controllers read from and write to.
//! It records what the hardware is *currently doing* — as distinct from
//! [`UserSettings`](crate::config::UserSettings), which records what the
//! user *wants*.  It is constructed at rest on process start, never
//! persisted, and meaningless across restarts.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Timer phase
// ---------------------------------------------------------------------------

/// Which half of the daily timer window the clock currently falls in.
/// Exactly one value holds per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Timer not confirmed — nothing is evaluated.
    Inactive,
    /// Configured start → end: yellow light, music window, aromatherapy.
    Sleep,
    /// The complement: white light, alarm trigger at the boundary.
    Wake,
}

// ---------------------------------------------------------------------------
// Spray cycle
// ---------------------------------------------------------------------------

/// Aromatherapy spray cycle position.  Timestamps are monotonic
/// milliseconds; every duration check recomputes elapsed time from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SprayState {
    /// Relay low, no cycle bookkeeping.  The first transition out of `Idle`
    /// sprays immediately.
    #[default]
    Idle,
    /// Relay high since `since_ms`; lasts 5 s.
    Spraying { since_ms: u64 },
    /// Relay low since `since_ms` (end of the previous spray); the next
    /// spray waits out the 300 s cooldown.
    Cooldown { since_ms: u64 },
}

// ---------------------------------------------------------------------------
// Music timing
// ---------------------------------------------------------------------------

/// Playback timestamps for the grace period and the one-hour cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MusicTiming {
    /// When playback started.  The 3600 s cap is measured from here — from
    /// the moment playback started, not from the window start.
    pub started_at_ms: Option<u64>,
    /// Window-exit stops are suppressed until this instant to avoid
    /// start/stop flapping around the window boundary.  Never masks an
    /// explicit user disable.
    pub grace_until_ms: Option<u64>,
}

impl MusicTiming {
    pub fn clear(&mut self) {
        self.started_at_ms = None;
        self.grace_until_ms = None;
    }
}

// ---------------------------------------------------------------------------
// ExecState
// ---------------------------------------------------------------------------

/// The full per-tick execution picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecState {
    /// Phase of the daily timer at the last evaluation.
    pub phase: TimerPhase,
    /// True during the first 60 minutes of the sleep phase, measured from
    /// `timer.start`.  Strict subset of the sleep phase.
    pub in_music_window: bool,
    /// Relax playback is currently driven.
    pub music_active: bool,
    /// The alarm track is currently driven.  Mutually exclusive with relax
    /// playback; the alarm preempts.
    pub alarm_active: bool,
    /// Spray cycle position.
    pub spray: SprayState,
    /// Playback timestamps.
    pub music: MusicTiming,
    /// When the running alarm must stop.
    pub alarm_deadline_ms: Option<u64>,
}

impl Default for ExecState {
    fn default() -> Self {
        Self {
            phase: TimerPhase::Inactive,
            in_music_window: false,
            music_active: false,
            alarm_active: false,
            spray: SprayState::Idle,
            music: MusicTiming::default(),
            alarm_deadline_ms: None,
        }
    }
}

impl ExecState {
    /// Whether the diffuser relay is currently being driven.
    pub fn aroma_active(&self) -> bool {
        matches!(self.spray, SprayState::Spraying { .. })
    }
}

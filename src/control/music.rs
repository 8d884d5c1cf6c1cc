//! Relax-music playback control.
//!
//! Playback runs while the user wants it, the clock is inside the music
//! window, and the session has not hit the one-hour cap.  The cap is
//! measured from the moment playback started — not from the window start —
//! so music toggled on twenty minutes into the window still gets its full
//! hour (bounded by the window-exit stop).
//!
//! A 5-second grace period after each start masks window-exit stops only:
//! it absorbs boundary flapping when the window edge and the evaluation
//! race within the same tick, but an explicit user disable always stops
//! playback immediately.

use log::{info, warn};

use crate::app::ports::AudioPort;
use crate::app::state::ExecState;
use crate::config::UserSettings;

/// Hard cap on one playback session.
pub const MAX_PLAY_MS: u64 = 3_600_000;

/// Window-exit stops are suppressed for this long after a start.
pub const GRACE_MS: u64 = 5_000;

/// Advance playback by one evaluation.  Inert while the alarm is sounding.
pub fn drive(
    settings: &UserSettings,
    exec: &mut ExecState,
    now_ms: u64,
    audio: &mut impl AudioPort,
) {
    if exec.alarm_active {
        return;
    }

    let cap_expired = exec
        .music
        .started_at_ms
        .is_some_and(|t| now_ms.saturating_sub(t) >= MAX_PLAY_MS);
    let should_play = settings.music.enabled && exec.in_music_window && !cap_expired;

    if should_play && !exec.music_active {
        start(settings, exec, now_ms, audio);
    } else if !should_play && exec.music_active {
        let in_grace = exec.music.grace_until_ms.is_some_and(|g| now_ms < g);
        // Grace masks window-exit only; a withdrawn toggle stops at once.
        // (The cap cannot expire inside its own grace window.)
        if in_grace && settings.music.enabled && !cap_expired {
            return;
        }

        audio.stop();
        exec.music_active = false;
        exec.music.grace_until_ms = None;
        if cap_expired {
            // Keep `started_at_ms`: the expired cap latches playback off
            // for the remainder of this activation.
            info!("music: one-hour cap reached, playback stopped");
        } else {
            exec.music.started_at_ms = None;
            if settings.music.enabled {
                info!("music: window closed, playback stopped");
            } else {
                info!("music: stopped on user request");
            }
        }
    }

    // The cap latch holds only while intent and window both persist; once
    // either goes away the next activation starts with a fresh hour.
    if !exec.music_active
        && exec.music.started_at_ms.is_some()
        && (!settings.music.enabled || !exec.in_music_window)
    {
        exec.music.clear();
    }
}

/// Restart playback after the alarm released the audio device.
///
/// A fresh activation: new start timestamp (the cap restarts), new grace
/// period, stored volume and track re-applied.  The normal stop logic takes
/// over on the following ticks if the window is already closed.
pub fn resume_after_alarm(
    settings: &UserSettings,
    exec: &mut ExecState,
    now_ms: u64,
    audio: &mut impl AudioPort,
) {
    if settings.music.enabled && !exec.music_active {
        info!("music: resuming after alarm");
        start(settings, exec, now_ms, audio);
    }
}

fn start(settings: &UserSettings, exec: &mut ExecState, now_ms: u64, audio: &mut impl AudioPort) {
    if !audio.is_ready() {
        warn!("music: audio device unavailable, playback skipped");
        return;
    }
    audio.set_volume(settings.music.volume);
    audio.play(settings.music.track);
    exec.music.started_at_ms = Some(now_ms);
    exec.music.grace_until_ms = Some(now_ms + GRACE_MS);
    exec.music_active = true;
    info!(
        "music: playing track {} at volume {}/30",
        settings.music.track, settings.music.volume
    );
}

//! Wake-up alarm.
//!
//! Fires at the timer end time, plays the fixed alarm track at full volume
//! for five minutes, then releases the audio device back to the music
//! controller.  The trigger is edge-checked once per tick against the
//! wall-clock minute; relax playback in progress suppresses it entirely.

use log::{info, warn};

use crate::app::ports::AudioPort;
use crate::app::state::ExecState;
use crate::config::{UserSettings, VOLUME_MAX};
use crate::playlist::ALARM_TRACK;
use crate::schedule::TimeOfDay;

/// How long the alarm sounds.
pub const ALARM_DURATION_MS: u64 = 300_000;

/// Advance the alarm by one evaluation.
///
/// Returns `true` exactly on the tick the alarm finished, so the
/// orchestrator can run the music resume path.
pub fn drive(
    settings: &UserSettings,
    exec: &mut ExecState,
    now: TimeOfDay,
    now_ms: u64,
    audio: &mut impl AudioPort,
) -> bool {
    if exec.alarm_active {
        if exec.alarm_deadline_ms.is_some_and(|d| now_ms >= d) {
            audio.stop();
            exec.alarm_active = false;
            exec.alarm_deadline_ms = None;
            info!("alarm: five minutes elapsed, stopping");
            return true;
        }
        return false;
    }

    let due = settings.alarm.enabled
        && !exec.music_active
        && now.hour == settings.timer.end.hour
        && now.minute == settings.timer.end.minute;

    if due {
        if audio.is_ready() {
            audio.set_volume(VOLUME_MAX);
            audio.play(ALARM_TRACK);
            exec.alarm_active = true;
            exec.alarm_deadline_ms = Some(now_ms + ALARM_DURATION_MS);
            info!("alarm: wake time {}, sounding track {}", now, ALARM_TRACK);
        } else {
            // An alarm that cannot sound must not mark itself active — that
            // would block future attempts and falsely preempt music.
            warn!("alarm: due but audio device unavailable, skipping");
        }
    }

    false
}

//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the durable [`UserSettings`] and the ephemeral
//! [`ExecState`] (the explicit context object — no process-wide statics)
//! and reconciles them against the clock once per tick.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!   ClockPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │        AppService          │
//!   Command  ──▶  │  phase · aroma · music ·   │
//!                 │  alarm reconciliation      │
//!   LightPort ◀───│                            │──▶ SettingsPort
//!   SprayPort ◀───┤                            │
//!   AudioPort ◀───└────────────────────────────┘
//! ```
//!
//! Inbound commands run to completion between ticks: validate → mutate
//! settings → persist → reconcile once out of band → broadcast.  A client
//! therefore observes the effect of its own command before the next
//! periodic broadcast.

use log::{info, warn};

use crate::config::{volume_from_percent, UserSettings};
use crate::control::{alarm, aroma, music};
use crate::playlist;
use crate::schedule::{self, MUSIC_WINDOW_MINUTES};

use super::commands::Command;
use super::events::{AppEvent, StatusSnapshot};
use super::ports::{
    AudioPort, ClockPort, EventSink, LightChannel, LightPort, SettingsPort, SprayPort,
};
use super::state::{ExecState, TimerPhase};

/// White-strip level during the wake phase.
const WAKE_LIGHT_PERCENT: u8 = 100;

/// The application service orchestrates the reconciliation engine.
pub struct AppService {
    settings: UserSettings,
    exec: ExecState,
    /// Snapshot last handed to the sink; change detection baseline.
    last_emitted: Option<StatusSnapshot>,
}

impl AppService {
    /// Construct the service around loaded (or default) settings.
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings,
            exec: ExecState::default(),
            last_emitted: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup.  The first `tick` establishes the real phase.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.exec.phase));
        info!(
            "service started (timer {}, confirmed: {})",
            if self.settings.timer.enabled { "on" } else { "off" },
            self.settings.timer.confirmed
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one reconciliation pass and notify observers if anything they
    /// can see has changed.
    ///
    /// The `hw` parameter satisfies all three actuator ports — this avoids
    /// a triple mutable borrow while keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        clock: &mut impl ClockPort,
        hw: &mut (impl LightPort + SprayPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        self.reconcile(clock, hw, sink);
        self.emit_if_changed(sink);
    }

    fn reconcile(
        &mut self,
        clock: &mut impl ClockPort,
        hw: &mut (impl LightPort + SprayPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        // 1. Unconfirmed timer: everything inert, nothing evaluated.
        if !self.settings.timer.confirmed {
            self.quiesce(hw);
            return;
        }

        // 2. Read the clock; a failed read changes nothing this tick.
        let now = match clock.wall_time() {
            Ok(t) => t,
            Err(e) => {
                warn!("clock read failed ({e}), skipping this evaluation");
                return;
            }
        };
        let now_ms = clock.uptime_ms();

        let current = now.minutes();
        let start = self.settings.timer.start.minutes();
        let end = self.settings.timer.end.minutes();

        let prev_phase = self.exec.phase;
        let sleeping = schedule::in_sleep_phase(current, start, end);
        self.exec.phase = if sleeping { TimerPhase::Sleep } else { TimerPhase::Wake };
        // The music window is a strict subset of the sleep phase.
        self.exec.in_music_window =
            sleeping && schedule::in_window(current, start, MUSIC_WINDOW_MINUTES);

        // 3. Adaptive lighting.
        if sleeping {
            hw.set_channel(LightChannel::Yellow, self.settings.light.intensity);
            hw.set_channel(LightChannel::White, 0);
        } else {
            hw.set_channel(LightChannel::White, WAKE_LIGHT_PERCENT);
            hw.set_channel(LightChannel::Yellow, 0);
        }

        // 4–6. Feature controllers.
        aroma::drive(&self.settings, &mut self.exec, now_ms, hw);
        music::drive(&self.settings, &mut self.exec, now_ms, hw);
        if alarm::drive(&self.settings, &mut self.exec, now, now_ms, hw) {
            music::resume_after_alarm(&self.settings, &mut self.exec, now_ms, hw);
        }

        if self.exec.phase != prev_phase {
            sink.emit(&AppEvent::PhaseChanged {
                from: prev_phase,
                to: self.exec.phase,
            });
        }
    }

    /// Force every actuator to its inert state and reset execution.
    fn quiesce(&mut self, hw: &mut (impl LightPort + SprayPort + AudioPort)) {
        hw.set_channel(LightChannel::White, 0);
        hw.set_channel(LightChannel::Yellow, 0);
        if self.exec.aroma_active() {
            hw.set_active(false);
        }
        if self.exec.music_active || self.exec.alarm_active {
            hw.stop();
        }
        self.exec = ExecState::default();
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one inbound command to completion.
    ///
    /// Mutating commands persist the settings, reconcile once out of band,
    /// and broadcast the new state unconditionally.  Commands arriving
    /// while the timer is unconfirmed (other than the timer commands and
    /// read-only queries) are accepted but ignored, with no error surfaced.
    pub fn handle_command(
        &mut self,
        cmd: Command,
        clock: &mut impl ClockPort,
        hw: &mut (impl LightPort + SprayPort + AudioPort),
        store: &impl SettingsPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::GetStatus => {
                self.broadcast(sink);
                return;
            }
            Command::GetPlaylist => {
                sink.emit(&AppEvent::Playlist(playlist::RELAX_PLAYLIST));
                return;
            }
            _ => {}
        }

        if !self.apply(cmd, hw) {
            return;
        }

        if let Err(e) = store.save(&self.settings) {
            warn!("settings save failed: {e}");
        }
        self.reconcile(clock, hw, sink);
        self.broadcast(sink);
    }

    /// Mutate settings per command.  Returns whether anything was accepted.
    fn apply(&mut self, cmd: Command, hw: &mut impl AudioPort) -> bool {
        match cmd {
            Command::TimerToggle(on) => {
                self.settings.timer.enabled = on;
                if !on {
                    // Disarming also drops the confirmation; the next
                    // reconcile pass quiesces every actuator, including a
                    // spray in progress.
                    self.settings.timer.confirmed = false;
                }
                info!("timer {}", if on { "armed" } else { "disarmed" });
                true
            }
            Command::TimerConfirm { start, end } => {
                if !self.settings.timer.enabled {
                    info!("timer-confirm ignored, timer not armed");
                    return false;
                }
                // Unparseable fields keep the previously stored time.
                if let Some(s) = start {
                    self.settings.timer.start = s;
                }
                if let Some(e) = end {
                    self.settings.timer.end = e;
                }
                self.settings.timer.confirmed = true;
                info!(
                    "timer confirmed: {} -> {}",
                    self.settings.timer.start, self.settings.timer.end
                );
                true
            }
            _ if !self.settings.timer.confirmed => {
                info!("command ignored, timer not confirmed");
                false
            }
            Command::LightIntensity(percent) => {
                self.settings.light.intensity = percent.min(100);
                info!("light intensity: {}%", self.settings.light.intensity);
                true
            }
            Command::AromaToggle(on) => {
                self.settings.aromatherapy.enabled = on;
                info!("aromatherapy {}", if on { "enabled" } else { "disabled" });
                true
            }
            Command::AlarmToggle(on) => {
                self.settings.alarm.enabled = on;
                info!("alarm {}", if on { "enabled" } else { "disabled" });
                true
            }
            Command::MusicToggle(on) => {
                self.settings.music.enabled = on;
                info!("music {}", if on { "enabled" } else { "disabled" });
                true
            }
            Command::MusicTrack(requested) => {
                let track = playlist::valid_track_or_default(requested);
                self.settings.music.track = track;
                // Live track switch; the cap keeps running from the
                // original start.
                if self.exec.music_active && hw.is_ready() {
                    hw.play(track);
                }
                info!("music track: {}", track);
                true
            }
            Command::MusicVolume(percent) => {
                let volume = volume_from_percent(percent);
                self.settings.music.volume = volume;
                if self.exec.music_active && hw.is_ready() {
                    hw.set_volume(volume);
                }
                info!("music volume: {}% ({}/30)", percent.min(100), volume);
                true
            }
            // Read-only queries are dispatched before `apply`; nothing to do.
            Command::GetStatus | Command::GetPlaylist => false,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Capture the current observable state.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::capture(&self.settings, &self.exec)
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn exec(&self) -> &ExecState {
        &self.exec
    }

    // ── Notification ──────────────────────────────────────────

    fn emit_if_changed(&mut self, sink: &mut impl EventSink) {
        let snap = self.snapshot();
        if self.last_emitted.as_ref() != Some(&snap) {
            sink.emit(&AppEvent::Status(snap.clone()));
            self.last_emitted = Some(snap);
        }
    }

    /// Emit the current snapshot regardless of the change baseline.
    pub fn broadcast(&mut self, sink: &mut impl EventSink) {
        let snap = self.snapshot();
        sink.emit(&AppEvent::Status(snap.clone()));
        self.last_emitted = Some(snap);
    }
}

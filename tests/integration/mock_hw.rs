//! Mock adapters for integration tests.
//!
//! The hardware mock records every actuator call so tests can assert on
//! the full command history without touching real GPIO/PWM/UART.

use std::cell::RefCell;

use swell::app::events::{AppEvent, StatusSnapshot};
use swell::app::ports::{
    AudioPort, ClockError, ClockPort, EventSink, LightChannel, LightPort, SettingsError,
    SettingsPort, SprayPort,
};
use swell::config::UserSettings;
use swell::schedule::TimeOfDay;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Light { channel: LightChannel, percent: u8 },
    Relay(bool),
    Play(u8),
    Stop,
    Volume(u8),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub audio_ready: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            audio_ready: true,
        }
    }

    /// Most recent level commanded on `channel`.
    pub fn light_level(&self, channel: LightChannel) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Light { channel: ch, percent } if *ch == channel => Some(*percent),
            _ => None,
        })
    }

    /// Whether the diffuser relay is currently high.
    pub fn relay_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Relay(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Track currently playing, if the last transport command was a play.
    pub fn playing(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Play(track) => Some(*track),
            ActuatorCall::Stop => None,
            _ => None,
        })
    }

    /// Most recent volume command.
    pub fn volume(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Volume(v) => Some(*v),
            _ => None,
        })
    }

    /// Transport-only view of the call history (play/stop/volume).
    pub fn audio_calls(&self) -> Vec<ActuatorCall> {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    ActuatorCall::Play(_) | ActuatorCall::Stop | ActuatorCall::Volume(_)
                )
            })
            .copied()
            .collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl LightPort for MockHardware {
    fn set_channel(&mut self, channel: LightChannel, percent: u8) {
        self.calls.push(ActuatorCall::Light { channel, percent });
    }
}

impl SprayPort for MockHardware {
    fn set_active(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Relay(on));
    }
}

impl AudioPort for MockHardware {
    fn play(&mut self, track: u8) {
        self.calls.push(ActuatorCall::Play(track));
    }

    fn stop(&mut self) {
        self.calls.push(ActuatorCall::Stop);
    }

    fn set_volume(&mut self, volume: u8) {
        self.calls.push(ActuatorCall::Volume(volume));
    }

    fn is_ready(&self) -> bool {
        self.audio_ready
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    pub time: Result<TimeOfDay, ClockError>,
    pub uptime_ms: u64,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(hour: u8, minute: u8) -> Self {
        Self {
            time: Ok(TimeOfDay { hour, minute }),
            uptime_ms: 0,
        }
    }

    pub fn set_time(&mut self, hour: u8, minute: u8) {
        self.time = Ok(TimeOfDay { hour, minute });
    }

    pub fn advance_secs(&mut self, secs: u64) {
        self.uptime_ms += secs * 1_000;
    }
}

impl ClockPort for MockClock {
    fn wall_time(&mut self) -> Result<TimeOfDay, ClockError> {
        self.time
    }

    fn uptime_ms(&mut self) -> u64 {
        self.uptime_ms
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// Records every save; loads report first boot.
pub struct MockStore {
    pub saved: RefCell<Vec<UserSettings>>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self {
            saved: RefCell::new(Vec::new()),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved.borrow().len()
    }

    pub fn last_saved(&self) -> Option<UserSettings> {
        self.saved.borrow().last().cloned()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsPort for MockStore {
    fn load(&self) -> Result<UserSettings, SettingsError> {
        Err(SettingsError::NotFound)
    }

    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        self.saved.borrow_mut().push(settings.clone());
        Ok(())
    }
}

// ── CollectSink ───────────────────────────────────────────────

pub struct CollectSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl CollectSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn last_status(&self) -> Option<StatusSnapshot> {
        self.events.iter().rev().find_map(|e| match e {
            AppEvent::Status(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn status_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Status(_)))
            .count()
    }
}

impl Default for CollectSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for CollectSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

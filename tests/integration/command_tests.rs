//! Inbound command handling: validation, persistence, out-of-band
//! reconciliation, and broadcast behavior.

use crate::mock_hw::{ActuatorCall, CollectSink, MockClock, MockHardware, MockStore};

use swell::app::commands::Command;
use swell::app::events::AppEvent;
use swell::app::service::AppService;
use swell::config::UserSettings;
use swell::schedule::TimeOfDay;

fn confirmed_settings() -> UserSettings {
    let mut s = UserSettings::default();
    s.timer.enabled = true;
    s.timer.confirmed = true;
    s
}

struct Rig {
    svc: AppService,
    hw: MockHardware,
    clock: MockClock,
    store: MockStore,
    sink: CollectSink,
}

impl Rig {
    fn new(settings: UserSettings, hour: u8, minute: u8) -> Self {
        Self {
            svc: AppService::new(settings),
            hw: MockHardware::new(),
            clock: MockClock::at(hour, minute),
            store: MockStore::new(),
            sink: CollectSink::new(),
        }
    }

    fn send(&mut self, cmd: Command) {
        self.svc
            .handle_command(cmd, &mut self.clock, &mut self.hw, &self.store, &mut self.sink);
    }

    fn tick(&mut self) {
        self.svc.tick(&mut self.clock, &mut self.hw, &mut self.sink);
    }
}

// ── Confirmation gating ───────────────────────────────────────

#[test]
fn feature_commands_before_confirmation_are_silently_ignored() {
    let mut settings = UserSettings::default();
    settings.timer.enabled = true; // armed but not confirmed
    let mut rig = Rig::new(settings, 12, 0);

    rig.send(Command::AromaToggle(true));
    rig.send(Command::MusicToggle(true));
    rig.send(Command::LightIntensity(80));

    assert!(!rig.svc.settings().aromatherapy.enabled);
    assert!(!rig.svc.settings().music.enabled);
    assert_eq!(rig.svc.settings().light.intensity, 50);
    assert_eq!(rig.store.save_count(), 0, "ignored commands must not persist");
    assert_eq!(rig.sink.status_count(), 0, "ignored commands must not broadcast");
}

#[test]
fn timer_confirm_requires_an_armed_timer() {
    let mut rig = Rig::new(UserSettings::default(), 12, 0);
    rig.send(Command::TimerConfirm {
        start: TimeOfDay::parse("20:00"),
        end: TimeOfDay::parse("05:00"),
    });
    assert!(!rig.svc.settings().timer.confirmed);
    assert_eq!(rig.store.save_count(), 0);
}

#[test]
fn arm_then_confirm_sets_the_window_and_persists() {
    let mut rig = Rig::new(UserSettings::default(), 12, 0);

    rig.send(Command::TimerToggle(true));
    rig.send(Command::TimerConfirm {
        start: TimeOfDay::parse("20:30"),
        end: TimeOfDay::parse("05:15"),
    });

    let s = rig.svc.settings();
    assert!(s.timer.enabled && s.timer.confirmed);
    assert_eq!(s.timer.start.to_string(), "20:30");
    assert_eq!(s.timer.end.to_string(), "05:15");
    assert_eq!(rig.store.save_count(), 2);
    // The client observes its own command's effect.
    let last = rig.sink.last_status().unwrap();
    assert!(last.timer.confirmed);
    assert_eq!(last.timer.start.as_str(), "20:30");
}

#[test]
fn unparseable_confirm_times_keep_the_stored_window() {
    let mut rig = Rig::new(UserSettings::default(), 12, 0);
    rig.send(Command::TimerToggle(true));
    rig.send(Command::TimerConfirm {
        start: None, // e.g. "25:99" failed to parse at the boundary
        end: TimeOfDay::parse("06:00"),
    });

    let s = rig.svc.settings();
    assert!(s.timer.confirmed);
    assert_eq!(s.timer.start.to_string(), "21:00", "default retained");
    assert_eq!(s.timer.end.to_string(), "06:00");
}

// ── Immediate effect of mutations ─────────────────────────────

#[test]
fn music_toggle_inside_the_window_starts_playback_at_once() {
    let mut rig = Rig::new(confirmed_settings(), 21, 10);
    rig.tick(); // establish phase

    rig.send(Command::MusicToggle(true));
    assert!(rig.svc.exec().music_active);
    assert_eq!(rig.hw.playing(), Some(1));
    let last = rig.sink.last_status().unwrap();
    assert!(last.music.on && last.exec.music_active);
}

#[test]
fn music_toggle_outside_the_window_only_records_intent() {
    let mut rig = Rig::new(confirmed_settings(), 12, 0);
    rig.tick();

    rig.send(Command::MusicToggle(true));
    assert!(rig.svc.settings().music.enabled);
    assert!(!rig.svc.exec().music_active);
    assert!(rig.hw.playing().is_none());
}

#[test]
fn disabling_music_stops_playback_immediately() {
    let mut rig = Rig::new(confirmed_settings(), 21, 10);
    rig.tick();
    rig.send(Command::MusicToggle(true));
    assert!(rig.svc.exec().music_active);

    // Still inside the fresh activation's grace window — an explicit
    // disable must not be masked.
    rig.send(Command::MusicToggle(false));
    assert!(!rig.svc.exec().music_active);
    assert_eq!(rig.hw.audio_calls().last(), Some(&ActuatorCall::Stop));
}

// ── Track and volume ──────────────────────────────────────────

#[test]
fn invalid_track_falls_back_to_the_first_catalog_entry() {
    let mut rig = Rig::new(confirmed_settings(), 12, 0);
    rig.send(Command::MusicTrack(5)); // alarm slot
    assert_eq!(rig.svc.settings().music.track, 1);
    rig.send(Command::MusicTrack(42));
    assert_eq!(rig.svc.settings().music.track, 1);
    rig.send(Command::MusicTrack(7));
    assert_eq!(rig.svc.settings().music.track, 7);
}

#[test]
fn volume_percent_is_rounded_and_mapped_to_device_range() {
    let mut rig = Rig::new(confirmed_settings(), 12, 0);
    rig.send(Command::MusicVolume(75)); // rounds to 80% -> 24/30
    assert_eq!(rig.svc.settings().music.volume, 24);
    let last = rig.sink.last_status().unwrap();
    assert_eq!(last.music.volume, 80);
}

#[test]
fn live_track_change_reissues_play_without_resetting_the_cap() {
    let mut rig = Rig::new(confirmed_settings(), 21, 0);
    rig.tick();
    rig.send(Command::MusicToggle(true)); // playback starts at uptime 0

    rig.clock.set_time(21, 30);
    rig.clock.advance_secs(1_800);
    rig.send(Command::MusicTrack(4));
    assert_eq!(rig.hw.playing(), Some(4), "track switch is immediate");
    assert!(rig.svc.exec().music_active);

    // The cap still counts from the original start: 3600 s after the
    // toggle, not after the track change.
    rig.clock.set_time(21, 59);
    rig.clock.advance_secs(1_800);
    rig.tick();
    assert!(!rig.svc.exec().music_active, "cap unchanged by track switch");
}

#[test]
fn live_volume_change_reissues_volume() {
    let mut rig = Rig::new(confirmed_settings(), 21, 10);
    rig.tick();
    rig.send(Command::MusicToggle(true));

    rig.send(Command::MusicVolume(100));
    assert_eq!(rig.hw.volume(), Some(30));
    assert!(rig.svc.exec().music_active);
}

// ── Timer disarm ──────────────────────────────────────────────

#[test]
fn disarming_the_timer_quiesces_everything() {
    let mut settings = confirmed_settings();
    settings.aromatherapy.enabled = true;
    settings.music.enabled = true;
    let mut rig = Rig::new(settings, 21, 10);
    rig.tick();
    assert!(rig.svc.exec().music_active);
    assert!(rig.svc.exec().aroma_active());

    rig.send(Command::TimerToggle(false));

    let s = rig.svc.settings();
    assert!(!s.timer.enabled && !s.timer.confirmed);
    assert!(!rig.svc.exec().music_active);
    assert!(!rig.svc.exec().aroma_active());
    assert!(!rig.hw.relay_on());
    assert_eq!(rig.hw.audio_calls().last(), Some(&ActuatorCall::Stop));
    let last = rig.sink.last_status().unwrap();
    assert!(!last.timer.on && !last.timer.confirmed);
}

// ── Read-only queries ─────────────────────────────────────────

#[test]
fn get_status_broadcasts_without_persisting() {
    let mut rig = Rig::new(confirmed_settings(), 12, 0);
    rig.send(Command::GetStatus);
    assert_eq!(rig.sink.status_count(), 1);
    assert_eq!(rig.store.save_count(), 0);
}

#[test]
fn get_playlist_emits_the_fixed_catalog() {
    let mut rig = Rig::new(UserSettings::default(), 12, 0);
    rig.send(Command::GetPlaylist);
    let playlist = rig.sink.events.iter().find_map(|e| match e {
        AppEvent::Playlist(tracks) => Some(*tracks),
        _ => None,
    });
    let tracks = playlist.expect("playlist event");
    assert_eq!(tracks.len(), 7);
    assert!(tracks.iter().all(|t| t.number != 5));
}

#[test]
fn accepted_mutations_always_persist_and_broadcast() {
    let mut rig = Rig::new(confirmed_settings(), 12, 0);
    rig.send(Command::LightIntensity(80));
    assert_eq!(rig.store.save_count(), 1);
    assert_eq!(rig.store.last_saved().unwrap().light.intensity, 80);
    assert_eq!(rig.sink.last_status().unwrap().light.intensity, 80);
}

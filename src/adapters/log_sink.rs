//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).  The WebSocket broadcaster
//! in the firmware binary implements the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(s) => {
                info!(
                    "STATUS | timer={}/{} {}-{} | light={}% | aroma={} alarm={} | \
                     music={} track={} vol={}% | phase={:?} window={} active: a={} m={} al={}",
                    s.timer.on,
                    s.timer.confirmed,
                    s.timer.start,
                    s.timer.end,
                    s.light.intensity,
                    s.aromatherapy.on,
                    s.alarm.on,
                    s.music.on,
                    s.music.track,
                    s.music.volume,
                    s.exec.phase,
                    s.exec.music_window,
                    s.exec.aroma_active,
                    s.exec.music_active,
                    s.exec.alarm_active,
                );
            }
            AppEvent::Playlist(tracks) => {
                info!("PLAYLIST | {} relax tracks", tracks.len());
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::Started(phase) => {
                info!("START | initial_phase={:?}", phase);
            }
        }
    }
}

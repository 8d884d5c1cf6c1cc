//! Combined hardware adapter.
//!
//! The service takes one `hw` value satisfying all three actuator ports.
//! [`Hardware`] bundles the individual drivers and delegates, so the
//! firmware binary and the simulation can mix and match backends.

use crate::app::ports::{AudioPort, LightChannel, LightPort, SprayPort};

/// Actuator bundle: light strips + diffuser relay + audio player.
pub struct Hardware<L, S, A> {
    pub light: L,
    pub spray: S,
    pub audio: A,
}

impl<L: LightPort, S, A> LightPort for Hardware<L, S, A> {
    fn set_channel(&mut self, channel: LightChannel, percent: u8) {
        self.light.set_channel(channel, percent);
    }
}

impl<L, S: SprayPort, A> SprayPort for Hardware<L, S, A> {
    fn set_active(&mut self, on: bool) {
        self.spray.set_active(on);
    }
}

impl<L, S, A: AudioPort> AudioPort for Hardware<L, S, A> {
    fn play(&mut self, track: u8) {
        self.audio.play(track);
    }

    fn stop(&mut self) {
        self.audio.stop();
    }

    fn set_volume(&mut self, volume: u8) {
        self.audio.set_volume(volume);
    }

    fn is_ready(&self) -> bool {
        self.audio.is_ready()
    }
}

//! DFPlayer Mini audio adapter (UART2).
//!
//! Wraps the serial protocol from [`crate::drivers::dfplayer`] behind the
//! [`AudioPort`] trait.  Initialisation probes the player up to three
//! times; if all attempts fail the adapter stays constructed but reports
//! `is_ready() == false` for the rest of the session — playback features
//! degrade while light and aromatherapy scheduling continue.

#[cfg(feature = "espidf")]
mod esp {
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::uart::UartDriver;
    use log::{info, warn};

    use crate::app::ports::AudioPort;
    use crate::config::VOLUME_MAX;
    use crate::drivers::dfplayer::{frame, Cmd};

    /// Attempts before the player is declared absent for the session.
    const INIT_ATTEMPTS: u8 = 3;
    /// Reset settle time per the module datasheet.
    const RESET_SETTLE_MS: u32 = 1_000;

    pub struct DfPlayerAudio {
        uart: UartDriver<'static>,
        ready: bool,
    }

    impl DfPlayerAudio {
        /// Probe and configure the player.  Never fails construction —
        /// availability is reported through [`AudioPort::is_ready`].
        pub fn new(uart: UartDriver<'static>, initial_volume: u8) -> Self {
            let mut adapter = Self { uart, ready: false };

            for attempt in 1..=INIT_ATTEMPTS {
                if adapter.probe() {
                    adapter.send(Cmd::SetEq, 0);
                    adapter.send(Cmd::SetVolume, u16::from(initial_volume.min(VOLUME_MAX)));
                    adapter.ready = true;
                    info!("DFPlayer ready (attempt {attempt}), volume {initial_volume}/30");
                    return adapter;
                }
                warn!("DFPlayer probe attempt {attempt} failed");
                FreeRtos::delay_ms(RESET_SETTLE_MS);
            }

            warn!("DFPlayer unavailable after {INIT_ATTEMPTS} attempts; audio features disabled");
            adapter
        }

        /// Reset the module and wait for its ACK frame.
        fn probe(&mut self) -> bool {
            let reset = frame(Cmd::Reset, 0, true);
            if self.uart.write(&reset).is_err() {
                return false;
            }
            FreeRtos::delay_ms(RESET_SETTLE_MS);

            let mut buf = [0u8; 10];
            match self.uart.read(&mut buf, 100) {
                Ok(n) if n > 0 => true,
                _ => false,
            }
        }

        fn send(&mut self, cmd: Cmd, param: u16) {
            let f = frame(cmd, param, false);
            if self.uart.write(&f).is_err() {
                warn!("DFPlayer write failed ({cmd:?})");
            }
        }
    }

    impl AudioPort for DfPlayerAudio {
        fn play(&mut self, track: u8) {
            self.send(Cmd::PlayTrack, u16::from(track));
        }

        fn stop(&mut self) {
            self.send(Cmd::Stop, 0);
        }

        fn set_volume(&mut self, volume: u8) {
            self.send(Cmd::SetVolume, u16::from(volume.min(VOLUME_MAX)));
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }
}

#[cfg(feature = "espidf")]
pub use esp::DfPlayerAudio;

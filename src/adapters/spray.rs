//! Aromatherapy relay adapter.
//!
//! The diffuser is a bare relay on one GPIO.  Generic over any
//! `embedded-hal` [`OutputPin`], so the same adapter runs on the board and
//! under host tests with a fake pin.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::SprayPort;

/// Relay driver for the diffuser.  Constructed with the relay released.
pub struct SprayRelay<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> SprayRelay<P> {
    pub fn new(mut pin: P) -> Self {
        if pin.set_low().is_err() {
            warn!("aroma relay: initial release failed");
        }
        Self { pin }
    }
}

impl<P: OutputPin> SprayPort for SprayRelay<P> {
    fn set_active(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            warn!("aroma relay write failed");
        }
    }
}

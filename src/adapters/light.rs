//! LED strip adapter (LEDC PWM).
//!
//! Two channels: white for the wake phase, yellow (dimmable) for the sleep
//! phase.  The domain speaks percent; the mapping to the actuator-native
//! duty happens here and nowhere else.

use crate::app::ports::{LightChannel, LightPort};

/// Native duty ceiling for the strips.  The fixture's diffuser saturates
/// well below the full 8-bit range; 10 is the usable maximum measured on
/// the production lamp.
pub const DUTY_CEILING: u32 = 10;

/// Map a 0–100 percent level to the native duty range.
pub fn percent_to_duty(percent: u8) -> u32 {
    u32::from(percent.min(100)) * DUTY_CEILING / 100
}

#[cfg(feature = "espidf")]
mod esp {
    use esp_idf_hal::ledc::LedcDriver;
    use log::warn;

    use super::{percent_to_duty, LightChannel, LightPort};

    /// PWM-driven strip pair.
    pub struct LedcLight {
        white: LedcDriver<'static>,
        yellow: LedcDriver<'static>,
    }

    impl LedcLight {
        pub fn new(white: LedcDriver<'static>, yellow: LedcDriver<'static>) -> Self {
            let mut light = Self { white, yellow };
            light.set_channel(LightChannel::White, 0);
            light.set_channel(LightChannel::Yellow, 0);
            light
        }
    }

    impl LightPort for LedcLight {
        fn set_channel(&mut self, channel: LightChannel, percent: u8) {
            let duty = percent_to_duty(percent);
            let driver = match channel {
                LightChannel::White => &mut self.white,
                LightChannel::Yellow => &mut self.yellow,
            };
            if driver.set_duty(duty).is_err() {
                warn!("LEDC duty write failed ({channel:?})");
            }
        }
    }
}

#[cfg(feature = "espidf")]
pub use esp::LedcLight;

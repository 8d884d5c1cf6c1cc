//! Clock adapter.
//!
//! - **`feature = "espidf"`** — wall time from a DS3231 RTC on the I2C bus,
//!   uptime from `esp_timer_get_time()` (microsecond, monotonic).
//! - **host** — a simulation clock with a settable wall time, backed by
//!   `std::time::Instant` for uptime.
//!
//! The DS3231 keeps BCD registers; decoding is pure and host-tested.

use crate::app::ports::{ClockError, ClockPort};
use crate::schedule::TimeOfDay;

// ---------------------------------------------------------------------------
// BCD helpers (pure)
// ---------------------------------------------------------------------------

/// Decode one packed-BCD byte.
pub fn bcd_decode(b: u8) -> u8 {
    (b >> 4) * 10 + (b & 0x0F)
}

/// Decode the DS3231 minute/hour register pair into a time of day.
/// The hour register is masked to 24-hour mode.
pub fn decode_hm(minute_reg: u8, hour_reg: u8) -> Result<TimeOfDay, ClockError> {
    let minute = bcd_decode(minute_reg);
    let hour = bcd_decode(hour_reg & 0x3F);
    TimeOfDay::new(hour, minute).ok_or(ClockError::Invalid)
}

// ---------------------------------------------------------------------------
// ESP-IDF backend: DS3231 over I2C
// ---------------------------------------------------------------------------

#[cfg(feature = "espidf")]
mod esp {
    use esp_idf_hal::delay::BLOCK;
    use esp_idf_hal::i2c::I2cDriver;

    use super::{decode_hm, ClockError, ClockPort, TimeOfDay};

    /// DS3231 I2C address.
    const DS3231_ADDR: u8 = 0x68;
    /// First timekeeping register (seconds); minutes and hours follow.
    const REG_SECONDS: u8 = 0x00;

    /// RTC-backed clock for the lamp board.
    pub struct RtcClock {
        i2c: I2cDriver<'static>,
    }

    impl RtcClock {
        pub fn new(i2c: I2cDriver<'static>) -> Self {
            Self { i2c }
        }
    }

    impl ClockPort for RtcClock {
        fn wall_time(&mut self) -> Result<TimeOfDay, ClockError> {
            let mut regs = [0u8; 3]; // seconds, minutes, hours
            self.i2c
                .write_read(DS3231_ADDR, &[REG_SECONDS], &mut regs, BLOCK)
                .map_err(|_| ClockError::ReadFailed)?;
            decode_hm(regs[1], regs[2])
        }

        fn uptime_ms(&mut self) -> u64 {
            (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
        }
    }
}

#[cfg(feature = "espidf")]
pub use esp::RtcClock;

// ---------------------------------------------------------------------------
// Host backend: simulation clock
// ---------------------------------------------------------------------------

/// Settable clock for host-side simulation and demos.
#[cfg(not(feature = "espidf"))]
pub struct SimClock {
    time: TimeOfDay,
    start: std::time::Instant,
}

#[cfg(not(feature = "espidf"))]
impl SimClock {
    pub fn new(time: TimeOfDay) -> Self {
        Self {
            time,
            start: std::time::Instant::now(),
        }
    }

    /// Move the simulated wall clock.
    pub fn set_time(&mut self, time: TimeOfDay) {
        self.time = time;
    }
}

#[cfg(not(feature = "espidf"))]
impl ClockPort for SimClock {
    fn wall_time(&mut self) -> Result<TimeOfDay, ClockError> {
        Ok(self.time)
    }

    fn uptime_ms(&mut self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

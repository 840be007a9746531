//! On-board orange LED
//!
//! A single register: brightness in bits 0..=5 (hardware range 0..=63),
//! sensor-error indication enable in bit 7. The API exposes brightness in
//! the usual 0..=255 range and scales to the 6-bit hardware range.

use embedded_hal::delay::DelayNs;
use senseenv_hal::{Clock, I2cBus};

use crate::device::I2cDevice;
use crate::error::Error;
use crate::regmap::reg;

const BRIGHTNESS_MASK: u8 = 63;
const ERROR_STATUS_BIT: u8 = 1 << 7;

/// Orange LED view
pub struct OrangeLed<'a, B, T> {
    dev: &'a mut I2cDevice<B, T>,
}

impl<'a, B, T> OrangeLed<'a, B, T>
where
    B: I2cBus,
    T: Clock + DelayNs,
{
    pub(crate) fn new(dev: &'a mut I2cDevice<B, T>) -> Self {
        Self { dev }
    }

    /// Current brightness, scaled to 0..=255
    pub fn brightness(&mut self) -> Result<u8, Error<B::Error>> {
        let raw: u8 = self.dev.read(reg::ORANGE_LED)?;
        Ok(scale(raw & BRIGHTNESS_MASK, 63, 255))
    }

    /// Set the brightness (0..=255)
    pub fn set_brightness(&mut self, brightness: u8, persist: bool) -> Result<(), Error<B::Error>> {
        let raw = scale(brightness, 255, 63);
        let current: u8 = self.dev.read(reg::ORANGE_LED)?;
        self.dev
            .write(reg::ORANGE_LED, (current & !BRIGHTNESS_MASK) | raw)?;

        if persist {
            self.dev.persist(reg::ORANGE_LED)?;
        }
        Ok(())
    }

    /// Whether the LED indicates sensor errors
    pub fn error_status_enabled(&mut self) -> Result<bool, Error<B::Error>> {
        let raw: u8 = self.dev.read(reg::ORANGE_LED)?;
        Ok(raw & ERROR_STATUS_BIT != 0)
    }

    /// Enable or disable sensor-error indication
    pub fn set_error_status_enabled(
        &mut self,
        enabled: bool,
        persist: bool,
    ) -> Result<(), Error<B::Error>> {
        let current: u8 = self.dev.read(reg::ORANGE_LED)?;
        let bit = if enabled { ERROR_STATUS_BIT } else { 0 };
        self.dev
            .write(reg::ORANGE_LED, (current & !ERROR_STATUS_BIT) | bit)?;

        if persist {
            self.dev.persist(reg::ORANGE_LED)?;
        }
        Ok(())
    }
}

/// Linear rescale between the 0..=`from` and 0..=`to` ranges
fn scale(value: u8, from: u16, to: u16) -> u8 {
    (u16::from(value) * to / from) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SimBus, SimTimer};

    fn device(bus: SimBus) -> I2cDevice<SimBus, SimTimer> {
        I2cDevice::new(bus, SimTimer::new())
    }

    #[test]
    fn brightness_scales_between_ranges() {
        assert_eq!(scale(0, 255, 63), 0);
        assert_eq!(scale(255, 255, 63), 63);
        assert_eq!(scale(63, 63, 255), 255);
        assert_eq!(scale(128, 255, 63), 31);
    }

    #[test]
    fn brightness_round_trips_at_the_endpoints() {
        let mut dev = device(SimBus::new());
        let mut led = OrangeLed::new(&mut dev);

        led.set_brightness(255, false).unwrap();
        assert_eq!(led.brightness().unwrap(), 255);
        assert_eq!(dev.bus().regs[0x03] & BRIGHTNESS_MASK, 63);

        let mut led = OrangeLed::new(&mut dev);
        led.set_brightness(0, false).unwrap();
        assert_eq!(led.brightness().unwrap(), 0);
    }

    #[test]
    fn error_status_does_not_disturb_brightness() {
        let mut dev = device(SimBus::new());
        let mut led = OrangeLed::new(&mut dev);

        led.set_brightness(255, false).unwrap();
        led.set_error_status_enabled(true, false).unwrap();
        assert!(led.error_status_enabled().unwrap());
        assert_eq!(led.brightness().unwrap(), 255);

        led.set_error_status_enabled(false, false).unwrap();
        assert!(!led.error_status_enabled().unwrap());
        assert_eq!(dev.bus().regs[0x03], 63);
    }

    #[test]
    fn brightness_with_persist_commits_the_register() {
        let mut bus = SimBus::new();
        bus.script_persist(reg::ORANGE_LED.address);
        bus.persist_polls_before_clear = Some(1);
        let mut dev = device(bus);
        let mut led = OrangeLed::new(&mut dev);

        led.set_brightness(255, true).unwrap();
        // Brightness write plus persist-request write
        assert_eq!(dev.bus().register_writes, 2);
        assert_eq!(dev.bus().regs[0x03], 63);
    }
}
